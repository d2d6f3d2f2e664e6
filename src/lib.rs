//! Inspection Certificate SDK - Shared library for ERC inspection certificates
//!
//! Provides unified interfaces for:
//! - Normalizing upstream inspection call records into certificate view models
//! - Sample-data CSV templates (export and import)
//! - Production line labels and line number validation
//! - PDF and PNG export of rendered certificates
//! - Configuration loading

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod export;
pub mod import;
pub mod lines;
pub mod models;
pub mod normalize;
pub mod validation;

// Re-export commonly used types
pub use config::{CertificateConfig, ConfigError};
pub use export::{
    BitmapSurface, DirectorySink, DocumentExporter, ExportError, ExportOptions, MemorySink,
    PageLayout, PageSize, PdfExportResult, RenderSurface, SaveSink, TemplateExport,
    build_template, compute_layout, export_template, template_filename,
};
pub use import::{CsvMode, ImportError, import_template, parse_template, parse_template_with};
pub use lines::build_line_mapping;
pub use normalize::{normalize, normalize_json};
pub use validation::{
    LineValidation, LineValidationError, ValidationError, certificate_filename,
    validate_line_number, validate_line_range,
};

// Re-export models
pub use models::{
    CallRecord, CertificateKind, CertificateViewModel, ImportedValues, LineInfo, LineMapping,
    LotEntry, LotTotals, ProductionLine, Template, TemplateRow,
};

// WASM bindings for normalization, templates and export
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod wasm {
    use crate::export::{BitmapSurface, DocumentExporter, ExportError, ExportOptions};
    use crate::import::{CsvMode, ImportError};
    use crate::models::{CertificateKind, ProductionLine};
    use serde_json;
    use wasm_bindgen::prelude::*;

    /// Convert ImportError to JsValue for JavaScript error handling
    fn import_error_to_js(err: ImportError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    /// Convert ExportError to JsValue for JavaScript error handling
    fn export_error_to_js(err: ExportError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
        serde_json::to_string(value)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    fn deserialize_lines(json: &str) -> Result<Vec<Option<ProductionLine>>, JsValue> {
        serde_json::from_str(json)
            .map_err(|e| JsValue::from_str(&format!("Deserialization error: {}", e)))
    }

    /// Normalize a call record into a certificate view model.
    ///
    /// # Arguments
    ///
    /// * `kind` - `raw-material`, `process` or `final-product`
    /// * `call_json` - Call record as a JSON object
    ///
    /// # Returns
    ///
    /// JSON string containing the flat view model, or JsValue error
    #[wasm_bindgen]
    pub fn normalize_call(kind: &str, call_json: &str) -> Result<String, JsValue> {
        let kind: CertificateKind = kind.parse().map_err(|e: String| JsValue::from_str(&e))?;
        let model = crate::normalize::normalize_json(kind, call_json)
            .map_err(|e| JsValue::from_str(&format!("Deserialization error: {}", e)))?;
        to_json(&model)
    }

    /// Build a blank sample template.
    ///
    /// # Returns
    ///
    /// JSON string `{"content": "...", "filename": "...", "sampleSize": n}`
    #[wasm_bindgen]
    pub fn build_template_csv(
        template_name: &str,
        sample_size: usize,
        value_label: &str,
    ) -> Result<String, JsValue> {
        let export = crate::export::export_template(template_name, sample_size, value_label)
            .map_err(export_error_to_js)?;
        to_json(&export)
    }

    /// Parse a filled-in template.
    ///
    /// # Arguments
    ///
    /// * `csv_text` - File content
    /// * `sample_size` - Number of values expected
    /// * `mode` - `naive` or `strict`
    ///
    /// # Returns
    ///
    /// JSON string `{"values": [...], "filledCount": n}`, or JsValue error
    /// ("Invalid file: No data rows found" for header-only files)
    #[wasm_bindgen]
    pub fn parse_template_csv(
        csv_text: &str,
        sample_size: usize,
        mode: &str,
    ) -> Result<String, JsValue> {
        let mode: CsvMode = mode.parse().map_err(|e: String| JsValue::from_str(&e))?;
        let imported = crate::import::import_template(csv_text, sample_size, mode)
            .map_err(import_error_to_js)?;
        to_json(&imported)
    }

    /// Map production lines (JSON array, `null` for removed entries) to
    /// display information keyed by internal line id.
    #[wasm_bindgen]
    pub fn build_line_mapping(lines_json: &str) -> Result<String, JsValue> {
        let lines = deserialize_lines(lines_json)?;
        to_json(&crate::lines::build_line_mapping(&lines))
    }

    /// Validate a line number choice.
    ///
    /// # Returns
    ///
    /// JSON string with validation result: `{"valid": true, "error": null}` or `{"valid": false, "error": "error message"}`
    #[wasm_bindgen]
    pub fn validate_line_number(
        lines_json: &str,
        line_index: usize,
        candidate: u32,
    ) -> Result<String, JsValue> {
        let lines = deserialize_lines(lines_json)?;
        let result: crate::validation::LineValidation =
            crate::validation::validate_line_number(&lines, line_index, candidate).into();
        to_json(&result)
    }

    /// Filename for an exported certificate
    #[wasm_bindgen]
    pub fn sanitize_certificate_filename(
        certificate_no: &str,
        fallback: &str,
        extension: &str,
    ) -> String {
        crate::validation::certificate_filename(certificate_no, fallback, extension)
    }

    /// Compose a PDF from a PNG or JPEG rendering of a certificate.
    ///
    /// The browser captures the page at device scale; the bitmap is used as-is.
    ///
    /// # Returns
    ///
    /// JSON string containing PdfExportResult (base64 PDF and layout)
    #[wasm_bindgen]
    pub fn export_certificate_pdf(
        image_bytes: &[u8],
        filename: &str,
        title: &str,
    ) -> Result<String, JsValue> {
        let surface = BitmapSurface::from_bytes(image_bytes).map_err(export_error_to_js)?;
        let exporter = DocumentExporter::with_options(ExportOptions {
            scale_factor: 1.0,
            title: title.to_string(),
            ..Default::default()
        });
        let result = exporter
            .export_to_base64(&surface, filename)
            .map_err(export_error_to_js)?;
        to_json(&result)
    }
}
