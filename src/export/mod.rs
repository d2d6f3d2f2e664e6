//! Export functionality
//!
//! Provides exporters for:
//! - CSV sample templates
//! - Single-page PDF certificates composed from a rasterized rendering
//! - PNG images of the same rendering

pub mod document;
pub mod pdf;
pub mod raster;
pub mod sink;
pub mod template;

/// Error during export
#[derive(Debug, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Rasterize error: {0}")]
    RasterizeError(String),
    #[error("Invalid sample size: {0}")]
    InvalidSampleSize(usize),
    #[error("Another export is already in progress")]
    Busy,
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::IoError(err.to_string())
    }
}

// Re-export for convenience
pub use document::{DocumentExporter, ExportOptions, RenderedPdf};
pub use pdf::{PageLayout, PageSize, PdfExportResult, compose_pdf, compute_layout};
pub use raster::{
    BitmapSurface, DEFAULT_SCALE_FACTOR, RenderSurface, encode_png, scaled_dimensions,
};
pub use sink::{DirectorySink, MemorySink, SaveSink, SavedFile};
pub use template::{TemplateExport, build_template, export_template, template_filename};
