//! Sample template export
//!
//! A template is a two-column CSV: `Sample No.,<label>` followed by one
//! `<n>,` row per sample. Row count is exact so that imports line up with
//! sample numbers by position.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ExportError;
use crate::models::{SAMPLE_NO_HEADER, Template};
use crate::validation::input::MIN_SAMPLE_SIZE;
use crate::validation::sanitize_filename_component;

/// Serialized template ready to be saved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[must_use = "export results contain the template content and should be used"]
pub struct TemplateExport {
    /// CSV text, `sample_size + 1` lines, no trailing newline
    pub content: String,
    /// Suggested filename
    pub filename: String,
    pub sample_size: usize,
}

/// Build a blank template with exactly `sample_size` rows.
///
/// ```
/// use inspection_cert_sdk::export::build_template;
///
/// let template = build_template(3, "Toe Load (N)").unwrap();
/// assert_eq!(template.to_csv().unwrap(), "Sample No.,Toe Load (N)\n1,\n2,\n3,");
/// ```
pub fn build_template(sample_size: usize, value_label: &str) -> Result<Template, ExportError> {
    if sample_size < MIN_SAMPLE_SIZE {
        return Err(ExportError::InvalidSampleSize(sample_size));
    }
    Ok(Template::blank(sample_size, value_label))
}

impl Template {
    /// Serialize as CSV. The label is quoted only when it needs to be; line
    /// breaks inside it become spaces so the line count stays exact.
    pub fn to_csv(&self) -> Result<String, ExportError> {
        let label = self.value_label.replace(['\r', '\n'], " ");

        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer
            .write_record([SAMPLE_NO_HEADER, label.as_str()])
            .map_err(|e| ExportError::SerializationError(e.to_string()))?;
        for row in &self.rows {
            writer
                .write_record([row.sample_index.to_string(), row.value.clone()])
                .map_err(|e| ExportError::SerializationError(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::SerializationError(e.to_string()))?;
        let mut csv = String::from_utf8(bytes)
            .map_err(|e| ExportError::SerializationError(e.to_string()))?;
        if csv.ends_with('\n') {
            csv.pop();
        }
        debug!("Serialized template with {} rows", self.rows.len());
        Ok(csv)
    }
}

/// `<templateName>_<sampleSize>samples.csv`
pub fn template_filename(template_name: &str, sample_size: usize) -> String {
    format!(
        "{}_{}samples.csv",
        sanitize_filename_component(template_name.trim()),
        sample_size
    )
}

/// Build and serialize a blank template in one step
pub fn export_template(
    template_name: &str,
    sample_size: usize,
    value_label: &str,
) -> Result<TemplateExport, ExportError> {
    let template = build_template(sample_size, value_label)?;
    Ok(TemplateExport {
        content: template.to_csv()?,
        filename: template_filename(template_name, sample_size),
        sample_size,
    })
}
