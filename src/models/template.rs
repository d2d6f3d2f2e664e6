//! Sample-data template models

use serde::{Deserialize, Serialize};

/// Header of the sample-number column
pub const SAMPLE_NO_HEADER: &str = "Sample No.";

/// One template row. `sample_index` is 1-based and always equals the row's
/// position plus one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRow {
    pub sample_index: usize,
    pub value: String,
}

/// A fixed-length sample template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub value_label: String,
    pub rows: Vec<TemplateRow>,
}

impl Template {
    /// Blank template with `sample_size` rows. Size checks live in
    /// `export::template::build_template`.
    pub(crate) fn blank(sample_size: usize, value_label: impl Into<String>) -> Self {
        Self {
            value_label: value_label.into(),
            rows: (0..sample_size)
                .map(|i| TemplateRow {
                    sample_index: i + 1,
                    value: String::new(),
                })
                .collect(),
        }
    }

    pub fn sample_size(&self) -> usize {
        self.rows.len()
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.value.as_str())
    }
}

/// Values read back from a filled template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedValues {
    /// Exactly `sample_size` values, position i = sample i+1
    pub values: Vec<String>,
    /// Number of non-empty values
    pub filled_count: usize,
}

impl ImportedValues {
    pub fn new(values: Vec<String>) -> Self {
        let filled_count = values.iter().filter(|v| !v.is_empty()).count();
        Self {
            values,
            filled_count,
        }
    }

    /// Notice shown after a successful import
    pub fn summary(&self) -> String {
        format!("Successfully imported {} values", self.filled_count)
    }
}
