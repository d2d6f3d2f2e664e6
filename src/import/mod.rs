//! Import functionality
//!
//! Provides readers for filled-in sample templates:
//! - CSV text (naive or strict quoting)
//! - CSV files, sync or async (`native-fs` feature)

pub mod template;

pub use template::{
    CsvMode, import_template, parse_template, parse_template_with, read_template_file,
};
#[cfg(feature = "native-fs")]
pub use template::read_template_file_async;

/// Error during import
#[derive(Debug, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ImportError {
    /// The file holds a header at most
    #[error("Invalid file: No data rows found")]
    EmptyData,
    #[error("Error reading file: {0}")]
    ReadError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid sample size: {0}")]
    InvalidSampleSize(usize),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::ReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::ParseError(err.to_string())
    }
}
