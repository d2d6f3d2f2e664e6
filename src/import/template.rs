//! Sample template import
//!
//! Reads the value column of a filled-in template back into exactly
//! `sample_size` strings, position i holding sample i+1. The first non-blank
//! line is the header and is discarded; column 0 is ignored.
//!
//! [`CsvMode::Naive`] splits every line on commas with no quote handling, so
//! a value containing a comma is cut at the comma. [`CsvMode::Strict`] reads
//! RFC 4180 quoting through the `csv` crate.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::ImportError;
use crate::models::ImportedValues;
use crate::validation::input::MIN_SAMPLE_SIZE;

/// How template lines are split into columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvMode {
    /// Split on every comma
    #[default]
    Naive,
    /// Quoted fields and embedded commas
    Strict,
}

impl FromStr for CsvMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "naive" => Ok(CsvMode::Naive),
            "strict" => Ok(CsvMode::Strict),
            _ => Err(format!(
                "Unknown CSV mode: {}. Use 'naive' or 'strict'.",
                s
            )),
        }
    }
}

impl fmt::Display for CsvMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvMode::Naive => write!(f, "naive"),
            CsvMode::Strict => write!(f, "strict"),
        }
    }
}

/// Parse template text with naive comma splitting.
///
/// ```
/// use inspection_cert_sdk::import::parse_template;
///
/// let values = parse_template("Sample No.,Weight (g)\n1,12.5\n2, 13.1 \n", 5).unwrap();
/// assert_eq!(values, vec!["12.5", "13.1", "", "", ""]);
/// ```
pub fn parse_template(csv_text: &str, sample_size: usize) -> Result<Vec<String>, ImportError> {
    parse_template_with(csv_text, sample_size, CsvMode::Naive)
}

/// Parse template text, returning exactly `sample_size` values
pub fn parse_template_with(
    csv_text: &str,
    sample_size: usize,
    mode: CsvMode,
) -> Result<Vec<String>, ImportError> {
    if sample_size < MIN_SAMPLE_SIZE {
        return Err(ImportError::InvalidSampleSize(sample_size));
    }

    let rows = match mode {
        CsvMode::Naive => naive_value_column(csv_text),
        CsvMode::Strict => strict_value_column(csv_text)?,
    };

    // header + at least one data row
    if rows.len() < 2 {
        return Err(ImportError::EmptyData);
    }

    let data_rows = rows.len() - 1;
    if data_rows > sample_size {
        warn!(
            "Template has {} data rows, ignoring {} beyond sample size {}",
            data_rows,
            data_rows - sample_size,
            sample_size
        );
    }

    let mut values: Vec<String> = rows.into_iter().skip(1).take(sample_size).collect();
    values.resize(sample_size, String::new());

    debug!(
        "Parsed {} template rows ({} mode) into {} values",
        data_rows.min(sample_size),
        mode,
        sample_size
    );
    Ok(values)
}

/// Column 1 of every non-blank line, header included
fn naive_value_column(csv_text: &str) -> Vec<String> {
    csv_text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.split(',')
                .nth(1)
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        })
        .collect()
}

fn strict_value_column(csv_text: &str) -> Result<Vec<String>, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        // blank line; a row of empty fields still holds a sample slot
        if record.len() <= 1 && record.get(0).is_none_or(|field| field.trim().is_empty()) {
            continue;
        }
        rows.push(record.get(1).map(|v| v.trim().to_string()).unwrap_or_default());
    }
    Ok(rows)
}

/// Parse template text and count the filled values
pub fn import_template(
    csv_text: &str,
    sample_size: usize,
    mode: CsvMode,
) -> Result<ImportedValues, ImportError> {
    let imported = ImportedValues::new(parse_template_with(csv_text, sample_size, mode)?);
    info!("{}", imported.summary());
    Ok(imported)
}

/// Read and import a template file.
///
/// Invalid UTF-8 is replaced rather than rejected, matching how browsers
/// read uploaded text files.
pub fn read_template_file(
    path: impl AsRef<Path>,
    sample_size: usize,
    mode: CsvMode,
) -> Result<ImportedValues, ImportError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| ImportError::ReadError(format!("{}: {}", path.display(), e)))?;
    import_template(&String::from_utf8_lossy(&bytes), sample_size, mode)
}

/// Async variant of [`read_template_file`]
#[cfg(feature = "native-fs")]
pub async fn read_template_file_async(
    path: impl AsRef<Path>,
    sample_size: usize,
    mode: CsvMode,
) -> Result<ImportedValues, ImportError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ImportError::ReadError(format!("{}: {}", path.display(), e)))?;
    import_template(&String::from_utf8_lossy(&bytes), sample_size, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pads_to_sample_size() {
        let values = parse_template("Sample No.,Value\n1,a\n2,b", 5).unwrap();
        assert_eq!(values, vec!["a", "b", "", "", ""]);
    }

    #[test]
    fn test_ignores_extra_rows() {
        let values = parse_template("h\n1,a\n2,b\n3,c", 2).unwrap();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn test_header_only_is_empty_data() {
        assert!(matches!(
            parse_template("Sample No.,Value\n\n  \n", 3),
            Err(ImportError::EmptyData)
        ));
        assert!(matches!(parse_template("", 3), Err(ImportError::EmptyData)));
    }

    #[test]
    fn test_crlf_lines() {
        let values = parse_template("Sample No.,Value\r\n1,4.2\r\n2,\r\n", 2).unwrap();
        assert_eq!(values, vec!["4.2", ""]);
    }

    #[test]
    fn test_missing_column_is_empty() {
        let values = parse_template("Sample No.,Value\n1\n2,x", 2).unwrap();
        assert_eq!(values, vec!["", "x"]);
    }

    #[test]
    fn test_naive_mode_splits_quoted_commas() {
        let text = "Sample No.,Value\n1,\"1,5\"\n";
        assert_eq!(parse_template(text, 1).unwrap(), vec!["\"1"]);
        assert_eq!(
            parse_template_with(text, 1, CsvMode::Strict).unwrap(),
            vec!["1,5"]
        );
    }

    #[test]
    fn test_strict_keeps_rows_of_empty_fields() {
        let text = "Sample No.,Value\n1,a\n,\n3,c";
        let expected = vec!["a", "", "c"];
        assert_eq!(parse_template_with(text, 3, CsvMode::Naive).unwrap(), expected);
        assert_eq!(parse_template_with(text, 3, CsvMode::Strict).unwrap(), expected);
    }

    #[test]
    fn test_large_sample_size_pads() {
        let values = parse_template("Sample No.,Value\n1,a", 10_001).unwrap();
        assert_eq!(values.len(), 10_001);
        assert_eq!(values[0], "a");
        assert!(values[1..].iter().all(String::is_empty));
    }

    #[test]
    fn test_zero_sample_size_is_rejected() {
        assert!(matches!(
            parse_template("h\n1,a", 0),
            Err(ImportError::InvalidSampleSize(0))
        ));
    }

    #[test]
    fn test_import_counts_filled_values() {
        let imported = import_template("h\n1,a\n2,\n3,c", 4, CsvMode::Naive).unwrap();
        assert_eq!(imported.filled_count, 2);
        assert_eq!(imported.summary(), "Successfully imported 2 values");
    }

    #[test]
    fn test_csv_mode_parsing() {
        assert_eq!("STRICT".parse::<CsvMode>(), Ok(CsvMode::Strict));
        assert_eq!(CsvMode::default(), CsvMode::Naive);
        assert!("fancy".parse::<CsvMode>().is_err());
    }
}
