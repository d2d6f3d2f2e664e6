//! Line number validation
//!
//! A line number may be used once per call number. The same number can
//! appear on lines belonging to different calls.

use serde::Serialize;
use thiserror::Error;

use crate::models::ProductionLine;

/// Lowest selectable line number
pub const MIN_LINE_NUMBER: u32 = 1;

/// Highest selectable line number
pub const MAX_LINE_NUMBER: u32 = 5;

/// Error during line number validation
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum LineValidationError {
    #[error("Please select a call number first")]
    MissingCallNumber,
    #[error("Line number must be between {min} and {max} (got: {actual})")]
    OutOfRange { min: u32, max: u32, actual: u32 },
    #[error("Line {line_number} already used for {call_no}")]
    Duplicate { line_number: u32, call_no: String },
}

/// `{valid, error}` result shape for front ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[must_use = "validation results should be checked"]
pub struct LineValidation {
    pub valid: bool,
    pub error: Option<String>,
}

impl From<Result<(), LineValidationError>> for LineValidation {
    fn from(result: Result<(), LineValidationError>) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                error: None,
            },
            Err(err) => Self {
                valid: false,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Check that `candidate` can be chosen for the line at `line_index`.
///
/// Fails when the line has no call number, or when another line of the same
/// call already uses `candidate`.
///
/// # Example
///
/// ```rust
/// use inspection_cert_sdk::models::ProductionLine;
/// use inspection_cert_sdk::validation::lines::validate_line_number;
///
/// let lines = vec![
///     Some(ProductionLine::new(Some(3), "EP-01")),
///     Some(ProductionLine::new(None, "EP-01")),
/// ];
/// assert!(validate_line_number(&lines, 1, 3).is_err());
/// assert!(validate_line_number(&lines, 1, 4).is_ok());
/// ```
pub fn validate_line_number(
    lines: &[Option<ProductionLine>],
    line_index: usize,
    candidate: u32,
) -> Result<(), LineValidationError> {
    let call_no = lines
        .get(line_index)
        .and_then(Option::as_ref)
        .and_then(ProductionLine::call_no)
        .ok_or(LineValidationError::MissingCallNumber)?;

    let duplicate = lines.iter().enumerate().any(|(index, line)| {
        index != line_index
            && line.as_ref().is_some_and(|line| {
                line.ic_number.as_deref() == Some(call_no) && line.line_number == Some(candidate)
            })
    });

    if duplicate {
        return Err(LineValidationError::Duplicate {
            line_number: candidate,
            call_no: call_no.to_string(),
        });
    }
    Ok(())
}

/// Check that `candidate` is one of the selectable line numbers.
///
/// Kept apart from [`validate_line_number`], which only answers whether the
/// number is free for the line's call.
pub fn validate_line_range(candidate: u32) -> Result<(), LineValidationError> {
    if !(MIN_LINE_NUMBER..=MAX_LINE_NUMBER).contains(&candidate) {
        return Err(LineValidationError::OutOfRange {
            min: MIN_LINE_NUMBER,
            max: MAX_LINE_NUMBER,
            actual: candidate,
        });
    }
    Ok(())
}
