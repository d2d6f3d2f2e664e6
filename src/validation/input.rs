//! Input validation and sanitization utilities.
//!
//! Filenames are built from certificate numbers typed by inspectors, so they
//! routinely carry path separators and other characters no filesystem
//! accepts. Sample sizes come from user configuration.

use serde::Serialize;
use thiserror::Error;

/// Maximum length for a filename stem
pub const MAX_FILENAME_STEM_LENGTH: usize = 200;

/// Smallest accepted template sample size
pub const MIN_SAMPLE_SIZE: usize = 1;

/// Largest sample size accepted from configuration files
pub const MAX_SAMPLE_SIZE: usize = 10_000;

/// Characters replaced with `-` in generated filenames
pub const UNSAFE_FILENAME_CHARS: &[char] = &['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];

/// Errors that can occur during input validation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ValidationError {
    /// Input is empty when a value is required
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    /// Input exceeds maximum allowed length
    #[error("{field} exceeds maximum length (max: {max}, got: {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// Numeric input outside its accepted range
    #[error("{field} must be between {min} and {max} (got: {actual})")]
    OutOfRange {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    /// Input has invalid format
    #[error("{0}: {1}")]
    InvalidFormat(&'static str, String),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Replace filesystem-unsafe characters with `-`.
///
/// # Examples
///
/// ```
/// use inspection_cert_sdk::validation::input::sanitize_filename_component;
///
/// assert_eq!(sanitize_filename_component("N/ERC/2025:17"), "N-ERC-2025-17");
/// ```
pub fn sanitize_filename_component(name: &str) -> String {
    name.chars()
        .map(|ch| {
            if UNSAFE_FILENAME_CHARS.contains(&ch) || ch.is_control() {
                '-'
            } else {
                ch
            }
        })
        .take(MAX_FILENAME_STEM_LENGTH)
        .collect()
}

/// Filename for an exported certificate.
///
/// The certificate number becomes the stem, with unsafe characters replaced;
/// a blank number falls back to `fallback`.
///
/// # Examples
///
/// ```
/// use inspection_cert_sdk::validation::input::certificate_filename;
///
/// assert_eq!(certificate_filename("N/ERC/17", "FinalProductIC", "pdf"), "N-ERC-17.pdf");
/// assert_eq!(certificate_filename("  ", "FinalProductIC", "pdf"), "FinalProductIC.pdf");
/// ```
pub fn certificate_filename(certificate_no: &str, fallback: &str, extension: &str) -> String {
    let trimmed = certificate_no.trim();
    let stem = if trimmed.is_empty() { fallback } else { trimmed };
    let stem = sanitize_filename_component(stem);
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        stem
    } else {
        format!("{stem}.{extension}")
    }
}

/// Validate a configured template sample size.
pub fn validate_sample_size(sample_size: usize) -> ValidationResult<usize> {
    if !(MIN_SAMPLE_SIZE..=MAX_SAMPLE_SIZE).contains(&sample_size) {
        return Err(ValidationError::OutOfRange {
            field: "Sample size",
            min: MIN_SAMPLE_SIZE,
            max: MAX_SAMPLE_SIZE,
            actual: sample_size,
        });
    }
    Ok(sample_size)
}

/// Validate a template name used in generated filenames.
pub fn validate_template_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Empty("Template name"));
    }
    if name.len() > MAX_FILENAME_STEM_LENGTH {
        return Err(ValidationError::TooLong {
            field: "Template name",
            max: MAX_FILENAME_STEM_LENGTH,
            actual: name.len(),
        });
    }
    if let Some(ch) = name.chars().find(|ch| UNSAFE_FILENAME_CHARS.contains(ch)) {
        return Err(ValidationError::InvalidFormat(
            "Template name",
            format!("character '{ch}' is not allowed in filenames"),
        ));
    }
    Ok(())
}
