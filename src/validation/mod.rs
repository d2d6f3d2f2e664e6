//! Validation functionality
//!
//! Provides validation logic for:
//! - Input validation and sanitization (filenames, sample sizes)
//! - Production line number uniqueness per call

pub mod input;
pub mod lines;

pub use input::{
    ValidationError, ValidationResult, certificate_filename, sanitize_filename_component,
    validate_sample_size, validate_template_name,
};
pub use lines::{LineValidation, LineValidationError, validate_line_number, validate_line_range};
