//! Models module for the SDK
//!
//! Defines the data structures passed between normalization, templates,
//! line mapping and export.

pub mod call;
pub mod certificate;
pub mod line;
pub mod template;

pub use call::{CallRecord, is_present, value_text};
pub use certificate::{CertificateKind, CertificateViewModel, LotEntry, LotTotals};
pub use line::{LineInfo, LineMapping, ProductionLine};
pub use template::{ImportedValues, SAMPLE_NO_HEADER, Template, TemplateRow};
