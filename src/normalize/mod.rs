//! Record normalization
//!
//! Maps one upstream call record into the fixed-shape view model of a
//! certificate kind. Normalization never fails: missing or malformed fields
//! resolve to the rule's default.

pub mod rules;
pub mod transforms;

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{CallRecord, CertificateKind, CertificateViewModel, value_text};

pub use rules::{FieldRule, FieldTransform, rules_for};
pub use transforms::{
    contract_reference, drawing_number, lookup_drawing, lots_from, quantity,
    reformat_contract_reference, sanitize_certificate_no,
};

/// Normalize a call record into a certificate view model.
///
/// An empty call yields the blank view model: every declared field present
/// and empty, with no defaults applied.
pub fn normalize(kind: CertificateKind, call: &CallRecord) -> CertificateViewModel {
    if call.is_empty() {
        debug!("Empty {} call, rendering blank certificate", kind);
        return CertificateViewModel::blank(kind);
    }

    let rules = rules_for(kind);
    let fields: BTreeMap<String, String> = rules
        .iter()
        .map(|rule| {
            let value = resolve_field(rule, call).unwrap_or_else(|| rule.default.to_string());
            (rule.name.to_string(), value)
        })
        .collect();

    let lots = match kind {
        CertificateKind::Process => lots_from(call),
        _ => Vec::new(),
    };

    debug!(
        "Normalized {} call: {} of {} fields filled, {} lots",
        kind,
        fields.values().filter(|v| !v.is_empty()).count(),
        rules.len(),
        lots.len()
    );

    CertificateViewModel::from_parts(kind, fields, lots)
}

/// Normalize a call record given as JSON text. Non-object JSON is treated
/// as an empty call.
pub fn normalize_json(
    kind: CertificateKind,
    json: &str,
) -> Result<CertificateViewModel, serde_json::Error> {
    let call = CallRecord::from_json(json)?;
    Ok(normalize(kind, &call))
}

/// Text for one field, or `None` when no source holds a usable value
pub fn resolve_field(rule: &FieldRule, call: &CallRecord) -> Option<String> {
    match rule.transform {
        FieldTransform::Text => call.first_text(rule.sources),
        FieldTransform::ContractReference => call
            .first_present(rule.sources)
            .and_then(contract_reference),
        FieldTransform::DrawingNumber => drawing_number(call),
        FieldTransform::DisplayCertificateNo => call
            .first_present(rule.sources)
            .and_then(value_text)
            .map(|text| sanitize_certificate_no(&text))
            .filter(|text| !text.is_empty()),
    }
}
