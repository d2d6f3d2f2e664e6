//! Kind-specific field transforms
//!
//! All transforms are textual. Nothing here parses dates or validates
//! drawing codes; unknown shapes pass through or degrade to a fallback.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::rules::{
    DRAWING_NO_SOURCES, ERC_TYPE_SOURCES, LOT_ACCEPTED_SOURCES, LOT_NO_SOURCES,
    LOT_PROCESSED_SOURCES, LOT_REJECTED_SOURCES, LOT_SOURCES,
};
use crate::models::{CallRecord, LotEntry, is_present, value_text};

/// Canonical reference-number marker
pub const REFERENCE_MARKER: &str = "RB L. No.";

/// Canonical date marker
pub const DATE_MARKER: &str = "Dt.";

static DATED_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^\s*(.*?)[\s,]*\bdated\b[\s:,]*(.*?)\s*$").expect("Invalid regex")
});

static LEADING_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^RB\s*L\.?\s*No\.?\s*").expect("Invalid regex"));

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").expect("Invalid regex"));

/// Drawing codes by ERC type. Exact keys are tried before lower-cased ones.
static DRAWING_CODES: &[(&str, &str)] = &[
    ("MK-V", "T-5919"),
    ("mk-v", "T-5919"),
    ("MK-III", "T-3701"),
    ("mk-iii", "T-3701"),
    ("J-TYPE", "T-5393"),
    ("j-type", "T-5393"),
];

/// Reformat one contract reference into `RB L. No. <number>, Dt. <date>`.
///
/// References that already carry both markers, and references without a
/// `dated` word, are returned unchanged.
///
/// ```
/// use inspection_cert_sdk::normalize::reformat_contract_reference;
///
/// assert_eq!(
///     reformat_contract_reference("PO-123 dated 01/01/2024"),
///     "RB L. No. PO-123, Dt. 01/01/2024"
/// );
/// assert_eq!(reformat_contract_reference("PO-123"), "PO-123");
/// ```
pub fn reformat_contract_reference(reference: &str) -> String {
    if reference.contains(REFERENCE_MARKER) && reference.contains(DATE_MARKER) {
        return reference.to_string();
    }
    let Some(caps) = DATED_PATTERN.captures(reference) else {
        return reference.to_string();
    };
    let number = LEADING_MARKER.replace(caps[1].trim(), "");
    let date = caps[2].trim();
    format!("{REFERENCE_MARKER} {number}, {DATE_MARKER} {date}")
}

/// Contract reference field text from a raw source value.
///
/// Arrays are reformatted element by element and joined with newlines;
/// elements without text are dropped.
pub fn contract_reference(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            let lines: Vec<String> = items
                .iter()
                .filter_map(value_text)
                .map(|item| reformat_contract_reference(&item))
                .collect();
            if lines.is_empty() {
                None
            } else {
                Some(lines.join("\n"))
            }
        }
        other => value_text(other).map(|text| reformat_contract_reference(&text)),
    }
}

/// Drawing code for an ERC type, if the type is known
pub fn lookup_drawing(erc_type: &str) -> Option<&'static str> {
    let find = |key: &str| {
        DRAWING_CODES
            .iter()
            .find(|(known, _)| *known == key)
            .map(|(_, code)| *code)
    };
    find(erc_type).or_else(|| find(&erc_type.to_lowercase()))
}

/// `"<type> : <code>"`, degrading to `"<type> : <type>"` for unknown types.
/// Without an ERC type the raw drawing-number keys are used instead.
pub fn drawing_number(call: &CallRecord) -> Option<String> {
    match call
        .first_text(ERC_TYPE_SOURCES)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
    {
        Some(erc_type) => {
            let code = lookup_drawing(&erc_type).unwrap_or(erc_type.as_str());
            Some(format!("{erc_type} : {code}"))
        }
        None => call.first_text(DRAWING_NO_SOURCES),
    }
}

/// Strip BOM and zero-width spaces, fold line breaks into spaces, trim
pub fn sanitize_certificate_no(raw: &str) -> String {
    let visible: String = raw
        .chars()
        .filter(|c| !matches!(c, '\u{FEFF}' | '\u{200B}'))
        .collect();
    LINE_BREAKS.replace_all(&visible, " ").trim().to_string()
}

/// Lot entries from the first array-valued lot key. Non-array values and
/// non-object elements are skipped.
pub fn lots_from(call: &CallRecord) -> Vec<LotEntry> {
    let Some(items) = LOT_SOURCES
        .iter()
        .filter_map(|key| call.get(key))
        .find_map(Value::as_array)
    else {
        if LOT_SOURCES.iter().any(|key| call.get(key).is_some_and(is_present)) {
            tracing::warn!("Lot data is not an array; treating as empty");
        }
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .map(|lot| LotEntry {
            heat_or_lot_no: LOT_NO_SOURCES
                .iter()
                .filter_map(|key| lot.get(*key))
                .find_map(value_text)
                .unwrap_or_default(),
            total_processed: lot_quantity(lot, LOT_PROCESSED_SOURCES),
            accepted_qty: lot_quantity(lot, LOT_ACCEPTED_SOURCES),
            rejected_qty: lot_quantity(lot, LOT_REJECTED_SOURCES),
        })
        .collect()
}

fn lot_quantity(lot: &Map<String, Value>, keys: &[&str]) -> u64 {
    keys.iter()
        .filter_map(|key| lot.get(*key))
        .find(|value| is_present(value))
        .map(quantity)
        .unwrap_or(0)
}

/// Whole-unit quantity from a number or numeric string. Negative, fractional
/// parts, and anything non-numeric collapse toward 0.
pub fn quantity(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().map(float_quantity))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(float_quantity))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn float_quantity(f: f64) -> u64 {
    if f.is_finite() && f > 0.0 {
        f.trunc() as u64
    } else {
        0
    }
}
