//! Certificate view models
//!
//! Three certificate kinds share one flat, fully-keyed representation. The set
//! of keys is fixed per kind by the normalization rule tables, so presentation
//! code can read any declared field without checking for it first.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::normalize::rules::rules_for;

/// Kind of inspection certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CertificateKind {
    /// Raw material inspection certificate
    RawMaterial,
    /// In-process inspection certificate
    Process,
    /// Final product inspection certificate
    FinalProduct,
}

impl CertificateKind {
    pub const ALL: [CertificateKind; 3] = [
        CertificateKind::RawMaterial,
        CertificateKind::Process,
        CertificateKind::FinalProduct,
    ];

    /// Human-readable title used for document metadata
    pub fn title(&self) -> &'static str {
        match self {
            CertificateKind::RawMaterial => "Raw Material Inspection Certificate",
            CertificateKind::Process => "Process Inspection Certificate",
            CertificateKind::FinalProduct => "Final Product Inspection Certificate",
        }
    }

    /// Filename used when a certificate has no number yet
    pub fn default_file_stem(&self) -> &'static str {
        match self {
            CertificateKind::RawMaterial => "RawMaterialIC",
            CertificateKind::Process => "ProcessMaterialIC",
            CertificateKind::FinalProduct => "FinalProductIC",
        }
    }

    /// Declared field names, in rule-table order
    pub fn field_names(self) -> impl Iterator<Item = &'static str> {
        rules_for(self).iter().map(|rule| rule.name)
    }
}

impl FromStr for CertificateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "raw-material" | "rawmaterial" | "rm" => Ok(CertificateKind::RawMaterial),
            "process" | "process-material" => Ok(CertificateKind::Process),
            "final-product" | "finalproduct" | "final" => Ok(CertificateKind::FinalProduct),
            _ => Err(format!(
                "Unknown certificate kind: {}. Use 'raw-material', 'process' or 'final-product'.",
                s
            )),
        }
    }
}

impl fmt::Display for CertificateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertificateKind::RawMaterial => write!(f, "raw-material"),
            CertificateKind::Process => write!(f, "process"),
            CertificateKind::FinalProduct => write!(f, "final-product"),
        }
    }
}

/// One heat/lot row of a process certificate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotEntry {
    pub heat_or_lot_no: String,
    pub total_processed: u64,
    pub accepted_qty: u64,
    pub rejected_qty: u64,
}

/// Column sums over a certificate's lots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotTotals {
    pub total_processed: u64,
    pub total_accepted: u64,
    pub total_rejected: u64,
}

impl LotTotals {
    pub fn from_lots(lots: &[LotEntry]) -> Self {
        lots.iter().fold(Self::default(), |acc, lot| Self {
            total_processed: acc.total_processed.saturating_add(lot.total_processed),
            total_accepted: acc.total_accepted.saturating_add(lot.accepted_qty),
            total_rejected: acc.total_rejected.saturating_add(lot.rejected_qty),
        })
    }
}

/// Fixed-shape certificate data consumed by presentation.
///
/// Serializes as one flat camelCase object: `kind`, every declared field,
/// then `lots` and `totals`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificateViewModel {
    pub kind: CertificateKind,
    #[serde(flatten)]
    fields: BTreeMap<String, String>,
    pub lots: Vec<LotEntry>,
    pub totals: LotTotals,
}

impl CertificateViewModel {
    /// All declared fields present and empty, no defaults, no lots
    pub fn blank(kind: CertificateKind) -> Self {
        let fields = kind
            .field_names()
            .map(|name| (name.to_string(), String::new()))
            .collect();
        Self {
            kind,
            fields,
            lots: Vec::new(),
            totals: LotTotals::default(),
        }
    }

    /// Assemble a view model from normalized parts. Declared fields missing
    /// from `fields` are filled with empty strings; undeclared ones are dropped.
    pub(crate) fn from_parts(
        kind: CertificateKind,
        mut fields: BTreeMap<String, String>,
        lots: Vec<LotEntry>,
    ) -> Self {
        let mut model = Self::blank(kind);
        for (name, slot) in model.fields.iter_mut() {
            if let Some(value) = fields.remove(name) {
                *slot = value;
            }
        }
        model.totals = LotTotals::from_lots(&lots);
        model.lots = lots;
        model
    }

    /// Field value, or `""` for names this kind does not declare
    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn declares(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// True when every field is empty and there are no lots
    pub fn is_blank(&self) -> bool {
        self.lots.is_empty() && self.fields.values().all(|v| v.is_empty())
    }

    /// Set a declared field. Returns false (and changes nothing) for
    /// undeclared names.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.fields.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Apply manual edits on top of normalized data.
    ///
    /// Returns the names that were ignored because the kind does not declare
    /// them.
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, String>) -> Vec<String> {
        let mut ignored = Vec::new();
        for (name, value) in overrides {
            if !self.set(name, value.clone()) {
                ignored.push(name.clone());
            }
        }
        if !ignored.is_empty() {
            tracing::warn!(
                "Ignored {} override(s) not declared for {} certificates: {}",
                ignored.len(),
                self.kind,
                ignored.join(", ")
            );
        }
        ignored
    }

    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_display() {
        for kind in CertificateKind::ALL {
            assert_eq!(kind.to_string().parse::<CertificateKind>(), Ok(kind));
        }
        assert_eq!("RM".parse::<CertificateKind>(), Ok(CertificateKind::RawMaterial));
        assert_eq!(
            "final_product".parse::<CertificateKind>(),
            Ok(CertificateKind::FinalProduct)
        );
        assert!("billing".parse::<CertificateKind>().is_err());
    }

    #[test]
    fn test_blank_declares_every_field() {
        for kind in CertificateKind::ALL {
            let blank = CertificateViewModel::blank(kind);
            assert!(blank.is_blank());
            for name in kind.field_names() {
                assert!(blank.declares(name), "{kind} should declare {name}");
                assert_eq!(blank.get(name), "");
            }
        }
    }

    #[test]
    fn test_overrides_only_touch_declared_fields() {
        let mut model = CertificateViewModel::blank(CertificateKind::FinalProduct);
        let mut edits = BTreeMap::new();
        edits.insert("qtyNowPassed".to_string(), "1200".to_string());
        edits.insert("notAField".to_string(), "x".to_string());

        let ignored = model.apply_overrides(&edits);

        assert_eq!(ignored, vec!["notAField".to_string()]);
        assert_eq!(model.get("qtyNowPassed"), "1200");
        assert_eq!(model.get("notAField"), "");
        assert!(!model.declares("notAField"));
    }

    #[test]
    fn test_totals_saturate() {
        let lots = vec![
            LotEntry {
                accepted_qty: u64::MAX,
                ..Default::default()
            },
            LotEntry {
                accepted_qty: 5,
                ..Default::default()
            },
        ];
        assert_eq!(LotTotals::from_lots(&lots).total_accepted, u64::MAX);
    }

    #[test]
    fn test_serializes_flat() {
        let model = CertificateViewModel::blank(CertificateKind::Process);
        let json = model.to_json().unwrap();
        assert_eq!(json["kind"], "process");
        assert_eq!(json["contractRef"], "");
        assert_eq!(json["lots"], serde_json::json!([]));
        assert_eq!(json["totals"]["totalAccepted"], 0);
    }
}
