//! Production line models
//!
//! Process inspections can span several production lines, each tied to an
//! inspection call. Lines are identified internally by array position
//! ("Line-1", "Line-2", ...) while the label shown to users comes from the
//! line number the inspector picked.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One production line entry as edited by the inspector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionLine {
    /// User-selected line number (1-5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    /// Inspection call number this line belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ic_number: Option<String>,
}

impl ProductionLine {
    pub fn new(line_number: Option<u32>, ic_number: impl Into<String>) -> Self {
        Self {
            line_number,
            ic_number: Some(ic_number.into()),
        }
    }

    /// Call number, treating an empty string as missing
    pub fn call_no(&self) -> Option<&str> {
        self.ic_number.as_deref().filter(|s| !s.is_empty())
    }
}

/// Display information for one production line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineInfo {
    pub display_number: u32,
    pub call_no: String,
    pub display_label: String,
    pub index: usize,
}

/// Internal line id → display information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineMapping(BTreeMap<String, LineInfo>);

impl LineMapping {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, internal_id: String, info: LineInfo) {
        self.0.insert(internal_id, info);
    }

    pub fn get(&self, internal_id: &str) -> Option<&LineInfo> {
        self.0.get(internal_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, internal_id: &str) -> bool {
        self.0.contains_key(internal_id)
    }

    /// Entries ordered by array position ("Line-2" before "Line-10")
    pub fn in_position_order(&self) -> Vec<(&str, &LineInfo)> {
        let mut entries: Vec<(&str, &LineInfo)> =
            self.0.iter().map(|(id, info)| (id.as_str(), info)).collect();
        entries.sort_by_key(|(_, info)| info.index);
        entries
    }
}
