//! Production line labels
//!
//! Lines are stored under positional ids ("Line-1", "Line-2", ...) and shown
//! under the number the inspector picked together with the call number, e.g.
//! `Line-3 (EP-01270001)`.

use crate::models::{LineInfo, LineMapping, ProductionLine};

/// Internal id for the line at `index` (0-based)
pub fn internal_line_id(index: usize) -> String {
    format!("Line-{}", index + 1)
}

/// `Line-<n> (<callNo>)`, or empty when either part is missing
pub fn line_display_label(line_number: u32, call_no: &str) -> String {
    if line_number == 0 || call_no.is_empty() {
        return String::new();
    }
    format!("Line-{line_number} ({call_no})")
}

/// Map every present line to its display information.
///
/// Absent positions are skipped without shifting the ids of later lines.
/// Lines without a (non-zero) line number display their 1-based position.
pub fn build_line_mapping(lines: &[Option<ProductionLine>]) -> LineMapping {
    let mut mapping = LineMapping::new();
    for (index, line) in lines.iter().enumerate() {
        let Some(line) = line else {
            continue;
        };
        let display_number = line
            .line_number
            .filter(|n| *n != 0)
            .unwrap_or_else(|| position_number(index));
        let call_no = line.call_no().unwrap_or_default().to_string();
        mapping.insert(
            internal_line_id(index),
            LineInfo {
                display_number,
                display_label: line_display_label(display_number, &call_no),
                call_no,
                index,
            },
        );
    }
    mapping
}

fn position_number(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_needs_both_parts() {
        assert_eq!(line_display_label(3, "EP-01270001"), "Line-3 (EP-01270001)");
        assert_eq!(line_display_label(3, ""), "");
        assert_eq!(line_display_label(0, "EP-01"), "");
    }

    #[test]
    fn test_mapping_skips_absent_positions() {
        let lines = vec![
            Some(ProductionLine::new(Some(3), "EP-01270001")),
            None,
            Some(ProductionLine::new(None, "EP-01270002")),
        ];

        let mapping = build_line_mapping(&lines);

        assert_eq!(mapping.len(), 2);
        assert!(!mapping.contains("Line-2"));
        let third = mapping.get("Line-3").unwrap();
        assert_eq!(third.display_number, 3);
        assert_eq!(third.index, 2);
        assert_eq!(third.display_label, "Line-3 (EP-01270002)");
    }

    #[test]
    fn test_mapping_without_call_has_empty_label() {
        let lines = vec![Some(ProductionLine {
            line_number: Some(2),
            ic_number: None,
        })];
        let info = build_line_mapping(&lines).get("Line-1").cloned().unwrap();
        assert_eq!(info.call_no, "");
        assert_eq!(info.display_label, "");
        assert_eq!(info.display_number, 2);
    }

    #[test]
    fn test_zero_line_number_uses_position() {
        let lines = vec![None, Some(ProductionLine::new(Some(0), "EP-9"))];
        let info = build_line_mapping(&lines).get("Line-2").cloned().unwrap();
        assert_eq!(info.display_number, 2);
    }
}
