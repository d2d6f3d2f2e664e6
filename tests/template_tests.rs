//! Template build/import tests

use inspection_cert_sdk::export::{build_template, export_template, template_filename};
use inspection_cert_sdk::import::{
    CsvMode, ImportError, import_template, parse_template, parse_template_with,
    read_template_file,
};
use proptest::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_template_csv_shape() {
    let export = export_template("toe_load", 3, "Toe Load (N)").unwrap();
    assert_eq!(export.filename, "toe_load_3samples.csv");
    assert_eq!(export.content, "Sample No.,Toe Load (N)\n1,\n2,\n3,");
    assert_eq!(template_filename("hardness", 10), "hardness_10samples.csv");
}

#[test]
fn test_zero_sample_size_is_rejected() {
    assert!(build_template(0, "Value").is_err());
    assert!(matches!(
        parse_template("Sample No.,Value\n1,5", 0),
        Err(ImportError::InvalidSampleSize(0))
    ));
}

#[test]
fn test_padding_with_fewer_rows() {
    let values = parse_template("Sample No.,Value\n1,v1\n2,v2", 5).unwrap();
    assert_eq!(values, vec!["v1", "v2", "", "", ""]);
}

#[test]
fn test_extra_rows_are_ignored() {
    let values = parse_template("Sample No.,Value\n1,a\n2,b\n3,c\n4,d", 2).unwrap();
    assert_eq!(values, vec!["a", "b"]);
}

#[test]
fn test_header_only_is_empty_data() {
    let err = parse_template("Sample No.,Value\n\n   \n", 3).unwrap_err();
    assert!(matches!(err, ImportError::EmptyData));
    assert_eq!(err.to_string(), "Invalid file: No data rows found");
    assert!(matches!(parse_template("", 3), Err(ImportError::EmptyData)));
}

#[test]
fn test_crlf_and_blank_lines_tolerated() {
    let values = parse_template("Sample No.,Value\r\n1, 12.5 \r\n\r\n2,13.0\r\n", 3).unwrap();
    assert_eq!(values, vec!["12.5", "13.0", ""]);
}

#[test]
fn test_missing_value_column_reads_empty() {
    let values = parse_template("Sample No.,Value\n1\n2,7", 2).unwrap();
    assert_eq!(values, vec!["", "7"]);
}

#[test]
fn test_naive_mode_splits_quoted_commas() {
    let text = "Sample No.,Value\n1,\"12,5\"\n2,13";
    let naive = parse_template_with(text, 2, CsvMode::Naive).unwrap();
    assert_eq!(naive, vec!["\"12", "13"]);

    let strict = parse_template_with(text, 2, CsvMode::Strict).unwrap();
    assert_eq!(strict, vec!["12,5", "13"]);
}

#[test]
fn test_sample_sizes_above_ten_thousand() {
    let csv = build_template(12_000, "Value").unwrap().to_csv().unwrap();
    assert_eq!(csv.lines().count(), 12_001);
    for mode in [CsvMode::Naive, CsvMode::Strict] {
        let values = parse_template_with(&csv, 12_000, mode).unwrap();
        assert_eq!(values.len(), 12_000);
    }

    let values = parse_template("Sample No.,Value\n1,a", 10_001).unwrap();
    assert_eq!(values.len(), 10_001);
    assert_eq!(values[0], "a");
}

#[test]
fn test_empty_row_keeps_its_position_in_both_modes() {
    let text = "Sample No.,Value\n1,a\n,\n3,c";
    for mode in [CsvMode::Naive, CsvMode::Strict] {
        let values = parse_template_with(text, 3, mode).unwrap();
        assert_eq!(values, vec!["a", "", "c"], "{mode} mode");
    }
}

#[test]
fn test_label_with_comma_round_trips_in_strict_mode() {
    let template = build_template(2, "Load, kN").unwrap();
    let csv = template.to_csv().unwrap();
    assert!(csv.starts_with("Sample No.,\"Load, kN\"\n"));
    let values = parse_template_with(&csv, 2, CsvMode::Strict).unwrap();
    assert_eq!(values, vec!["", ""]);
}

#[test]
fn test_import_counts_filled_values() {
    let imported = import_template("Sample No.,Value\n1,4\n2,\n3,6", 4, CsvMode::Naive).unwrap();
    assert_eq!(imported.values, vec!["4", "", "6", ""]);
    assert_eq!(imported.filled_count, 2);
    assert_eq!(imported.summary(), "Successfully imported 2 values");
}

#[test]
fn test_read_template_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "Sample No.,Value\n1,101\n2,99").unwrap();
    file.flush().unwrap();

    let imported = read_template_file(file.path(), 3, CsvMode::Naive).unwrap();
    assert_eq!(imported.values, vec!["101", "99", ""]);
}

#[test]
fn test_read_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_template_file(dir.path().join("missing.csv"), 3, CsvMode::Naive);
    assert!(matches!(result, Err(ImportError::ReadError(_))));
}

#[cfg(feature = "native-fs")]
#[tokio::test]
async fn test_read_template_file_async() {
    use inspection_cert_sdk::import::read_template_file_async;

    let mut file = NamedTempFile::new().unwrap();
    write!(file, "Sample No.,Value\n1,8").unwrap();
    file.flush().unwrap();

    let imported = read_template_file_async(file.path(), 2, CsvMode::Strict)
        .await
        .unwrap();
    assert_eq!(imported.values, vec!["8", ""]);
    assert_eq!(imported.filled_count, 1);
}

proptest! {
    #[test]
    fn prop_blank_template_round_trips(size in 1usize..300, label in "[A-Za-z0-9 ()]{0,20}") {
        let csv = build_template(size, &label).unwrap().to_csv().unwrap();
        prop_assert_eq!(csv.lines().count(), size + 1);
        for mode in [CsvMode::Naive, CsvMode::Strict] {
            let values = parse_template_with(&csv, size, mode).unwrap();
            prop_assert_eq!(values.len(), size);
            prop_assert!(values.iter().all(String::is_empty));
        }
    }

    #[test]
    fn prop_output_length_is_sample_size(
        rows in prop::collection::vec("[0-9.]{0,6}", 1..20),
        size in 1usize..40,
    ) {
        let mut text = String::from("Sample No.,Value");
        for (i, value) in rows.iter().enumerate() {
            text.push_str(&format!("\n{},{}", i + 1, value));
        }
        let values = parse_template(&text, size).unwrap();
        prop_assert_eq!(values.len(), size);
        for (i, value) in values.iter().enumerate() {
            let expected = rows.get(i).map(String::as_str).unwrap_or("");
            prop_assert_eq!(value.as_str(), expected);
        }
    }
}
