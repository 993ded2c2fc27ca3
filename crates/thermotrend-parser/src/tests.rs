use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::{
    extract_numeric, normalize, parse_timestamp, read_raw_records, records_from_pairs,
    ParserError,
};

fn fixture(path: &str) -> String {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let full_path = base.join("tests/data").join(path);
    fs::read_to_string(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

#[test]
fn reads_and_normalizes_cpu_log() {
    let content = fixture("cpu_temps.csv");
    let records = read_raw_records(&content).expect("read failed");

    // header + six readings; the blank line is dropped
    assert_eq!(records.len(), 7);
    assert_eq!(records[0].timestamp, "Datetime");
    assert_eq!(records[6].value, "temp=46.7'C");

    let samples = normalize(&records).expect("normalize failed");
    assert_eq!(samples.len(), 6);
    assert_eq!(
        samples[0].timestamp,
        NaiveDate::from_ymd_opt(2024, 3, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    );
    assert!((samples[0].value - 41.2).abs() < 1e-12);
    assert!((samples[5].value - 46.7).abs() < 1e-12);
}

#[test]
fn malformed_timestamp_aborts_with_line_index() {
    let content = fixture("corrupt_timestamp.csv");
    let records = read_raw_records(&content).expect("read failed");
    let err = normalize(&records).expect_err("corrupt row should fail");

    assert_eq!(err.line_index(), Some(4));
    assert!(err.to_string().contains("not-a-date"));
}

#[test]
fn value_without_digits_is_rejected() {
    let records = records_from_pairs([
        ("Datetime", "CPU_Temp"),
        ("2024-01-01 00:00:00", "n/a"),
    ]);
    let err = normalize(&records).expect_err("non-numeric value should fail");
    assert!(matches!(err, ParserError::DataRow { line_index: 2, .. }));
}

#[test]
fn header_only_input_yields_no_samples() {
    let records = records_from_pairs([("Datetime", "CPU_Temp")]);
    assert!(normalize(&records).unwrap().is_empty());
}

#[test]
fn empty_content_is_an_error() {
    assert!(matches!(read_raw_records(""), Err(ParserError::EmptyData)));
}

#[test]
fn single_field_row_is_rejected() {
    let err = read_raw_records("Datetime,CPU_Temp\n2024-01-01 00:00:00\n")
        .expect_err("short row should fail");
    assert_eq!(err.line_index(), Some(2));
}

#[test]
fn one_field_label_line_is_treated_as_header() {
    let content = "CPU temperature log\n2024-01-01 00:00:00,40.0C\n2024-01-01 01:00:00,42.0C\n";
    let records = read_raw_records(content).expect("label header should be accepted");

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].timestamp, "CPU temperature log");
    assert_eq!(records[0].value, "");

    let samples = normalize(&records).expect("normalize failed");
    assert_eq!(samples.len(), 2);
    assert!((samples[1].value - 42.0).abs() < 1e-12);
}

#[test]
fn extracts_first_numeric_run() {
    assert_eq!(extract_numeric("47.3C"), Some(47.3));
    assert_eq!(extract_numeric("temp=47.3'C"), Some(47.3));
    assert_eq!(extract_numeric("  52 "), Some(52.0));
    assert_eq!(extract_numeric("1.2.3"), Some(1.2));
    assert_eq!(extract_numeric("-5C"), Some(5.0));
    assert_eq!(extract_numeric("v. 38.5"), Some(38.5));
    assert_eq!(extract_numeric("."), None);
    assert_eq!(extract_numeric("°C"), None);
}

#[test]
fn accepts_common_timestamp_layouts() {
    let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(12, 30, 0)
        .unwrap();

    assert_eq!(parse_timestamp("2024-01-01 12:30:00"), Some(expected));
    assert_eq!(parse_timestamp("2024-01-01T12:30:00"), Some(expected));
    assert_eq!(parse_timestamp("2024-01-01 12:30"), Some(expected));
    assert_eq!(parse_timestamp(" 2024-01-01 12:30:00.000 "), Some(expected));
    assert_eq!(parse_timestamp("2024-01-01T14:30:00+02:00"), Some(expected));
    assert_eq!(parse_timestamp("01/01/2024"), None);
}
