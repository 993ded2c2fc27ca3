use chrono::{NaiveDate, NaiveDateTime};
use thermotrend_core::{
    AnalysisError, AnalysisOutcome, AnalysisPipeline, FitResult, SolverOptions, Timeframe,
};
use thermotrend_parser::{records_from_pairs, RawRecord};

fn fixture(name: &str) -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../thermotrend-parser/tests/data")
        .join(name);
    std::fs::read_to_string(path).expect("read fixture")
}

fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn three_hour_rows() -> Vec<RawRecord> {
    records_from_pairs([
        ("Datetime", "CPU_Temp"),
        ("2024-01-01 00:00:00", "40.0C"),
        ("2024-01-01 01:00:00", "42.0C"),
        ("2024-01-01 02:00:00", "43.0C"),
    ])
}

#[test]
fn end_to_end_three_hour_run() {
    let outcome = AnalysisPipeline::default()
        .run(&three_hour_rows(), &Timeframe::unbounded())
        .expect("pipeline run");

    let report = outcome.report().expect("completed run");
    assert_eq!(report.series.len(), 3);
    assert_eq!(report.total_records, 3);
    assert_eq!(report.retained_records, 3);
    assert!((report.summary.mean - 41.67).abs() < 0.005);
    assert!((report.summary.variance - 7.0 / 3.0).abs() < 1e-9);
    assert!((report.summary.rise_per_hour - 1.5).abs() < 1e-9);

    let trend = report.trend_values();
    assert_eq!(trend.len(), 3);
    assert!((trend[0] - 40.0).abs() < 0.5);
}

#[test]
fn start_after_last_sample_reports_no_data() {
    let timeframe = Timeframe::new(Some(at(3)), None).unwrap();
    let outcome = AnalysisPipeline::default()
        .run(&three_hour_rows(), &timeframe)
        .expect("no-data is not an error");

    match outcome {
        AnalysisOutcome::NoData {
            total_records,
            timeframe: reported,
        } => {
            assert_eq!(total_records, 3);
            assert_eq!(reported, timeframe);
        }
        AnalysisOutcome::Completed(_) => panic!("expected a zero-data outcome"),
    }
}

#[test]
fn header_only_input_reports_no_data() {
    let rows = records_from_pairs([("Datetime", "CPU_Temp")]);
    let outcome = AnalysisPipeline::default()
        .run(&rows, &Timeframe::unbounded())
        .unwrap();

    assert!(outcome.is_no_data());
}

#[test]
fn malformed_row_aborts_the_run() {
    let mut rows = three_hour_rows();
    rows.push(RawRecord::new(5, "2024-01-01 03:00:00", "sensor offline"));

    let err = AnalysisPipeline::default()
        .run(&rows, &Timeframe::unbounded())
        .unwrap_err();

    assert!(matches!(err, AnalysisError::Parse(_)));
    assert!(err.to_string().contains("sensor offline"));
}

#[test]
fn single_retained_sample_is_insufficient() {
    let timeframe = Timeframe::new(Some(at(1)), Some(at(1))).unwrap();
    let err = AnalysisPipeline::default()
        .run(&three_hour_rows(), &timeframe)
        .unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::InsufficientData {
            statistic: "variance",
            ..
        }
    ));
}

#[test]
fn runs_with_different_timeframes_do_not_interfere() {
    let pipeline = AnalysisPipeline::default();
    let rows = three_hour_rows();

    let late = Timeframe::new(Some(at(1)), None).unwrap();
    let late_run = pipeline.run(&rows, &late).unwrap();
    let full_run = pipeline.run(&rows, &Timeframe::unbounded()).unwrap();

    let late_report = late_run.report().unwrap();
    let full_report = full_run.report().unwrap();

    assert_eq!(late_report.retained_records, 2);
    assert_eq!(late_report.axis.origin(), Some(at(1)));
    assert!((late_report.summary.rise_per_hour - 1.0).abs() < 1e-9);

    assert_eq!(full_report.retained_records, 3);
    assert_eq!(full_report.axis.origin(), Some(at(0)));
    assert!((full_report.summary.rise_per_hour - 1.5).abs() < 1e-9);
}

#[test]
fn fallback_is_visible_on_the_report() {
    let options = SolverOptions {
        max_evaluations: 1,
        ..SolverOptions::default()
    };
    let outcome = AnalysisPipeline::new(options)
        .run(&three_hour_rows(), &Timeframe::unbounded())
        .unwrap();
    let report = outcome.report().unwrap();

    assert!(report.used_fallback());
    match report.trend.result {
        FitResult::LinearFit { slope, .. } => {
            assert!((slope * 3600.0 - report.summary.rise_per_hour).abs() < 1e-9)
        }
        other => panic!("expected linear fallback, got {other:?}"),
    }
}

#[test]
fn runs_straight_from_log_text() {
    let content = fixture("cpu_temps.csv");
    let timeframe = Timeframe::parse(Some("2024-03-02 10:05:00"), None).unwrap();

    let outcome = AnalysisPipeline::default()
        .run_content(&content, &timeframe)
        .expect("pipeline run");
    let report = outcome.report().expect("completed run");

    assert_eq!(report.total_records, 6);
    assert_eq!(report.retained_records, 5);
    assert!(report.summary.rise_per_hour > 0.0);
    assert_eq!(report.trend_values().len(), 5);
}

#[test]
fn label_line_header_is_discarded() {
    let content = "CPU temperature log\n\
                   2024-01-01 00:00:00,40.0C\n\
                   2024-01-01 01:00:00,42.0C\n\
                   2024-01-01 02:00:00,43.0C\n";
    let outcome = AnalysisPipeline::default()
        .run_content(content, &Timeframe::unbounded())
        .expect("run");

    let report = outcome.report().expect("completed run");
    assert_eq!(report.total_records, 3);
    assert!((report.summary.rise_per_hour - 1.5).abs() < 1e-12);
}
