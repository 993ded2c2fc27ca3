use anyhow::Result;
use polars::prelude::*;
use thermotrend_core::outputs::{trend_frame, write_parquet};
use thermotrend_core::{AnalysisPipeline, Timeframe};
use thermotrend_parser::records_from_pairs;

fn completed_report() -> thermotrend_core::AnalysisReport {
    let rows = records_from_pairs([
        ("Datetime", "CPU_Temp"),
        ("2024-05-01 12:00:00", "temp=50.0'C"),
        ("2024-05-01 12:10:00", "temp=53.0'C"),
        ("2024-05-01 12:20:00", "temp=54.5'C"),
        ("2024-05-01 12:30:00", "temp=55.2'C"),
    ]);
    let outcome = AnalysisPipeline::default()
        .run(&rows, &Timeframe::unbounded())
        .expect("pipeline run");
    outcome.report().expect("completed run").clone()
}

#[test]
fn trend_frame_carries_plot_columns() -> Result<()> {
    let report = completed_report();
    let df = trend_frame(&report, true)?;

    assert_eq!(df.height(), 4);
    let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
    assert_eq!(names, ["timestamp", "elapsed_s", "value", "trend"]);

    let elapsed = df.column("elapsed_s")?.f64()?;
    assert_eq!(elapsed.get(0), Some(0.0));
    assert_eq!(elapsed.get(3), Some(1800.0));

    let trend = df.column("trend")?.f64()?;
    let expected = report.trend_values();
    assert_eq!(trend.get(2), Some(expected[2]));
    Ok(())
}

#[test]
fn trend_column_is_optional() -> Result<()> {
    let df = trend_frame(&completed_report(), false)?;
    assert_eq!(df.width(), 3);
    assert!(df.column("trend").is_err());
    Ok(())
}

#[test]
fn parquet_export_round_trips_row_count() -> Result<()> {
    let df = trend_frame(&completed_report(), true)?;
    let path = std::env::temp_dir().join(format!("thermotrend-{}.parquet", std::process::id()));

    write_parquet(&df, &path)?;
    let file = std::fs::File::open(&path)?;
    let read_back = ParquetReader::new(file).finish()?;
    std::fs::remove_file(&path)?;

    assert_eq!(read_back.height(), df.height());
    assert_eq!(read_back.width(), df.width());
    Ok(())
}
