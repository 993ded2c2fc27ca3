use std::fs::File;
use std::path::Path;

use polars::io::parquet::write::{ParquetCompression, ParquetWriter};
use polars::prelude::*;
use thiserror::Error;

use crate::pipeline::AnalysisReport;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Polars operation failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Columns a plotting collaborator draws from: absolute time, elapsed seconds,
/// the observed value and, optionally, the fitted trend at each sample.
pub fn trend_frame(report: &AnalysisReport, include_trend: bool) -> Result<DataFrame, OutputError> {
    let timestamps: Vec<i64> = report
        .series
        .timestamps()
        .iter()
        .map(|timestamp| timestamp.and_utc().timestamp_micros())
        .collect();
    let ts_series = Series::new("timestamp".into(), timestamps)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;

    let mut columns: Vec<Column> = vec![
        ts_series.into(),
        Series::new("elapsed_s".into(), report.axis.elapsed_seconds().to_vec()).into(),
        Series::new("value".into(), report.series.values()).into(),
    ];
    if include_trend {
        columns.push(Series::new("trend".into(), report.trend_values()).into());
    }

    Ok(DataFrame::new(columns)?)
}

pub fn write_parquet(df: &DataFrame, path: &Path) -> Result<(), OutputError> {
    let mut file = File::create(path)?;
    let mut clone = df.clone();
    ParquetWriter::new(&mut file)
        .with_compression(ParquetCompression::Zstd(None))
        .finish(&mut clone)?;
    Ok(())
}
