use serde::Serialize;
use thermotrend_parser::{normalize, read_raw_records, RawRecord};
use tracing::{info, warn};

use crate::error::Result;
use crate::fitting::{SolverOptions, TrendFit, TrendFitter};
use crate::series::{SampleSeries, TimeAxis};
use crate::statistics::{summarize_axis, SummaryResult};
use crate::timeframe::Timeframe;

/// Everything a renderer or reporter needs from one completed run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub series: SampleSeries,
    pub axis: TimeAxis,
    pub summary: SummaryResult,
    pub trend: TrendFit,
    pub total_records: usize,
    pub retained_records: usize,
}

impl AnalysisReport {
    /// The trend evaluated at this series' own elapsed seconds.
    pub fn trend_values(&self) -> Vec<f64> {
        self.trend.result.evaluate_many(self.axis.elapsed_seconds())
    }

    pub fn used_fallback(&self) -> bool {
        self.trend.used_fallback()
    }
}

#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Completed(Box<AnalysisReport>),
    /// No sample survived normalization and filtering.
    NoData {
        total_records: usize,
        timeframe: Timeframe,
    },
}

impl AnalysisOutcome {
    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            AnalysisOutcome::Completed(report) => Some(report.as_ref()),
            AnalysisOutcome::NoData { .. } => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, AnalysisOutcome::NoData { .. })
    }
}

/// Normalize, filter, summarize, fit. Runs share no state, so one pipeline can
/// serve any number of runs with different timeframes.
#[derive(Debug, Default)]
pub struct AnalysisPipeline {
    fitter: TrendFitter,
}

impl AnalysisPipeline {
    pub fn new(options: SolverOptions) -> Self {
        Self {
            fitter: TrendFitter::new(options),
        }
    }

    pub fn with_fitter(fitter: TrendFitter) -> Self {
        Self { fitter }
    }

    pub fn run_content(&self, content: &str, timeframe: &Timeframe) -> Result<AnalysisOutcome> {
        let rows = read_raw_records(content)?;
        self.run(&rows, timeframe)
    }

    pub fn run(&self, rows: &[RawRecord], timeframe: &Timeframe) -> Result<AnalysisOutcome> {
        let series = SampleSeries::new(normalize(rows)?)?;
        let total_records = series.len();

        let filtered = timeframe.apply(&series);
        let retained_records = filtered.len();
        info!(
            total_records,
            retained_records,
            timeframe = %timeframe,
            "applied timeframe filter"
        );

        if filtered.is_empty() {
            warn!(total_records, timeframe = %timeframe, "no samples left to analyze");
            return Ok(AnalysisOutcome::NoData {
                total_records,
                timeframe: *timeframe,
            });
        }

        let axis = filtered.time_axis();
        let values = filtered.values();

        let summary = summarize_axis(&axis, &values)?;
        info!(
            mean = summary.mean,
            variance = summary.variance,
            rise_per_hour = summary.rise_per_hour,
            "computed summary statistics"
        );

        let trend = self.fitter.fit(&axis, &values)?;
        info!(
            model = trend.result.model_name(),
            fallback = trend.used_fallback(),
            "fitted trend"
        );

        Ok(AnalysisOutcome::Completed(Box::new(AnalysisReport {
            series: filtered,
            axis,
            summary,
            trend,
            total_records,
            retained_records,
        })))
    }
}
