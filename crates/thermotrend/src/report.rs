use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;
use thermotrend_core::{AnalysisReport, FallbackEvent, FitResult, SummaryResult};

#[derive(Debug, Serialize)]
pub struct ReportView<'a> {
    pub total_records: usize,
    pub retained_records: usize,
    pub summary: &'a SummaryResult,
    pub trend: &'a FitResult,
    pub fallback: Option<&'a FallbackEvent>,
}

impl<'a> From<&'a AnalysisReport> for ReportView<'a> {
    fn from(report: &'a AnalysisReport) -> Self {
        Self {
            total_records: report.total_records,
            retained_records: report.retained_records,
            summary: &report.summary,
            trend: &report.trend.result,
            fallback: report.trend.fallback.as_ref(),
        }
    }
}

pub fn render_table(report: &AnalysisReport) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Metric", "Value"]);

    table.add_row(vec![
        "Records".to_string(),
        format!("{} of {} retained", report.retained_records, report.total_records),
    ]);
    table.add_row(vec![
        "Mean".to_string(),
        format!("{:.2}°C", report.summary.mean),
    ]);
    table.add_row(vec![
        "Variance".to_string(),
        format!("{:.2}", report.summary.variance),
    ]);
    table.add_row(vec![
        "Rise per hour".to_string(),
        format!("{:.2}°C/h", report.summary.rise_per_hour),
    ]);
    table.add_row(vec![
        "Trend model".to_string(),
        report.trend.result.model_name().to_string(),
    ]);
    table.add_row(vec!["Trend".to_string(), describe_fit(&report.trend.result)]);

    if let Some(event) = &report.trend.fallback {
        table.add_row(vec![
            "Warning".to_string(),
            format!(
                "{} fit failed ({}), using {} fit instead",
                event.failed_model, event.reason, event.fallback_model
            ),
        ]);
    }

    table.to_string()
}

fn describe_fit(fit: &FitResult) -> String {
    match fit {
        FitResult::ExponentialFit {
            asymptote,
            amplitude,
            rate,
        } => format!("{asymptote:.2} - {amplitude:.2}·exp(-{rate:.3e}·t)"),
        FitResult::LinearFit { slope, intercept } => {
            format!("{slope:.3e}·t + {intercept:.2}")
        }
    }
}
