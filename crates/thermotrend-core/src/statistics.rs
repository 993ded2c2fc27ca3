use std::fmt;

use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::series::{SampleSeries, TimeAxis};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryResult {
    pub mean: f64,
    pub variance: f64,
    /// Least-squares slope against hours since the series origin.
    pub rise_per_hour: f64,
}

impl fmt::Display for SummaryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mean: {:.2}°C", self.mean)?;
        writeln!(f, "Variance: {:.2}", self.variance)?;
        write!(f, "Rise per hour: {:.2}°C/h", self.rise_per_hour)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearCoefficients {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearCoefficients {
    pub fn evaluate(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

pub fn summarize(series: &SampleSeries) -> Result<SummaryResult> {
    summarize_axis(&series.time_axis(), &series.values())
}

/// Computes mean, variance, then rise rate. The order fixes which statistic
/// is reported when the input is too small: empty input fails on `mean`, a
/// single sample on `variance`, a zero time span on `rise_per_hour`.
pub fn summarize_axis(axis: &TimeAxis, values: &[f64]) -> Result<SummaryResult> {
    let mean = mean(values)?;
    let variance = sample_variance(values)?;
    let hours = axis.elapsed_hours();
    let rise = fit_line("rise_per_hour", &hours, values)?;

    Ok(SummaryResult {
        mean,
        variance,
        rise_per_hour: rise.slope,
    })
}

pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(AnalysisError::InsufficientData {
            statistic: "mean",
            required: 1,
            found: 0,
        });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance with an `N - 1` denominator.
pub fn sample_variance(values: &[f64]) -> Result<f64> {
    if values.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            statistic: "variance",
            required: 2,
            found: values.len(),
        });
    }
    let mean = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Ok((sum_sq / (values.len() - 1) as f64).max(0.0))
}

/// Ordinary least-squares line through `(x, y)`.
pub fn least_squares_line(x: &[f64], y: &[f64]) -> Result<LinearCoefficients> {
    fit_line("least_squares_line", x, y)
}

pub(crate) fn fit_line(
    statistic: &'static str,
    x: &[f64],
    y: &[f64],
) -> Result<LinearCoefficients> {
    let n = x.len().min(y.len());
    if n < 2 {
        return Err(AnalysisError::InsufficientData {
            statistic,
            required: 2,
            found: n,
        });
    }
    let (x, y) = (&x[..n], &y[..n]);

    let x_mean = x.iter().sum::<f64>() / n as f64;
    let y_mean = y.iter().sum::<f64>() / n as f64;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        sxx += dx * dx;
        sxy += dx * (yi - y_mean);
    }

    if sxx <= 0.0 || !sxx.is_finite() {
        return Err(AnalysisError::DegenerateInput { statistic });
    }

    let slope = sxy / sxx;
    Ok(LinearCoefficients {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}
