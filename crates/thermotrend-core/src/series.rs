use chrono::NaiveDateTime;
use serde::Serialize;
use thermotrend_parser::Sample;

use crate::error::{AnalysisError, Result};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Samples in input order. The time origin is always the minimum timestamp
/// of the samples currently held, so a filtered copy gets its own origin.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampleSeries {
    samples: Vec<Sample>,
}

impl SampleSeries {
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        if let Some(bad) = samples.iter().find(|sample| !sample.value.is_finite()) {
            return Err(AnalysisError::NonFiniteValue {
                timestamp: bad.timestamp,
                value: bad.value,
            });
        }
        Ok(Self { samples })
    }

    /// Keeps the samples matching `keep`, preserving order.
    pub(crate) fn retain_matching(&self, keep: impl Fn(&Sample) -> bool) -> Self {
        Self {
            samples: self.samples.iter().copied().filter(|s| keep(s)).collect(),
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn origin(&self) -> Option<NaiveDateTime> {
        self.samples.iter().map(|sample| sample.timestamp).min()
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|sample| sample.value).collect()
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.samples.iter().map(|sample| sample.timestamp).collect()
    }

    /// Elapsed time of every sample, measured from this series' origin.
    pub fn time_axis(&self) -> TimeAxis {
        let origin = self.origin();
        let elapsed_seconds = match origin {
            Some(origin) => self
                .samples
                .iter()
                .map(|sample| seconds_between(origin, sample.timestamp))
                .collect(),
            None => Vec::new(),
        };
        TimeAxis {
            origin,
            elapsed_seconds,
        }
    }
}

/// Elapsed-time coordinates shared by the statistics and the trend fit of a
/// single run, so both read the same origin.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeAxis {
    origin: Option<NaiveDateTime>,
    elapsed_seconds: Vec<f64>,
}

impl TimeAxis {
    pub fn origin(&self) -> Option<NaiveDateTime> {
        self.origin
    }

    pub fn elapsed_seconds(&self) -> &[f64] {
        &self.elapsed_seconds
    }

    pub fn elapsed_hours(&self) -> Vec<f64> {
        self.elapsed_seconds
            .iter()
            .map(|seconds| seconds / SECONDS_PER_HOUR)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.elapsed_seconds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elapsed_seconds.is_empty()
    }
}

fn seconds_between(origin: NaiveDateTime, timestamp: NaiveDateTime) -> f64 {
    let delta = timestamp - origin;
    delta
        .num_microseconds()
        .map(|micros| micros as f64 / 1_000_000.0)
        .unwrap_or_else(|| delta.num_milliseconds() as f64 / 1_000.0)
}
