use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;
use thermotrend_parser::parse_timestamp;

use crate::error::{AnalysisError, Result};
use crate::series::SampleSeries;

/// Optional inclusive `[start, end]` window on absolute sample time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Timeframe {
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
}

impl Timeframe {
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Result<Self> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(AnalysisError::InvalidTimeframe { start, end });
            }
        }
        Ok(Self { start, end })
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Builds a timeframe from bound text in any accepted timestamp layout.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        Self::new(parse_bound(start)?, parse_bound(end)?)
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.end
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start.map_or(true, |start| timestamp >= start)
            && self.end.map_or(true, |end| timestamp <= end)
    }

    /// Returns the retained samples as a new series; the input is untouched.
    pub fn apply(&self, series: &SampleSeries) -> SampleSeries {
        if self.is_unbounded() {
            return series.clone();
        }
        series.retain_matching(|sample| self.contains(sample.timestamp))
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.start {
            Some(start) => write!(f, "[{start}")?,
            None => f.write_str("(open")?,
        }
        f.write_str(", ")?;
        match self.end {
            Some(end) => write!(f, "{end}]"),
            None => f.write_str("open)"),
        }
    }
}

/// Restricts `series` to the inclusive window given by `start` and `end`.
pub fn filter(
    series: &SampleSeries,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Result<SampleSeries> {
    Ok(Timeframe::new(start, end)?.apply(series))
}

pub fn parse_bound(value: Option<&str>) -> Result<Option<NaiveDateTime>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(text) => parse_timestamp(text)
            .map(Some)
            .ok_or_else(|| AnalysisError::InvalidBound(text.to_string())),
        None => Ok(None),
    }
}
