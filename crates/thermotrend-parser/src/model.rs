use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One untyped row as it arrived from the logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line in the source text.
    pub line_index: usize,
    pub timestamp: String,
    pub value: String,
}

impl RawRecord {
    pub fn new(line_index: usize, timestamp: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            line_index,
            timestamp: timestamp.into(),
            value: value.into(),
        }
    }
}

/// Builds records from `(timestamp, value)` pairs, numbering lines from 1.
pub fn records_from_pairs<T, V>(pairs: impl IntoIterator<Item = (T, V)>) -> Vec<RawRecord>
where
    T: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .enumerate()
        .map(|(idx, (timestamp, value))| RawRecord::new(idx + 1, timestamp, value))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}
