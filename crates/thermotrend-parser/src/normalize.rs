use crate::errors::ParserError;
use crate::model::{RawRecord, Sample};
use crate::timestamp::parse_timestamp;

/// Converts raw rows into typed samples, discarding the leading header row.
///
/// Row order is preserved. The first malformed row aborts normalization; a
/// bad row usually means the upstream log is corrupt, so it is not skipped.
pub fn normalize(records: &[RawRecord]) -> Result<Vec<Sample>, ParserError> {
    records.iter().skip(1).map(normalize_record).collect()
}

pub fn normalize_record(record: &RawRecord) -> Result<Sample, ParserError> {
    let timestamp = parse_timestamp(&record.timestamp).ok_or_else(|| {
        ParserError::data_row(
            record.line_index,
            format!("invalid timestamp '{}'", record.timestamp.trim()),
        )
    })?;

    let value = extract_numeric(&record.value).ok_or_else(|| {
        ParserError::data_row(
            record.line_index,
            format!("no numeric value in '{}'", record.value.trim()),
        )
    })?;

    Ok(Sample::new(timestamp, value))
}

/// Pulls the first run of digits (with at most one decimal point) out of a
/// decorated reading such as `47.3C` or `temp=47.3'C`.
///
/// Signs are not part of the run. A lone `.` is not a number and scanning
/// continues past it.
pub fn extract_numeric(value: &str) -> Option<f64> {
    let bytes = value.as_bytes();
    let mut search = 0;

    while let Some(offset) = bytes[search..]
        .iter()
        .position(|b| b.is_ascii_digit() || *b == b'.')
    {
        let start = search + offset;
        let mut end = start;
        let mut seen_dot = false;
        while end < bytes.len() {
            match bytes[end] {
                b'0'..=b'9' => end += 1,
                b'.' if !seen_dot => {
                    seen_dot = true;
                    end += 1;
                }
                _ => break,
            }
        }

        let run = &value[start..end];
        if run != "." {
            return run.parse::<f64>().ok().filter(|parsed| parsed.is_finite());
        }
        search = end;
    }

    None
}
