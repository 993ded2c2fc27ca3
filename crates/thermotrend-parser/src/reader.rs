use csv::{ReaderBuilder, Trim};

use crate::errors::ParserError;
use crate::model::RawRecord;

/// Splits comma-separated log text into raw `(timestamp, value)` rows.
///
/// The header row is kept whatever its shape; [`crate::normalize`] drops it.
/// Columns past the second are ignored.
pub fn read_raw_records(content: &str) -> Result<Vec<RawRecord>, ParserError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let line_index = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(idx + 1);

        if record.iter().all(str::is_empty) {
            continue;
        }

        if records.is_empty() {
            let label = record.get(0).unwrap_or_default();
            let second = record.get(1).unwrap_or_default();
            records.push(RawRecord::new(line_index, label, second));
            continue;
        }

        if record.len() < 2 {
            return Err(ParserError::data_row(
                line_index,
                format!("expected at least 2 fields, found {}", record.len()),
            ));
        }

        records.push(RawRecord::new(line_index, &record[0], &record[1]));
    }

    if records.is_empty() {
        return Err(ParserError::EmptyData);
    }

    Ok(records)
}
