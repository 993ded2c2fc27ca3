pub mod errors;
pub mod model;
mod normalize;
mod reader;
mod timestamp;

pub use errors::ParserError;
pub use model::{records_from_pairs, RawRecord, Sample};
pub use normalize::{extract_numeric, normalize, normalize_record};
pub use reader::read_raw_records;
pub use timestamp::parse_timestamp;

#[cfg(test)]
mod tests;
