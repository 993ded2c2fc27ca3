use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    #[error("data row {line_index} invalid: {message}")]
    DataRow { line_index: usize, message: String },

    #[error("input did not contain any rows")]
    EmptyData,
}

impl ParserError {
    pub(crate) fn data_row(line_index: usize, message: impl Into<String>) -> Self {
        ParserError::DataRow {
            line_index,
            message: message.into(),
        }
    }

    /// Line index of the offending row, when the error is tied to one.
    pub fn line_index(&self) -> Option<usize> {
        match self {
            ParserError::DataRow { line_index, .. } => Some(*line_index),
            _ => None,
        }
    }
}

impl From<csv::Error> for ParserError {
    fn from(source: csv::Error) -> Self {
        ParserError::Csv { source }
    }
}
