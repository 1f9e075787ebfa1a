use thiserror::Error;

/// Errors raised while reading a broker export.
///
/// Any of these rejects the whole file; nothing is written.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Unsupported broker format: {0}")]
    UnsupportedFormat(String),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Row {row}: {message}")]
    InvalidRow { row: usize, message: String },

    #[error("Malformed CSV: {0}")]
    Csv(String),
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        IngestError::Csv(err.to_string())
    }
}
