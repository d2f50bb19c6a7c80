use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// A record lacks a required field or has it with the wrong type.
    #[error("record {index}: missing or invalid field '{field}'")]
    Malformed { index: usize, field: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// File extension does not name a supported format.
    #[error("unsupported timesheet format: {0}")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
