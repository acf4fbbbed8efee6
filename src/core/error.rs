// Error handling for the CSV analyzer

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Uploaded file exceeds the maximum allowed size ({limit} bytes)")]
    PayloadTooLarge { limit: usize },

    #[error("File processing error: {0}")]
    Processing(String),

    #[error("Record with id: {0} not found")]
    RecordNotFound(i64),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl AnalyzerError {
    /// Stable classification reported to callers alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyzerError::InvalidInput(_) => "invalid_input",
            AnalyzerError::PayloadTooLarge { .. } => "payload_too_large",
            AnalyzerError::Io(_) | AnalyzerError::Processing(_) => "processing_failure",
            AnalyzerError::RecordNotFound(_) => "not_found",
            AnalyzerError::Storage(_) => "storage_failure",
        }
    }
}
