//! Error handling for the job signal pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobSignalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, JobSignalError>;

/// Model2Vec reports failures through anyhow
impl From<anyhow::Error> for JobSignalError {
    fn from(err: anyhow::Error) -> Self {
        JobSignalError::Embedding(format!("{:#}", err))
    }
}
