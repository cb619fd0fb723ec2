use thiserror::Error;

/// Errors surfaced to callers of the detection pipeline
///
/// Lines that fail to parse are not errors; parsers return `None` for them.
#[derive(Error, Debug)]
pub enum SentryError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to encode configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Detector task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, SentryError>;
