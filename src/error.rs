use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Rejections raised by the event payload guard.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("invalid event payload: expected an array of events")]
    NotArray,

    #[error("invalid event payload: event at index {index} has unexpected shape")]
    InvalidEvent {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid event payload: {0}")]
    Json(#[source] serde_json::Error),

    #[error("failed to read event file: {0}")]
    ReadFile(#[source] std::io::Error),
}

impl PayloadError {
    /// Position of the offending element, for element-level rejections.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        match self {
            Self::InvalidEvent { index, .. } => Some(*index),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
