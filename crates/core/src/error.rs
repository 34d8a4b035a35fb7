use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChemError {
    #[error("Invalid input: {reason}")]
    Validation { reason: String },

    #[error("No event matches '{reference}'")]
    EventNotFound { reference: String },

    #[error("'{reference}' matches more than one event")]
    AmbiguousEvent { reference: String },

    #[error("No active alert matches '{reference}'")]
    AlertNotFound { reference: String },

    #[error("'{reference}' matches more than one active alert")]
    AmbiguousAlert { reference: String },

    #[error("Todo #{index} does not exist ({len} todos)")]
    TodoOutOfRange { index: usize, len: usize },

    #[error("Corrupt data file {path}: {source}")]
    CorruptFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Missing API key for {provider_name}: set {env_var} or add it to the secrets file")]
    MissingApiKey {
        provider_name: String,
        env_var: String,
    },

    #[error("API error: {status} - {body}")]
    ApiStatus { status: u16, body: String },

    #[error("No response generated")]
    EmptyResponse,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ChemError>;
