//! Error types for the tmodel-core crate.

use thiserror::Error;

/// Top-level error type for configuration and checkpoint operations.
#[derive(Debug, Error)]
pub enum TmodelError {
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid weights pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl TmodelError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn serialize(msg: impl Into<String>) -> Self {
        Self::Serialize(msg.into())
    }
}

impl From<figment::Error> for TmodelError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<toml::ser::Error> for TmodelError {
    fn from(err: toml::ser::Error) -> Self {
        Self::serialize(err.to_string())
    }
}

impl From<serde_json::Error> for TmodelError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialize(err.to_string())
    }
}
