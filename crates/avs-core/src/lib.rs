//! Shared domain types and configuration for the AI visibility workspace.
//!
//! Holds the raw input model (a [`Mention`] of a brand by one assistant),
//! mention-file loading, the read-side filter that stands in for the mention
//! store, and application configuration read from the environment.

pub mod app_config;
pub mod config;
pub mod mention;
pub mod mentions;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use mention::{Assistant, Category, Mention, Sentiment};
pub use mentions::{
    list_mentions, load_mentions, validate_identifier, MentionFilter, MentionsFile,
};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("invalid assistant: {0}")]
    InvalidAssistant(String),

    #[error("invalid sentiment: {0}")]
    InvalidSentiment(String),

    #[error("{kind} must be non-empty")]
    EmptyIdentifier { kind: &'static str },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read mentions file {path}: {source}")]
    MentionsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse mentions file: {0}")]
    MentionsFileParse(#[from] serde_yaml::Error),

    #[error("mentions validation failed: {0}")]
    Validation(String),
}
