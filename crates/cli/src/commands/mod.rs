//! Subcommand implementations.

pub mod ping;
pub mod seed;

use thiserror::Error;

use nextshop_api::config::ConfigError;
use nextshop_api::db::StoreError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Store(#[from] StoreError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} invalid seed entries")]
    Invalid(usize),
}
