//! CLI error type.

use std::path::PathBuf;

use toto_lib::error::FALLBACK_MESSAGE;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Client(#[from] toto_lib::Error),

    #[error("could not determine a data directory; pass --data-dir")]
    NoDataDir,

    #[error("failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no row with id {0} on this page")]
    RowNotFound(String),

    #[error("pricing update needs at least one of --base-fare, --per-km, --per-minute, --minimum-fare")]
    EmptyPricingUpdate,
}

impl CliError {
    /// Message printed to the terminal.
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(err) => err.user_message(),
            Self::CreateDir { .. } => FALLBACK_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<toto_lib::error::StorageError> for CliError {
    fn from(err: toto_lib::error::StorageError) -> Self {
        Self::Client(err.into())
    }
}

impl From<toto_lib::error::ConfigError> for CliError {
    fn from(err: toto_lib::error::ConfigError) -> Self {
        Self::Client(err.into())
    }
}
