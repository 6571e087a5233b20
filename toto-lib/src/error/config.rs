//! Configuration error types

/// Errors from client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configured URL could not be parsed.
    #[error("Invalid URL {value:?}: {reason}")]
    InvalidUrl { value: String, reason: String },

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
