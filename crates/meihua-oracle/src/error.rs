//! Error types for the interpretation client.

use thiserror::Error;

/// Result type alias for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;

/// Errors that can occur while asking a model for an interpretation.
#[derive(Debug, Error)]
pub enum OracleError {
    /// No API key is configured for the endpoint.
    #[error("no API key configured. Set DEEPSEEK_API_KEY or run `mh config set api-key <key>`")]
    MissingApiKey,

    /// Transport failure talking to the endpoint.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The prompt template failed to render.
    #[error("prompt rendering failed: {0}")]
    Template(#[from] askama::Error),

    /// Resolver configuration could not be read.
    #[error("resolver configuration error: {0}")]
    Config(String),
}
