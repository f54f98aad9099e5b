//! Error types for the account library

use thiserror::Error;

/// Errors that can occur while looking up the current account
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AccountError {
    /// The account server could not be reached
    #[error("Failed to connect to account server: {0}")]
    ConnectionFailed(String),

    /// The account server answered with an unexpected status
    #[error("Account request failed: {0}")]
    RequestFailed(String),

    /// The account payload could not be parsed
    #[error("Invalid account response: {0}")]
    InvalidResponse(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP transport error while reading the response
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}
