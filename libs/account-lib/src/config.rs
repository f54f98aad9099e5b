//! Configuration for the account endpoint

use secrecy::Secret;
use std::time::Duration;

use crate::AccountError;

pub const ACCOUNT_API_URL: &str = "ACCOUNT_API_URL";
pub const ACCOUNT_API_TOKEN: &str = "ACCOUNT_API_TOKEN";
pub const ACCOUNT_REQUEST_TIMEOUT_SECS: &str = "ACCOUNT_REQUEST_TIMEOUT_SECS";

const DEFAULT_ACCOUNT_API_URL: &str = "http://localhost:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Path of the current-account resource, relative to the server base URL
pub const ACCOUNT_PATH: &str = "api/account";

/// Where and how to fetch the current account
#[derive(Debug)]
pub struct AccountConfig {
    /// Server base URL (e.g. http://localhost:8080)
    pub base_url: String,
    /// Bearer token sent with the account request, if any
    pub token: Option<Secret<String>>,
    /// Timeout applied to each account request
    pub request_timeout: Duration,
}

impl AccountConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let base_url = std::env::var(ACCOUNT_API_URL)
            .unwrap_or_else(|_| DEFAULT_ACCOUNT_API_URL.to_string());
        let token = std::env::var(ACCOUNT_API_TOKEN)
            .ok()
            .filter(|v| !v.is_empty())
            .map(Secret::new);
        let timeout_secs: u64 = std::env::var(ACCOUNT_REQUEST_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            base_url,
            token,
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(Secret::new(token.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Full URL of the current-account resource
    pub fn account_url(&self) -> String {
        format!("{}/{}", self.base_url.trim().trim_end_matches('/'), ACCOUNT_PATH)
    }

    pub fn validate(&self) -> Result<(), AccountError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(AccountError::InvalidConfig(
                "account base URL cannot be empty".to_string(),
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AccountError::InvalidConfig(format!(
                "account base URL must start with http:// or https://, got '{url}'"
            )));
        }
        Ok(())
    }
}
