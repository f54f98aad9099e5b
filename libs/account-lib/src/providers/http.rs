//! HTTP account provider
//!
//! Reads the signed-in account from `GET {base_url}/api/account`. An
//! unauthenticated caller is answered with 401/403 or an empty body, which
//! is reported as "no user" rather than an error.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use tracing::debug;

use crate::{AccountConfig, AccountError, AccountProvider, Principal};

pub struct HttpAccountProvider {
    client: Client,
    config: AccountConfig,
}

impl HttpAccountProvider {
    pub fn new(config: AccountConfig) -> Result<Self, AccountError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AccountError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn account_url(&self) -> String {
        self.config.account_url()
    }
}

fn parse_account(body: &str) -> Result<Option<Principal>, AccountError> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(None);
    }
    // `null` deserializes to None
    serde_json::from_str::<Option<Principal>>(body)
        .map_err(|e| AccountError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl AccountProvider for HttpAccountProvider {
    async fn fetch_account(&self) -> Result<Option<Principal>, AccountError> {
        let url = self.config.account_url();
        debug!(url = %url, "Fetching current account");

        let mut request = self.client.get(&url);
        if let Some(ref token) = self.config.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| AccountError::ConnectionFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                parse_account(&body)
            }
            StatusCode::NO_CONTENT => Ok(None),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!(url = %url, "No authenticated account");
                Ok(None)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AccountError::RequestFailed(format!(
                    "get account failed with status {}: {}",
                    status, body
                )))
            }
        }
    }
}
