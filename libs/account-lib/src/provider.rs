//! Trait definition for account providers

use async_trait::async_trait;

use crate::{AccountError, Principal};

/// Source of the current account.
///
/// Implement this trait to resolve the signed-in principal from a new
/// backend (the HTTP `api/account` resource, a fixed principal for tests...).
#[async_trait]
pub trait AccountProvider: Send + Sync {
    /// Fetch the current account.
    ///
    /// Returns `Ok(Some(principal))` when signed in, `Ok(None)` when there is
    /// no authenticated user, or `Err` if the backend could not answer.
    async fn fetch_account(&self) -> Result<Option<Principal>, AccountError>;
}
