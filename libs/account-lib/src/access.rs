//! Route-level access decisions built on the account cache.

use tracing::debug;

use crate::AccountService;

/// Outcome of checking a guarded resource against the current account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    /// Signed in, but without any of the required authorities
    Forbidden,
    /// No signed-in account
    LoginRequired,
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl AccountService {
    /// Resolve the current account (fetching it if needed) and decide whether
    /// it may reach a resource guarded by `required`. An empty `required`
    /// list lets everyone through.
    pub async fn check_access<S: AsRef<str>>(&self, required: &[S]) -> AccessDecision {
        let account = self.identity().await;

        if required.is_empty() {
            return AccessDecision::Granted;
        }

        let decision = match account {
            Some(principal) if principal.has_any_authority(required) => AccessDecision::Granted,
            Some(_) => AccessDecision::Forbidden,
            None => AccessDecision::LoginRequired,
        };
        debug!(decision = ?decision, "Access checked");
        decision
    }
}
