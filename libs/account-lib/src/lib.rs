//! # Account Library
//!
//! Client-side cache of the signed-in account, resolved from the server's
//! `api/account` resource, with authority checks against it.
//!
//! ## Lookup
//!
//! ```text
//! identity() ──► Resolved? ── yes ──► cached account (or "no user")
//!                   │
//!                   no
//!                   ▼
//!            Pending fetch? ── yes ──► await the same fetch
//!                   │
//!                   no
//!                   ▼
//!        start one fetch, store it, await it, cache the outcome
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use account_lib::{AccountConfig, AccountService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), account_lib::AccountError> {
//!     let service = AccountService::from_config(AccountConfig::from_env())?;
//!
//!     // First call hits GET api/account, later calls are served from cache
//!     let account = service.identity().await;
//!
//!     if service.has_any_authority(["ROLE_ADMIN", "ROLE_OPERATOR"]) {
//!         // ...
//!     }
//!     Ok(())
//! }
//! ```

mod access;
mod account_service;
mod config;
mod error;
mod provider;

pub mod entities;
pub mod providers;

pub use access::AccessDecision;
pub use account_service::AccountService;
pub use config::{
    AccountConfig, ACCOUNT_API_TOKEN, ACCOUNT_API_URL, ACCOUNT_PATH,
    ACCOUNT_REQUEST_TIMEOUT_SECS,
};
pub use entities::*;
pub use error::AccountError;
pub use provider::AccountProvider;
