use async_trait::async_trait;
use cucumber::World;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use account_lib::{AccessDecision, AccountError, AccountProvider, AccountService, Principal};

/// Account server double driven by the scenario steps
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    account: Mutex<Option<Principal>>,
    unreachable: AtomicBool,
    slow: AtomicBool,
    gate: Notify,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn set_account(&self, account: Option<Principal>) {
        *self.account.lock().unwrap() = account;
    }

    pub fn set_unreachable(&self) {
        self.unreachable.store(true, Ordering::SeqCst);
    }

    pub fn set_slow(&self) {
        self.slow.store(true, Ordering::SeqCst);
    }

    pub fn answer(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountProvider for ScriptedProvider {
    async fn fetch_account(&self) -> Result<Option<Principal>, AccountError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.slow.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(AccountError::ConnectionFailed("connection refused".to_string()));
        }
        Ok(self.account.lock().unwrap().clone())
    }
}

#[derive(Debug, Default, World)]
pub struct TestWorld {
    pub provider: Option<Arc<ScriptedProvider>>,
    pub service: Option<AccountService>,

    // Results
    pub identities: Vec<Option<Principal>>,
    pub decision: Option<AccessDecision>,
}

impl TestWorld {
    pub fn provider(&mut self) -> Arc<ScriptedProvider> {
        self.provider
            .get_or_insert_with(|| Arc::new(ScriptedProvider::default()))
            .clone()
    }

    /// Service over the scripted provider, created on first use
    pub fn service(&mut self) -> &AccountService {
        let provider = self.provider();
        self.service
            .get_or_insert_with(|| AccountService::new(provider))
    }
}

pub fn parse_authorities(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(String::from)
        .collect()
}
