use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::entities::Principal;
use crate::error::AccountError;
use crate::provider::AccountProvider;
use crate::providers::HttpAccountProvider;
use crate::AccountConfig;

type PendingFetch = Shared<BoxFuture<'static, Option<Principal>>>;

enum Identity {
    /// Nothing fetched or set yet
    Unresolved,
    /// One fetch in flight; every caller awaits a clone of it
    Pending { fetch: PendingFetch, generation: u64 },
    /// Known outcome, `None` meaning "no user"
    Resolved(Option<Principal>),
}

struct State {
    identity: Identity,
    /// Bumped on every write so a resolving fetch can tell it was superseded
    generation: u64,
}

enum Lookup {
    Cached(Option<Principal>),
    InFlight(PendingFetch, u64),
}

enum Settled {
    Done(Option<Principal>),
    /// A newer write replaced this fetch's slot; look the identity up again
    Superseded,
}

/// Session-scoped cache of the signed-in account.
///
/// The account is fetched at most once: concurrent `identity()` calls made
/// while a fetch is pending share that fetch. Authority checks only read the
/// cached value and never hit the network.
pub struct AccountService {
    provider: Arc<dyn AccountProvider>,
    state: Mutex<State>,
    auth_state: watch::Sender<Option<Principal>>,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock_state();
        let identity = match &state.identity {
            Identity::Unresolved => "unresolved",
            Identity::Pending { .. } => "pending",
            Identity::Resolved(Some(_)) => "authenticated",
            Identity::Resolved(None) => "anonymous",
        };
        f.debug_struct("AccountService")
            .field("identity", &identity)
            .field("generation", &state.generation)
            .finish()
    }
}

impl AccountService {
    pub fn new(provider: Arc<dyn AccountProvider>) -> Self {
        let (auth_state, _) = watch::channel(None);
        Self {
            provider,
            state: Mutex::new(State {
                identity: Identity::Unresolved,
                generation: 0,
            }),
            auth_state,
        }
    }

    pub fn with_provider<P: AccountProvider + 'static>(provider: P) -> Self {
        Self::new(Arc::new(provider))
    }

    /// Service backed by the HTTP `api/account` resource
    pub fn from_config(config: AccountConfig) -> Result<Self, AccountError> {
        Ok(Self::with_provider(HttpAccountProvider::new(config)?))
    }

    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current account, fetching it if it has not been resolved yet.
    ///
    /// Fetch failures resolve to `None` and are cached like any other
    /// outcome.
    pub async fn identity(&self) -> Option<Principal> {
        loop {
            let (fetch, generation) = match self.begin_lookup() {
                Lookup::Cached(principal) => return principal,
                Lookup::InFlight(fetch, generation) => (fetch, generation),
            };

            let fetched = fetch.await;
            match self.settle(generation, fetched) {
                Settled::Done(principal) => return principal,
                Settled::Superseded => {
                    debug!(generation, "Account request superseded, looking up again")
                }
            }
        }
    }

    /// Drop a resolved identity and fetch it again. Joins a fetch that is
    /// already in flight instead of starting a second one.
    pub async fn refresh(&self) -> Option<Principal> {
        {
            let mut state = self.lock_state();
            if matches!(state.identity, Identity::Resolved(_)) {
                debug!("Discarding cached identity for refresh");
                state.identity = Identity::Unresolved;
            }
        }
        self.identity().await
    }

    fn begin_lookup(&self) -> Lookup {
        let mut guard = self.lock_state();
        let state = &mut *guard;

        match &state.identity {
            Identity::Resolved(principal) => {
                debug!("Identity served from cache");
                Lookup::Cached(principal.clone())
            }
            Identity::Pending { fetch, generation } => {
                debug!(generation = *generation, "Joining in-flight account request");
                Lookup::InFlight(fetch.clone(), *generation)
            }
            Identity::Unresolved => {
                state.generation += 1;
                let generation = state.generation;
                let fetch = self.start_fetch();
                debug!(generation, "Account request started");
                state.identity = Identity::Pending {
                    fetch: fetch.clone(),
                    generation,
                };
                Lookup::InFlight(fetch, generation)
            }
        }
    }

    fn start_fetch(&self) -> PendingFetch {
        let provider = Arc::clone(&self.provider);
        async move {
            match provider.fetch_account().await {
                Ok(principal) => principal,
                Err(e) => {
                    warn!(error = %e, "Failed to fetch current account, treating as anonymous");
                    None
                }
            }
        }
        .boxed()
        .shared()
    }

    fn settle(&self, generation: u64, fetched: Option<Principal>) -> Settled {
        let mut guard = self.lock_state();
        let state = &mut *guard;

        match &state.identity {
            Identity::Pending {
                generation: pending,
                ..
            } if *pending == generation => {
                match &fetched {
                    Some(principal) => info!(
                        login = principal.login.as_deref().unwrap_or_default(),
                        authorities = ?principal.authorities,
                        "Identity resolved"
                    ),
                    None => info!("Identity resolved with no authenticated user"),
                }
                state.identity = Identity::Resolved(fetched.clone());
                self.auth_state.send_replace(fetched.clone());
                Settled::Done(fetched)
            }
            Identity::Resolved(current) => Settled::Done(current.clone()),
            // A refresh after a newer write; this result is stale
            Identity::Pending { .. } | Identity::Unresolved => Settled::Superseded,
        }
    }

    fn store(&self, principal: Option<Principal>) {
        let mut state = self.lock_state();
        state.generation += 1;
        state.identity = Identity::Resolved(principal.clone());
        self.auth_state.send_replace(principal);
    }

    /// Set the current account directly, without a network round trip.
    pub fn authenticate(&self, principal: Principal) {
        info!(
            login = principal.login.as_deref().unwrap_or_default(),
            "Account authenticated"
        );
        self.store(Some(principal));
    }

    /// Forget the current account. The cache stays resolved as "no user".
    pub fn sign_out(&self) {
        info!("Account signed out");
        self.store(None);
    }

    /// Resolved account, if any. Never fetches.
    pub fn cached_identity(&self) -> Option<Principal> {
        match &self.lock_state().identity {
            Identity::Resolved(principal) => principal.clone(),
            _ => None,
        }
    }

    pub fn is_identity_resolved(&self) -> bool {
        matches!(self.lock_state().identity, Identity::Resolved(_))
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.lock_state().identity, Identity::Resolved(Some(_)))
    }

    /// True iff an account is cached and holds `authority`.
    pub fn has_authority(&self, authority: &str) -> bool {
        match &self.lock_state().identity {
            Identity::Resolved(Some(principal)) => principal.has_authority(authority),
            _ => false,
        }
    }

    /// True iff an account is cached and holds at least one of `authorities`.
    pub fn has_any_authority<I, S>(&self, authorities: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match &self.lock_state().identity {
            Identity::Resolved(Some(principal)) => principal.has_any_authority(authorities),
            _ => false,
        }
    }

    /// Authentication state changes: the current account after every
    /// sign-in, sign-out or resolved fetch.
    pub fn subscribe(&self) -> watch::Receiver<Option<Principal>> {
        self.auth_state.subscribe()
    }
}
