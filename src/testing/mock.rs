//! In-memory collaborators for exercising the resolver without a network
//!
//! Both doubles count their calls so tests can assert that a collaborator was
//! (or was not) reached.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::authentication::errors::{ExchangeError, ProfileStoreError};
use crate::authentication::traits::{IdentityExchange, ProfileStore};
use crate::models::{AccountType, AuthSession, AuthenticatedUser, AuthorizationCode, UserProfile};

/// Identity provider that knows a fixed set of single-use codes
#[derive(Default)]
pub struct MockIdentityExchange {
    codes: HashMap<String, AuthenticatedUser>,
    consumed: Mutex<HashSet<String>>,
    verifiers: Mutex<Vec<Option<String>>>,
    calls: AtomicUsize,
}

impl MockIdentityExchange {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `code` as redeemable once for `user_id`
    #[must_use]
    pub fn with_code(mut self, code: &str, user_id: &str) -> Self {
        self.codes.insert(
            code.to_string(),
            AuthenticatedUser {
                id: user_id.to_string(),
                email: Some(format!("{user_id}@example.com")),
            },
        );
        self
    }

    /// Number of exchange attempts so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// PKCE verifiers presented with each exchange, in call order
    #[must_use]
    pub fn verifiers(&self) -> Vec<Option<String>> {
        self.verifiers
            .lock()
            .map(|verifiers| verifiers.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl IdentityExchange for MockIdentityExchange {
    async fn exchange(&self, code: &AuthorizationCode) -> Result<AuthSession, ExchangeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut verifiers) = self.verifiers.lock() {
            verifiers.push(code.verifier().map(str::to_string));
        }

        let user = self
            .codes
            .get(code.as_str())
            .cloned()
            .ok_or_else(|| ExchangeError::Rejected {
                status: 400,
                message: "invalid flow state, no valid flow state found".to_string(),
            })?;

        let mut consumed = self
            .consumed
            .lock()
            .map_err(|_| ExchangeError::Transport("mock state poisoned".to_string()))?;
        if !consumed.insert(code.as_str().to_string()) {
            return Err(ExchangeError::CodeConsumed);
        }

        Ok(AuthSession {
            access_token: format!("access-{}", user.id),
            refresh_token: Some(format!("refresh-{}", user.id)),
            expires_at: Utc::now() + Duration::hours(1),
            user,
        })
    }
}

/// Profile table held in memory, optionally failing every lookup
#[derive(Default)]
pub struct MockProfileStore {
    profiles: HashMap<String, UserProfile>,
    failure: Option<String>,
    lookups: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockProfileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_profile(mut self, user_id: &str, account_type: AccountType) -> Self {
        self.profiles.insert(
            user_id.to_string(),
            UserProfile {
                id: user_id.to_string(),
                account_type,
            },
        );
        self
    }

    /// Make every lookup fail with a transport error
    #[must_use]
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// User ids looked up, in call order
    #[must_use]
    pub fn lookups(&self) -> Vec<String> {
        self.lookups
            .lock()
            .map(|lookups| lookups.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ProfileStore for MockProfileStore {
    async fn find_profile(&self, user_id: &str) -> Result<Option<UserProfile>, ProfileStoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut lookups) = self.lookups.lock() {
            lookups.push(user_id.to_string());
        }

        if let Some(message) = &self.failure {
            return Err(ProfileStoreError::Transport(message.clone()));
        }

        Ok(self.profiles.get(user_id).cloned())
    }
}
