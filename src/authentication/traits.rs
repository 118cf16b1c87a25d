//! Collaborator traits for post-authentication routing
//!
//! The resolver never builds its own clients. Both the identity exchange and
//! the profile store are handed to it, so tests can swap in doubles.

use async_trait::async_trait;

use crate::models::{AuthSession, AuthorizationCode, UserProfile};

use super::errors::{ExchangeError, ProfileStoreError};

/// Exchanges a single-use authorization code for a session
#[async_trait]
pub trait IdentityExchange: Send + Sync {
    /// Redeem `code` with the identity provider
    ///
    /// A code can be redeemed at most once. Replaying a consumed code must
    /// fail rather than silently produce a second session.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The provider rejects the code (unknown, expired or already used)
    /// - The provider cannot be reached
    /// - The provider response cannot be decoded
    async fn exchange(&self, code: &AuthorizationCode) -> Result<AuthSession, ExchangeError>;
}

/// Read-only access to per-user profile rows
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Look up the profile for `user_id`
    ///
    /// `Ok(None)` means the row does not exist yet (first sign-in).
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure failures, never for a
    /// missing row.
    async fn find_profile(&self, user_id: &str) -> Result<Option<UserProfile>, ProfileStoreError>;
}
