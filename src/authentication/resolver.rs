//! Post-authentication session resolver
//!
//! Turns an OAuth callback into exactly one redirect target:
//!
//! | outcome                         | destination                          |
//! |---------------------------------|--------------------------------------|
//! | no code / exchange fails        | `/login?error=auth_failed`           |
//! | profile lookup fails            | `/login?error=auth_failed`           |
//! | no profile yet                  | `/select-account-type`               |
//! | profile with `instructor`       | `/instructor/dashboard?toast=login`  |
//! | profile with any other value    | `/student/dashboard?toast=login`     |

use std::sync::Arc;

use log::debug;

use crate::models::{AuthSession, AuthorizationCode, RedirectDecision, UserProfile};

use super::errors::ResolveError;
use super::traits::{IdentityExchange, ProfileStore};

/// Successful resolution: where to go and the session that was established
#[derive(Debug, Clone)]
pub struct Resolved {
    pub decision: RedirectDecision,
    pub session: AuthSession,
    pub profile: Option<UserProfile>,
}

/// Stateless resolver; safe to share across concurrent requests
#[derive(Clone)]
pub struct PostAuthResolver {
    identity: Arc<dyn IdentityExchange>,
    profiles: Arc<dyn ProfileStore>,
}

impl PostAuthResolver {
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityExchange>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { identity, profiles }
    }

    /// Resolve a callback to a redirect. Never fails.
    pub async fn resolve(&self, code: Option<&AuthorizationCode>) -> RedirectDecision {
        match self.try_resolve(code).await {
            Ok(resolved) => resolved.decision,
            Err(err) => err.decision(),
        }
    }

    /// Resolve a callback, keeping the failure reason.
    ///
    /// The exchange always completes before the profile lookup starts since
    /// the lookup is keyed by the exchanged user id.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `code` is `None` (neither collaborator is called)
    /// - The identity exchange fails
    /// - The profile store reports an infrastructure failure
    pub async fn try_resolve(
        &self,
        code: Option<&AuthorizationCode>,
    ) -> Result<Resolved, ResolveError> {
        let code = code.ok_or(ResolveError::MissingCode)?;

        let session = self
            .identity
            .exchange(code)
            .await
            .map_err(ResolveError::ExchangeFailed)?;

        let user_id = session.user.id.as_str();
        debug!("Code exchanged for user {user_id}, looking up profile");

        let profile = self
            .profiles
            .find_profile(user_id)
            .await
            .map_err(|source| ResolveError::ProfileLookupFailed {
                user_id: user_id.to_string(),
                source,
            })?;

        let decision = profile.as_ref().map_or_else(RedirectDecision::select_account_type, |p| {
            RedirectDecision::dashboard_for(&p.account_type)
        });

        Ok(Resolved {
            decision,
            session,
            profile,
        })
    }
}
