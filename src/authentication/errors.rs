use thiserror::Error;

use crate::models::RedirectDecision;

/// Failure while redeeming an authorization code
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("identity provider rejected the code ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("authorization code has already been used")]
    CodeConsumed,
    #[error("identity provider request failed: {0}")]
    Transport(String),
    #[error("identity provider response was invalid: {0}")]
    InvalidResponse(String),
}

/// Infrastructure failure while reading a profile row
#[derive(Debug, Error)]
pub enum ProfileStoreError {
    #[error("profile store returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("profile store request failed: {0}")]
    Transport(String),
    #[error("profile store response was invalid: {0}")]
    InvalidResponse(String),
}

/// Why a callback could not be resolved to a dashboard or setup page
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("callback invoked without an authorization code")]
    MissingCode,
    #[error("code exchange failed: {0}")]
    ExchangeFailed(#[source] ExchangeError),
    #[error("profile lookup failed for user {user_id}: {source}")]
    ProfileLookupFailed {
        user_id: String,
        #[source]
        source: ProfileStoreError,
    },
}

impl ResolveError {
    /// Every failure lands on the login page with the same marker
    #[must_use]
    pub const fn decision(&self) -> RedirectDecision {
        RedirectDecision::auth_failed()
    }

    /// Short tag for logs and metrics labels
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingCode => "missing_code",
            Self::ExchangeFailed(_) => "exchange_failed",
            Self::ProfileLookupFailed { .. } => "profile_lookup_failed",
        }
    }
}
