// Centralized logging for the callback flow. Codes and tokens never reach the log.
use log::{debug, error, info, warn};

use crate::authentication::{ResolveError, Resolved};
use crate::models::CallbackQuery;

pub struct LoggingHelper;

impl LoggingHelper {
    /// Log callback request details in development mode
    pub fn log_callback_debug(req: &actix_web::HttpRequest, query: &CallbackQuery) {
        debug!(
            "OAuth callback received via {}: code={}, provider_error={:?}",
            req.method(),
            if query.code.is_some() { "present" } else { "missing" },
            query.error
        );
        debug!("Callback request connection info: {:?}", req.connection_info());
    }

    /// Log a callback query that could not be decoded
    pub fn log_malformed_query(err: &actix_web::error::QueryPayloadError) {
        warn!("Malformed callback query, treating as missing code: {err}");
    }

    /// Log an error reported by the identity provider in the callback query
    pub fn log_provider_error(error: &str, description: Option<&str>) {
        warn!(
            "Identity provider returned error '{}': {}",
            error,
            description.unwrap_or("no description")
        );
    }

    /// Log token exchange start
    pub fn log_token_exchange_start(with_verifier: bool) {
        info!(
            "🔄 Exchanging authorization code for session (pkce verifier: {})",
            if with_verifier { "present" } else { "missing" }
        );
    }

    /// Log a successful resolution
    pub fn log_resolved(resolved: &Resolved) {
        match &resolved.profile {
            Some(profile) => info!(
                "✅ User {} signed in as {}, redirecting to {}",
                resolved.session.user.id, profile.account_type, resolved.decision
            ),
            None => info!(
                "✅ User {} has no profile yet, redirecting to {}",
                resolved.session.user.id, resolved.decision
            ),
        }
    }

    /// Log a failed resolution; the caller still redirects
    pub fn log_resolve_failure(err: &ResolveError) {
        match err {
            ResolveError::MissingCode => warn!("❌ Callback rejected ({}): {err}", err.kind()),
            ResolveError::ExchangeFailed(_) | ResolveError::ProfileLookupFailed { .. } => {
                error!("❌ Callback failed ({}): {err}", err.kind());
            }
        }
    }
}
