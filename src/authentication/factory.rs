//! Service factory for creating the configured resolver
//!
//! This is the only place that turns settings into collaborators. Everything
//! downstream receives a ready [`PostAuthResolver`].

use std::sync::Arc;

use crate::settings::SchedeulerSettings;
use crate::supabase::{build_http_client, SupabaseIdentityExchange, SupabaseProfileStore};

use super::resolver::PostAuthResolver;

/// Factory for creating the resolver with its production collaborators
pub struct AuthenticationServiceFactory;

impl AuthenticationServiceFactory {
    /// Create a resolver backed by the Supabase project in `settings`
    ///
    /// Both collaborators share one HTTP client (and its connection pool).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn create_resolver(settings: &SchedeulerSettings) -> Result<PostAuthResolver, reqwest::Error> {
        log::info!("Starting authentication service factory...");

        let http_client = build_http_client(&settings.supabase)?;
        let identity = Arc::new(SupabaseIdentityExchange::new(
            http_client.clone(),
            &settings.supabase,
        ));
        let profiles = Arc::new(SupabaseProfileStore::new(http_client, &settings.supabase));

        if settings.supabase.anon_key.is_empty() {
            log::warn!("SUPABASE_ANON_KEY is not set; code exchange will be rejected");
        }
        if settings.supabase.service_role_key.is_empty() {
            log::info!("No service role key configured; profile reads use the anon key");
        }

        log::info!(
            "Identity exchange configured for {} (profiles table: {})",
            settings.supabase.auth_url(),
            settings.supabase.profiles_table
        );
        Ok(PostAuthResolver::new(identity, profiles))
    }
}
