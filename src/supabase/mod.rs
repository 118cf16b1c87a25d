//! HTTP collaborators backed by a Supabase project
//!
//! - [`identity`] - GoTrue PKCE code exchange
//! - [`profiles`] - PostgREST profile lookup

pub mod identity;
pub mod profiles;

pub use identity::SupabaseIdentityExchange;
pub use profiles::SupabaseProfileStore;

use std::time::Duration;

use crate::settings::SupabaseSettings;

/// Build the HTTP client shared by both collaborators
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised
pub fn build_http_client(settings: &SupabaseSettings) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.request_timeout_secs.max(1)))
        .user_agent(concat!("schedeuler-auth/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Read an error body for logging, truncated to `MAX_ERROR_BODY` bytes
async fn error_body(response: reqwest::Response) -> String {
    const MAX_ERROR_BODY: usize = 512;

    let mut text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    if text.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }
    text
}
