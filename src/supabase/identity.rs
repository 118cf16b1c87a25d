use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::authentication::errors::ExchangeError;
use crate::authentication::traits::IdentityExchange;
use crate::models::{AuthSession, AuthenticatedUser, AuthorizationCode};
use crate::settings::SupabaseSettings;
use crate::utils::logging::LoggingHelper;

use super::error_body;

#[derive(Serialize)]
struct PkceTokenRequest<'a> {
    auth_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_verifier: Option<&'a str>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    expires_at: Option<i64>,
    user: Option<TokenUser>,
}

#[derive(Deserialize)]
struct TokenUser {
    id: String,
    email: Option<String>,
}

/// Redeems authorization codes against the GoTrue token endpoint
#[derive(Clone)]
pub struct SupabaseIdentityExchange {
    http_client: reqwest::Client,
    token_url: String,
    anon_key: String,
}

impl SupabaseIdentityExchange {
    #[must_use]
    pub fn new(http_client: reqwest::Client, settings: &SupabaseSettings) -> Self {
        Self {
            http_client,
            token_url: format!("{}/token?grant_type=pkce", settings.auth_url()),
            anon_key: settings.anon_key.clone(),
        }
    }

    fn session_from_response(token: TokenResponse) -> Result<AuthSession, ExchangeError> {
        let user = token
            .user
            .filter(|u| !u.id.is_empty())
            .ok_or_else(|| ExchangeError::InvalidResponse("token response has no user id".to_string()))?;

        Ok(AuthSession {
            user: AuthenticatedUser {
                id: user.id,
                email: user.email,
            },
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: Self::expiry(token.expires_at, token.expires_in, Utc::now()),
        })
    }

    /// Prefer the absolute expiry, then the relative one, then one hour
    fn expiry(
        expires_at: Option<i64>,
        expires_in: Option<i64>,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        expires_at
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .or_else(|| expires_in.map(|secs| now + Duration::seconds(secs)))
            .unwrap_or_else(|| now + Duration::hours(1))
    }
}

#[async_trait]
impl IdentityExchange for SupabaseIdentityExchange {
    async fn exchange(&self, code: &AuthorizationCode) -> Result<AuthSession, ExchangeError> {
        LoggingHelper::log_token_exchange_start(code.verifier().is_some());

        let response = self
            .http_client
            .post(&self.token_url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&PkceTokenRequest {
                auth_code: code.as_str(),
                code_verifier: code.verifier(),
            })
            .send()
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExchangeError::Rejected {
                status: status.as_u16(),
                message: error_body(response).await,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ExchangeError::InvalidResponse(e.to_string()))?;

        Self::session_from_response(token)
    }
}
