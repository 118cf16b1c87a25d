use async_trait::async_trait;
use log::debug;

use crate::authentication::errors::ProfileStoreError;
use crate::authentication::traits::ProfileStore;
use crate::models::UserProfile;
use crate::settings::SupabaseSettings;

use super::error_body;

/// Reads profile rows through PostgREST
#[derive(Clone)]
pub struct SupabaseProfileStore {
    http_client: reqwest::Client,
    table_url: String,
    api_key: String,
}

impl SupabaseProfileStore {
    #[must_use]
    pub fn new(http_client: reqwest::Client, settings: &SupabaseSettings) -> Self {
        Self {
            http_client,
            table_url: format!("{}/{}", settings.rest_url(), settings.profiles_table),
            api_key: settings.profile_read_key().to_string(),
        }
    }

    /// `{table}?id=eq.{user_id}&select=id,account_type`, with the id percent-encoded
    fn lookup_url(&self, user_id: &str) -> Result<url::Url, ProfileStoreError> {
        let mut url = url::Url::parse(&self.table_url)
            .map_err(|e| ProfileStoreError::Transport(format!("invalid profile URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{user_id}"))
            .append_pair("select", "id,account_type");
        Ok(url)
    }
}

#[async_trait]
impl ProfileStore for SupabaseProfileStore {
    async fn find_profile(&self, user_id: &str) -> Result<Option<UserProfile>, ProfileStoreError> {
        let url = self.lookup_url(user_id)?;

        let response = self
            .http_client
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ProfileStoreError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProfileStoreError::Status {
                status: status.as_u16(),
                message: error_body(response).await,
            });
        }

        let rows: Vec<UserProfile> = response
            .json()
            .await
            .map_err(|e| ProfileStoreError::InvalidResponse(e.to_string()))?;

        debug!("Profile lookup for {user_id} returned {} row(s)", rows.len());
        Ok(rows.into_iter().next())
    }
}
