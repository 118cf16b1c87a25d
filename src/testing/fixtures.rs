//! Pre-built test data

use std::sync::Arc;

use crate::authentication::PostAuthResolver;
use crate::models::AccountType;
use crate::settings::{ApplicationSettings, CookieSettings, SchedeulerSettings, SupabaseSettings};

use super::constants::{INSTRUCTOR_USER_ID, NEW_USER_ID, STUDENT_USER_ID, TEST_CODE};
use super::mock::{MockIdentityExchange, MockProfileStore};

pub struct TestFixtures;

impl TestFixtures {
    /// Settings pointing at a local project with insecure cookies
    #[must_use]
    pub fn settings() -> SchedeulerSettings {
        SchedeulerSettings {
            application: ApplicationSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
                site_url: String::new(),
                cors_origins: "http://localhost:3000".to_string(),
            },
            supabase: SupabaseSettings {
                url: "http://localhost:54321".to_string(),
                anon_key: "test-anon-key".to_string(),
                service_role_key: "test-service-role-key".to_string(),
                ..SupabaseSettings::default()
            },
            cookies: CookieSettings {
                secure: false,
                ..CookieSettings::default()
            },
            ..SchedeulerSettings::default()
        }
    }

    /// Settings for a Supabase project served at `url` (e.g. a mock server)
    #[must_use]
    pub fn settings_for(url: &str) -> SchedeulerSettings {
        let mut settings = Self::settings();
        settings.supabase.url = url.to_string();
        settings
    }

    /// Resolver wired to the given doubles
    #[must_use]
    pub fn resolver(
        identity: &Arc<MockIdentityExchange>,
        profiles: &Arc<MockProfileStore>,
    ) -> PostAuthResolver {
        PostAuthResolver::new(identity.clone(), profiles.clone())
    }

    /// Identity provider accepting `TEST_CODE` for a user with no profile
    #[must_use]
    pub fn new_user_identity() -> MockIdentityExchange {
        MockIdentityExchange::new().with_code(TEST_CODE, NEW_USER_ID)
    }

    /// Profile table with one instructor and one student
    #[must_use]
    pub fn seeded_profiles() -> MockProfileStore {
        MockProfileStore::new()
            .with_profile(INSTRUCTOR_USER_ID, AccountType::Instructor)
            .with_profile(STUDENT_USER_ID, AccountType::Student)
    }
}
