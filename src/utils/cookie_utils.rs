use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::HttpRequest;
use chrono::{DateTime, Utc};

use crate::models::AuthSession;
use crate::settings::CookieSettings;

/// Refresh tokens outlive the access token; the browser keeps them this long
const REFRESH_COOKIE_DAYS: i64 = 30;

/// Builds the cookies written and cleared by the callback route
#[derive(Debug, Clone)]
pub struct CookieFactory {
    settings: CookieSettings,
}

impl CookieFactory {
    #[must_use]
    pub fn new(settings: CookieSettings) -> Self {
        Self { settings }
    }

    /// PKCE verifier stored by the browser when sign-in started
    #[must_use]
    pub fn code_verifier(&self, req: &HttpRequest) -> Option<String> {
        req.cookie(&self.settings.code_verifier_name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Access and refresh cookies for a freshly established session
    #[must_use]
    pub fn session_cookies(&self, session: &AuthSession, now: DateTime<Utc>) -> Vec<Cookie<'static>> {
        let access_max_age = (session.expires_at - now).num_seconds().max(0);
        let mut cookies = vec![self.build_cookie(
            &self.settings.access_token_name,
            session.access_token.clone(),
            CookieDuration::seconds(access_max_age),
        )];

        match &session.refresh_token {
            Some(refresh_token) => cookies.push(self.build_cookie(
                &self.settings.refresh_token_name,
                refresh_token.clone(),
                CookieDuration::days(REFRESH_COOKIE_DAYS),
            )),
            None => cookies.push(self.expired_cookie(&self.settings.refresh_token_name)),
        }

        cookies
    }

    /// Clear any session left over from an earlier sign-in
    #[must_use]
    pub fn expired_session_cookies(&self) -> Vec<Cookie<'static>> {
        vec![
            self.expired_cookie(&self.settings.access_token_name),
            self.expired_cookie(&self.settings.refresh_token_name),
        ]
    }

    /// The verifier is single-use, so it is cleared on every callback
    #[must_use]
    pub fn expired_verifier_cookie(&self) -> Cookie<'static> {
        self.expired_cookie(&self.settings.code_verifier_name)
    }

    fn build_cookie(&self, name: &str, value: String, max_age: CookieDuration) -> Cookie<'static> {
        Cookie::build(name.to_owned(), value)
            .http_only(true)
            .secure(self.settings.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(max_age)
            .finish()
    }

    fn expired_cookie(&self, name: &str) -> Cookie<'static> {
        self.build_cookie(name, String::new(), CookieDuration::seconds(-1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthenticatedUser;
    use actix_web::test;

    fn factory() -> CookieFactory {
        CookieFactory::new(CookieSettings {
            secure: false,
            ..CookieSettings::default()
        })
    }

    fn session(refresh_token: Option<&str>, now: DateTime<Utc>) -> AuthSession {
        AuthSession {
            user: AuthenticatedUser {
                id: "u1".to_string(),
                email: None,
            },
            access_token: "at".to_string(),
            refresh_token: refresh_token.map(ToString::to_string),
            expires_at: now + chrono::Duration::seconds(3600),
        }
    }

    #[::core::prelude::v1::test]
    fn test_session_cookies() {
        let now = Utc::now();
        let cookies = factory().session_cookies(&session(Some("rt"), now), now);

        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0].name(), "sb-access-token");
        assert_eq!(cookies[0].value(), "at");
        assert_eq!(cookies[0].max_age(), Some(CookieDuration::seconds(3600)));
        assert_eq!(cookies[0].http_only(), Some(true));
        assert_eq!(cookies[0].same_site(), Some(SameSite::Lax));
        assert_eq!(cookies[1].name(), "sb-refresh-token");
        assert_eq!(cookies[1].value(), "rt");
    }

    #[::core::prelude::v1::test]
    fn test_missing_refresh_token_clears_stale_cookie() {
        let now = Utc::now();
        let cookies = factory().session_cookies(&session(None, now), now);

        assert_eq!(cookies[1].name(), "sb-refresh-token");
        assert_eq!(cookies[1].value(), "");
        assert_eq!(cookies[1].max_age(), Some(CookieDuration::seconds(-1)));
    }

    #[::core::prelude::v1::test]
    fn test_secure_flag_follows_settings() {
        let secure = CookieFactory::new(CookieSettings::default());
        assert_eq!(secure.expired_verifier_cookie().secure(), Some(true));
        assert_eq!(factory().expired_verifier_cookie().secure(), Some(false));
    }

    #[::core::prelude::v1::test]
    fn test_code_verifier_from_request() {
        let req = test::TestRequest::default()
            .cookie(Cookie::new("sb-auth-token-code-verifier", "v1"))
            .to_http_request();
        assert_eq!(factory().code_verifier(&req).as_deref(), Some("v1"));

        let empty = test::TestRequest::default().to_http_request();
        assert_eq!(factory().code_verifier(&empty), None);
    }
}
