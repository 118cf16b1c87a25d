// OAuth callback handler
use actix_web::{web, HttpRequest, HttpResponse, Result};
use chrono::Utc;

use crate::authentication::PostAuthResolver;
use crate::models::{AuthorizationCode, CallbackQuery};
use crate::settings::SchedeulerSettings;
use crate::utils::cookie_utils::CookieFactory;
use crate::utils::logging::LoggingHelper;
use crate::utils::responses::ResponseBuilder;

/// `GET /auth/callback`
///
/// Resolves the callback and answers with a single redirect. The resolver
/// decides where to go; this handler only logs, sets cookies and redirects.
///
/// A query that cannot be decoded is handled like a missing code.
///
/// # Errors
///
/// Never returns an error; every outcome is a redirect.
pub async fn auth_callback(
    req: HttpRequest,
    resolver: web::Data<PostAuthResolver>,
    settings: web::Data<SchedeulerSettings>,
) -> Result<HttpResponse> {
    let query = parse_callback_query(req.query_string());
    LoggingHelper::log_callback_debug(&req, &query);

    if let Some(error) = &query.error {
        LoggingHelper::log_provider_error(error, query.error_description.as_deref());
    }

    let cookies = CookieFactory::new(settings.cookies.clone());
    let verifier = cookies.code_verifier(&req);
    let code = query
        .code
        .as_deref()
        .and_then(AuthorizationCode::parse)
        .map(|code| code.with_verifier(verifier.as_deref()));

    let response = match resolver.try_resolve(code.as_ref()).await {
        Ok(resolved) => {
            LoggingHelper::log_resolved(&resolved);
            ResponseBuilder::decision(&resolved.decision, settings.site_url())
                .with_cookies(cookies.session_cookies(&resolved.session, Utc::now()))
                .with_cookie(cookies.expired_verifier_cookie())
                .build()
        }
        Err(err) => {
            LoggingHelper::log_resolve_failure(&err);
            ResponseBuilder::decision(&err.decision(), settings.site_url())
                .with_cookies(cookies.expired_session_cookies())
                .with_cookie(cookies.expired_verifier_cookie())
                .build()
        }
    };

    Ok(response)
}

fn parse_callback_query(query_string: &str) -> CallbackQuery {
    web::Query::<CallbackQuery>::from_query(query_string)
        .map(web::Query::into_inner)
        .unwrap_or_else(|err| {
            LoggingHelper::log_malformed_query(&err);
            CallbackQuery::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountType;
    use crate::testing::fixtures::TestFixtures;
    use crate::testing::mock::{MockIdentityExchange, MockProfileStore};
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};
    use std::sync::Arc;

    async fn call(
        resolver: PostAuthResolver,
        settings: SchedeulerSettings,
        uri: &str,
    ) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(resolver))
                .app_data(web::Data::new(settings))
                .route("/auth/callback", web::get().to(auth_callback)),
        )
        .await;
        test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await
    }

    fn location(response: &actix_web::dev::ServiceResponse) -> String {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[actix_web::test]
    async fn test_provider_error_without_code() {
        let identity = Arc::new(MockIdentityExchange::new());
        let profiles = Arc::new(MockProfileStore::new());
        let resolver = TestFixtures::resolver(&identity, &profiles);

        let response = call(
            resolver,
            TestFixtures::settings(),
            "/auth/callback?error=access_denied&error_description=User+cancelled",
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/login?error=auth_failed");
        assert_eq!(identity.calls(), 0);
    }

    #[actix_web::test]
    async fn test_blank_code_is_missing() {
        let identity = Arc::new(MockIdentityExchange::new());
        let profiles = Arc::new(MockProfileStore::new());
        let resolver = TestFixtures::resolver(&identity, &profiles);

        let response = call(resolver, TestFixtures::settings(), "/auth/callback?code=").await;

        assert_eq!(location(&response), "/login?error=auth_failed");
        assert_eq!(identity.calls(), 0);
        assert_eq!(profiles.calls(), 0);
    }

    #[::core::prelude::v1::test]
    fn test_parse_callback_query() {
        let query = parse_callback_query("code=abc123&state=xyz");
        assert_eq!(query.code.as_deref(), Some("abc123"));

        let duplicated = parse_callback_query("code=a&code=b");
        assert!(duplicated.code.is_none());
        assert!(duplicated.error.is_none());
    }

    #[actix_web::test]
    async fn test_duplicated_code_redirects_to_login() {
        let identity = Arc::new(MockIdentityExchange::new().with_code("a", "u2"));
        let profiles = Arc::new(MockProfileStore::new());
        let resolver = TestFixtures::resolver(&identity, &profiles);

        let response = call(resolver, TestFixtures::settings(), "/auth/callback?code=a&code=b").await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/login?error=auth_failed");
        assert_eq!(identity.calls(), 0);
        assert_eq!(profiles.calls(), 0);
    }

    #[actix_web::test]
    async fn test_absolute_redirect_with_site_url() {
        let identity = Arc::new(MockIdentityExchange::new().with_code("abc123", "u2"));
        let profiles =
            Arc::new(MockProfileStore::new().with_profile("u2", AccountType::Instructor));
        let resolver = TestFixtures::resolver(&identity, &profiles);
        let mut settings = TestFixtures::settings();
        settings.application.site_url = "https://schedeuler.app/".to_string();

        let response = call(resolver, settings, "/auth/callback?code=abc123").await;

        assert_eq!(
            location(&response),
            "https://schedeuler.app/instructor/dashboard?toast=login"
        );
    }
}
