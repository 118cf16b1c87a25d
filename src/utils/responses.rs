//! HTTP response helpers
//!
//! Redirects and the JSON bodies served by this service go through here so
//! status codes and headers stay consistent.

use actix_web::{cookie::Cookie, http::header, HttpResponse};
use serde::Serialize;

use crate::models::RedirectDecision;

/// Unified response builder
pub struct ResponseBuilder;

impl ResponseBuilder {
    /// Create a redirect response (302 Found)
    #[must_use]
    pub fn redirect(location: &str) -> RedirectBuilder {
        RedirectBuilder::new(location)
    }

    /// Redirect to a resolver decision, absolute when a site origin is set
    #[must_use]
    pub fn decision(decision: &RedirectDecision, site_url: Option<&str>) -> RedirectBuilder {
        Self::redirect(&decision.location_on(site_url))
    }

    /// 200 OK with a JSON body
    #[must_use]
    pub fn ok_json<T: Serialize>(data: &T) -> HttpResponse {
        HttpResponse::Ok().json(data)
    }
}

/// Builder for redirect responses
pub struct RedirectBuilder {
    location: String,
    cookies: Vec<Cookie<'static>>,
}

impl RedirectBuilder {
    fn new(location: &str) -> Self {
        Self {
            location: location.to_string(),
            cookies: Vec::new(),
        }
    }

    /// Add a cookie to the redirect response
    #[must_use]
    pub fn with_cookie(mut self, cookie: Cookie<'static>) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Add multiple cookies to the redirect response
    #[must_use]
    pub fn with_cookies(mut self, mut cookies: Vec<Cookie<'static>>) -> Self {
        self.cookies.append(&mut cookies);
        self
    }

    /// Build the final redirect response
    #[must_use]
    pub fn build(self) -> HttpResponse {
        let mut builder = HttpResponse::Found();

        for cookie in self.cookies {
            builder.cookie(cookie);
        }

        builder
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .insert_header((header::LOCATION, self.location))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    fn location(response: &HttpResponse) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    }

    #[test]
    fn test_decision_redirect() {
        let response =
            ResponseBuilder::decision(&RedirectDecision::auth_failed(), None).build();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/login?error=auth_failed");
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
    }

    #[test]
    fn test_decision_redirect_on_site_url() {
        let response = ResponseBuilder::decision(
            &RedirectDecision::select_account_type(),
            Some("https://schedeuler.app"),
        )
        .build();

        assert_eq!(location(&response), "https://schedeuler.app/select-account-type");
    }

    #[test]
    fn test_redirect_with_cookies() {
        let response = ResponseBuilder::redirect("/")
            .with_cookie(Cookie::new("a", "1"))
            .with_cookies(vec![Cookie::new("b", "2"), Cookie::new("c", "3")])
            .build();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.cookies().count(), 3);
    }
}
