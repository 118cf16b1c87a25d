use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Query parameters delivered to the OAuth callback route
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Single-use authorization code handed back by the identity provider.
///
/// The code may be accompanied by the PKCE verifier the browser stored when
/// the sign-in flow started. Neither value is ever printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationCode {
    value: String,
    verifier: Option<String>,
}

impl AuthorizationCode {
    /// Build a code from a raw query value.
    ///
    /// Returns `None` for empty or whitespace-only input so that a blank
    /// `?code=` is handled exactly like a missing parameter.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self {
                value: trimmed.to_string(),
                verifier: None,
            })
        }
    }

    /// Attach a PKCE code verifier (ignored when blank)
    #[must_use]
    pub fn with_verifier(mut self, verifier: Option<&str>) -> Self {
        self.verifier = verifier
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string);
        self
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn verifier(&self) -> Option<&str> {
        self.verifier.as_deref()
    }
}

impl fmt::Debug for AuthorizationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationCode")
            .field("value", &"<redacted>")
            .field("has_verifier", &self.verifier.is_some())
            .finish()
    }
}

/// Identity established by a successful code exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: Option<String>,
}

/// Session material returned by the identity provider alongside the user
#[derive(Clone)]
pub struct AuthSession {
    pub user: AuthenticatedUser,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("user", &self.user)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Role classification that selects a dashboard.
///
/// Unknown strings are kept verbatim so they can be logged, but they route
/// exactly like `Student`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountType {
    Student,
    Instructor,
    Other(String),
}

impl AccountType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Student => "student",
            Self::Instructor => "instructor",
            Self::Other(raw) => raw,
        }
    }

    #[must_use]
    pub fn is_instructor(&self) -> bool {
        matches!(self, Self::Instructor)
    }
}

impl From<String> for AccountType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "student" => Self::Student,
            "instructor" => Self::Instructor,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for AccountType {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<AccountType> for String {
    fn from(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-user profile row owned by the external data service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub account_type: AccountType,
}

/// Query marker appended to a redirect destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    AuthFailed,
    LoginToast,
}

impl Annotation {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::AuthFailed => "error",
            Self::LoginToast => "toast",
        }
    }

    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::AuthFailed => "auth_failed",
            Self::LoginToast => "login",
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key(), self.value())
    }
}

pub const LOGIN_PATH: &str = "/login";
pub const SELECT_ACCOUNT_TYPE_PATH: &str = "/select-account-type";
pub const INSTRUCTOR_DASHBOARD_PATH: &str = "/instructor/dashboard";
pub const STUDENT_DASHBOARD_PATH: &str = "/student/dashboard";

/// Where the browser goes after the callback. Exactly one destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectDecision {
    pub destination: &'static str,
    pub annotation: Option<Annotation>,
}

impl RedirectDecision {
    #[must_use]
    pub const fn auth_failed() -> Self {
        Self {
            destination: LOGIN_PATH,
            annotation: Some(Annotation::AuthFailed),
        }
    }

    #[must_use]
    pub const fn select_account_type() -> Self {
        Self {
            destination: SELECT_ACCOUNT_TYPE_PATH,
            annotation: None,
        }
    }

    /// Dashboard for an existing profile; anything but instructor is a student
    #[must_use]
    pub fn dashboard_for(account_type: &AccountType) -> Self {
        let destination = if account_type.is_instructor() {
            INSTRUCTOR_DASHBOARD_PATH
        } else {
            STUDENT_DASHBOARD_PATH
        };
        Self {
            destination,
            annotation: Some(Annotation::LoginToast),
        }
    }

    /// Path plus query, e.g. `/login?error=auth_failed`
    #[must_use]
    pub fn location(&self) -> String {
        match self.annotation {
            Some(annotation) => format!("{}?{annotation}", self.destination),
            None => self.destination.to_string(),
        }
    }

    /// Absolute location when a site origin is configured
    #[must_use]
    pub fn location_on(&self, site_url: Option<&str>) -> String {
        match site_url.map(|s| s.trim_end_matches('/')).filter(|s| !s.is_empty()) {
            Some(origin) => format!("{origin}{}", self.location()),
            None => self.location(),
        }
    }
}

impl fmt::Display for RedirectDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location())
    }
}
