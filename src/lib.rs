#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the schedeuler-auth service
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod authentication;
pub mod handlers;
pub mod models;
pub mod settings;
pub mod supabase;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use authentication::{AuthenticationServiceFactory, PostAuthResolver, ResolveError};
pub use handlers::{auth_callback, health};
pub use models::{AccountType, AuthorizationCode, RedirectDecision, UserProfile};
pub use settings::SchedeulerSettings;
