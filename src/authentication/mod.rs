//! Post-authentication routing
//!
//! This module provides the resolver that maps an OAuth callback to a
//! redirect, the collaborator traits it depends on, and the factory that wires
//! production collaborators from settings.

pub mod errors;
pub mod factory;
pub mod resolver;
pub mod traits;

pub use errors::{ExchangeError, ProfileStoreError, ResolveError};
pub use factory::AuthenticationServiceFactory;
pub use resolver::{PostAuthResolver, Resolved};
pub use traits::{IdentityExchange, ProfileStore};
