//! Testing utilities for the callback service
//!
//! - [`mock`] - In-memory identity exchange and profile store
//! - [`fixtures`] - Pre-built settings and resolvers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use schedeuler_auth::testing::{MockIdentityExchange, TestFixtures};
//!
//! let identity = Arc::new(MockIdentityExchange::new().with_code("abc123", "u2"));
//! let profiles = Arc::new(TestFixtures::seeded_profiles());
//! let resolver = TestFixtures::resolver(&identity, &profiles);
//! ```

pub mod fixtures;
pub mod mock;

pub use fixtures::TestFixtures;
pub use mock::{MockIdentityExchange, MockProfileStore};

/// Common test constants
pub mod constants {
    /// Code registered with the mock identity provider
    pub const TEST_CODE: &str = "abc123";

    /// PKCE verifier stored in the browser cookie
    pub const TEST_VERIFIER: &str = "test-code-verifier";

    /// User without a profile row
    pub const NEW_USER_ID: &str = "u1";

    /// User with an instructor profile
    pub const INSTRUCTOR_USER_ID: &str = "u2";

    /// User with a student profile
    pub const STUDENT_USER_ID: &str = "u3";
}
