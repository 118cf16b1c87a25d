// HTTP request handlers
pub mod callback;
pub mod health;

pub use callback::auth_callback;
pub use health::health;
