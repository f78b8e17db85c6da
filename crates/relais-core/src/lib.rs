//! relais-core - Core types and traits for the relais client SDK.

pub mod credentials;
pub mod error;
pub mod session;
pub mod store;
pub mod tokens;
pub mod types;
pub mod user;

pub use credentials::Credentials;
pub use error::Error;
pub use session::{PersistedSession, SessionState, persisted_view};
pub use store::SessionStore;
pub use tokens::{AccessToken, RefreshToken};
pub use types::ApiUrl;
pub use user::{ProfileUpdate, RegisterForm, User};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
