//! relais-client - Session guard and HTTP transport for the relais API.
//!
//! The central type is [`SessionGuard`]: a wrapper around the HTTP client
//! that attaches bearer credentials to outgoing requests, transparently
//! recovers from expired access tokens by coordinating a single shared
//! renewal across concurrent failures, and owns the authenticated session
//! state.

mod coordinator;
mod endpoints;
mod guard;
mod http;
mod jar;
mod store;

pub use coordinator::RenewalCoordinator;
pub use guard::{GuardBuilder, SessionGuard};
pub use jar::{ACCESS_COOKIE, REFRESH_COOKIE, TokenJar};
pub use store::MemoryStore;
