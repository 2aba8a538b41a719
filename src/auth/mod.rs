//! Authentication module
//!
//! Supports: none, static bearer token.
//!
//! Tokens are attached as-is; there is no login or refresh flow.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::AuthConfig;
