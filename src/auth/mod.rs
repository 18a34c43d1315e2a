//! Authentication module
//!
//! Supports: Bearer token, or no authentication (for mock servers)
//!
//! The API authenticates every request with a static bearer token taken
//! from the `token_name` config value. Token acquisition happens outside
//! the tap.

mod authenticator;

pub use authenticator::{AuthConfig, Authenticator};
