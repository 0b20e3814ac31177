//! Admin token storage.
//!
//! Token issuance (the login flow) lives outside this application; this
//! module only reads, writes, and clears the stored bearer token.

pub mod token;

pub use token::{TokenStore, TOKEN_ENV_VAR};
