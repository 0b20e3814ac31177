//! REST API client module for the consent-tracking backend.
//!
//! Provides the `ApiClient` for fetching consent records, issuing
//! soft-deletes, and ending the admin session. Data endpoints use JWT bearer
//! token authentication; the token is provisioned by the out-of-scope login
//! flow.

pub mod client;
pub mod error;

pub use client::{encode_search_term, ApiClient, DEFAULT_API_BASE_URL};
pub use error::ApiError;
