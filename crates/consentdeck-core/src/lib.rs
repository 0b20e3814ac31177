//! Core library for consentdeck - API client, models, token store, config.
//!
//! The TUI crate builds on this; nothing here touches the terminal.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::TokenStore;
pub use config::Config;
pub use models::{ConsentRecord, StatusFilter};
