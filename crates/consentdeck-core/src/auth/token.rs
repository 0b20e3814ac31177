//! Admin bearer-token storage.
//!
//! The token is issued by the out-of-scope login flow and persisted as a
//! single JSON file under the cache directory. Every authorized request reads
//! it fresh from disk; there is no refresh or expiry tracking - a stale token
//! simply yields a failed fetch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token file name in cache directory
const TOKEN_FILE: &str = "token.json";

/// Environment variable consulted before the token file (development use).
pub const TOKEN_ENV_VAR: &str = "CONSENTDECK_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

pub struct TokenStore {
    cache_dir: PathBuf,
}

impl TokenStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Read the admin token. Always hits the environment/disk so callers see
    /// the latest value written by the login flow.
    pub fn load(&self) -> Option<String> {
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            if !token.is_empty() {
                return Some(token);
            }
        }

        let path = self.token_path();
        if !path.exists() {
            return None;
        }

        let contents = std::fs::read_to_string(&path).ok()?;
        let stored: StoredToken = serde_json::from_str(&contents).ok()?;
        if stored.token.is_empty() {
            None
        } else {
            Some(stored.token)
        }
    }

    /// Persist a token for subsequent requests.
    pub fn save(&self, token: &str) -> Result<()> {
        let stored = StoredToken {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let path = self.token_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&path, contents).context("Failed to write token file")?;
        Ok(())
    }

    /// Remove the stored token (logout).
    pub fn clear(&self) -> Result<()> {
        let path = self.token_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove token file")?;
        }
        Ok(())
    }

    fn token_path(&self) -> PathBuf {
        self.cache_dir.join(TOKEN_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store(name: &str) -> TokenStore {
        let dir = std::env::temp_dir().join(format!("consentdeck-{}-{}", name, std::process::id()));
        TokenStore::new(dir)
    }

    #[test]
    fn save_load_clear_round_trip() {
        let store = test_store("roundtrip");
        store.save("secret-token").unwrap();
        assert_eq!(store.load().as_deref(), Some("secret-token"));

        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn missing_file_yields_none() {
        let store = test_store("missing");
        let _ = store.clear();
        assert_eq!(store.load(), None);
    }
}
