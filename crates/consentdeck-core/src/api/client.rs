//! API client for the consent-tracking backend.
//!
//! All data endpoints require a bearer token in the Authorization header;
//! the logout endpoint relies on the backend session cookie instead. There
//! is no retry policy: every failure is terminal for the triggering action
//! and surfaces to the caller.

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::Serialize;
use tracing::debug;

use crate::models::{ConsentRecord, RecordsResponse};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL of the production backend.
pub const DEFAULT_API_BASE_URL: &str = "https://backendcookie-8qc1.onrender.com";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct SoftDeleteRequest<'a> {
    #[serde(rename = "consentId")]
    consent_id: &'a str,
}

/// API client for the consent backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// GET a record list, normalizing bare-object responses to one element.
    async fn fetch_list(&self, url: &str) -> Result<Vec<ConsentRecord>> {
        let response = self
            .client
            .get(url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;

        let parsed: RecordsResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))?;

        let records = parsed.into_vec();
        debug!(url, count = records.len(), "Fetched consent records");
        Ok(records)
    }

    // ===== Data Fetching Methods =====

    /// Fetch the full record list (dashboard endpoint).
    pub async fn fetch_records(&self) -> Result<Vec<ConsentRecord>> {
        let url = format!("{}/api/gdpr-data", self.base_url);
        self.fetch_list(&url).await
    }

    /// Fetch the full record list (admin endpoint used by the records view).
    pub async fn fetch_admin_records(&self) -> Result<Vec<ConsentRecord>> {
        let url = format!("{}/api/admin/gdpr-data", self.base_url);
        self.fetch_list(&url).await
    }

    /// Fetch one record by consent ID or search term.
    pub async fn fetch_record(&self, term: &str) -> Result<Vec<ConsentRecord>> {
        let url = format!("{}/api/gdpr-data/{}", self.base_url, term);
        self.fetch_list(&url).await
    }

    // ===== Mutations =====

    /// Mark a record soft-deleted. The backend sets `deletedAt`; the client
    /// holds no optimistic local update.
    pub async fn soft_delete(&self, consent_id: &str) -> Result<()> {
        let url = format!("{}/api/admin/soft-delete", self.base_url);
        let body = SoftDeleteRequest { consent_id };

        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(&body)
            .send()
            .await
            .context("Failed to send soft-delete request")?;

        Self::check_response(response).await?;
        debug!(consent_id, "Record soft-deleted");
        Ok(())
    }

    /// End the admin session. Uses the backend session cookie, not the bearer
    /// token.
    pub async fn logout(&self) -> Result<()> {
        let url = format!("{}/admin/logout", self.base_url);

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .context("Failed to send logout request")?;

        Self::check_response(response).await?;
        Ok(())
    }
}

/// Percent-encode a search term for path interpolation (the records view
/// encodes; the dashboard passes terms through as typed).
pub fn encode_search_term(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for byte in term.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_reserved_characters() {
        assert_eq!(encode_search_term("abc-123"), "abc-123");
        assert_eq!(encode_search_term("10.0.0.1"), "10.0.0.1");
        assert_eq!(encode_search_term("a b/c"), "a%20b%2Fc");
        assert_eq!(encode_search_term("id#1?x=y"), "id%231%3Fx%3Dy");
    }

    #[test]
    fn soft_delete_body_uses_wire_field_name() {
        let body = SoftDeleteRequest { consent_id: "c1" };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"consentId":"c1"}"#);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = ApiClient::new("https://example.test/").unwrap();
        assert_eq!(api.base_url(), "https://example.test");
    }
}
