//! Domain model for consent records.
//!
//! `ConsentRecord` mirrors the backend's wire format: a flat object with
//! display fields, a preference map, and nested timestamp groups. Dates stay
//! as ISO-8601 strings the way the API sends them and are parsed at display
//! time.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Days a soft-deleted record is retained before expiry.
pub const RETENTION_DAYS: i64 = 90;

/// One user's cookie-consent decision record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsentRecord {
    #[serde(rename = "consentId", default)]
    pub consent_id: String,
    #[serde(rename = "ipAddress")]
    pub ip_address: Option<String>,
    pub isp: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub purpose: Option<String>,
    #[serde(rename = "consentStatus")]
    pub consent_status: Option<String>,
    /// Preference name -> granted. BTreeMap keeps badge order stable.
    #[serde(default)]
    pub preferences: BTreeMap<String, bool>,
    pub username: Option<String>,
    #[serde(default)]
    pub timestamps: Timestamps,
}

/// Nested timestamp groups as sent by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timestamps {
    #[serde(default)]
    pub location: Option<StampSet>,
    #[serde(rename = "cookiePreferences", default)]
    pub cookie_preferences: Option<StampSet>,
}

/// Created/updated/deleted stamps, each an ISO-8601 string or absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StampSet {
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
    #[serde(rename = "deletedAt")]
    pub deleted_at: Option<String>,
}

impl ConsentRecord {
    /// Raw `deletedAt` stamp, if the record has been soft-deleted.
    pub fn deleted_at(&self) -> Option<&str> {
        self.timestamps
            .location
            .as_ref()
            .and_then(|s| s.deleted_at.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// A record is soft-deleted iff `timestamps.location.deletedAt` is present.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }

    /// Raw `location.createdAt` stamp.
    pub fn created_at(&self) -> Option<&str> {
        self.timestamps
            .location
            .as_ref()
            .and_then(|s| s.created_at.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Deletion instant, parsed.
    pub fn deleted_at_utc(&self) -> Option<DateTime<Utc>> {
        self.deleted_at().and_then(parse_timestamp)
    }

    /// Retention expiry: `deletedAt + 90 days`. Display only, never persisted.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at_utc().map(|dt| dt + Duration::days(RETENTION_DAYS))
    }
}

/// Parse an ISO-8601 timestamp as sent by the backend.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// The list endpoints return an array; the per-ID endpoint returns a bare
/// object. Both normalize to a record list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecordsResponse {
    Many(Vec<ConsentRecord>),
    One(Box<ConsentRecord>),
}

impl RecordsResponse {
    pub fn into_vec(self) -> Vec<ConsentRecord> {
        match self {
            RecordsResponse::Many(records) => records,
            RecordsResponse::One(record) => vec![*record],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn deleted_record(deleted_at: &str) -> ConsentRecord {
        ConsentRecord {
            consent_id: "c1".to_string(),
            timestamps: Timestamps {
                location: Some(StampSet {
                    deleted_at: Some(deleted_at.to_string()),
                    ..Default::default()
                }),
                cookie_preferences: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn expiry_is_deleted_at_plus_90_days() {
        let record = deleted_record("2024-01-01T00:00:00Z");
        let expected = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        assert_eq!(record.expires_at(), Some(expected));
    }

    #[test]
    fn active_record_has_no_expiry() {
        let record = ConsentRecord {
            consent_id: "c2".to_string(),
            ..Default::default()
        };
        assert!(!record.is_deleted());
        assert_eq!(record.expires_at(), None);
    }

    #[test]
    fn empty_deleted_at_counts_as_active() {
        let record = deleted_record("");
        assert!(!record.is_deleted());
    }

    #[test]
    fn decodes_wire_camel_case() {
        let json = r#"{
            "consentId": "abc",
            "ipAddress": "10.0.0.1",
            "consentStatus": "accepted",
            "preferences": {"analyticsCookies": true},
            "timestamps": {
                "location": {"createdAt": "2024-05-01T12:00:00Z"},
                "cookiePreferences": {"updatedAt": "2024-05-02T12:00:00Z"}
            }
        }"#;
        let record: ConsentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.consent_id, "abc");
        assert_eq!(record.ip_address.as_deref(), Some("10.0.0.1"));
        assert_eq!(record.preferences.get("analyticsCookies"), Some(&true));
        assert_eq!(record.created_at(), Some("2024-05-01T12:00:00Z"));
        assert!(!record.is_deleted());
    }

    #[test]
    fn one_or_many_both_normalize_to_a_list() {
        let one: RecordsResponse = serde_json::from_str(r#"{"consentId": "a"}"#).unwrap();
        assert_eq!(one.into_vec().len(), 1);

        let many: RecordsResponse =
            serde_json::from_str(r#"[{"consentId": "a"}, {"consentId": "b"}]"#).unwrap();
        assert_eq!(many.into_vec().len(), 2);

        let empty: RecordsResponse = serde_json::from_str("[]").unwrap();
        assert!(empty.into_vec().is_empty());
    }
}
