//! Presentation adapter for the records view.
//!
//! The records controller does not format preference badges or build the
//! detail modal itself; it delegates both to a `RecordPresenter` injected at
//! construction, so the presentation can be swapped without touching the
//! controller.

use std::collections::BTreeMap;

use ratatui::text::{Line, Span};

use consentdeck_core::models::ConsentRecord;

use crate::ui::styles;
use crate::utils::{format_instant, format_optional, format_timestamp, title_case_key, NOT_AVAILABLE};

/// Timestamps derived from a record for the detail view, pre-formatted for
/// display ("N/A" when absent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedTimestamps {
    pub created_at: String,
    pub deleted_at: String,
    pub expires_at: String,
}

impl DerivedTimestamps {
    pub fn for_record(record: &ConsentRecord) -> Self {
        Self {
            created_at: format_timestamp(record.created_at()),
            deleted_at: format_timestamp(record.deleted_at()),
            expires_at: record
                .expires_at()
                .map(format_instant)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

/// The two capabilities the records view needs from its presentation layer.
pub trait RecordPresenter {
    /// Render a preference map as a badge line ("N/A" when empty).
    fn format_preferences(&self, prefs: &BTreeMap<String, bool>) -> Line<'static>;

    /// Render the detail-modal body for a record.
    fn detail_view(&self, record: &ConsentRecord, stamps: &DerivedTimestamps) -> Vec<Line<'static>>;
}

/// Default presenter: colored badges and labeled detail lines.
pub struct BadgePresenter;

impl RecordPresenter for BadgePresenter {
    fn format_preferences(&self, prefs: &BTreeMap<String, bool>) -> Line<'static> {
        if prefs.is_empty() {
            return Line::from(Span::styled(NOT_AVAILABLE, styles::muted_style()));
        }

        let mut spans = Vec::with_capacity(prefs.len() * 2);
        for (i, (key, granted)) in prefs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            let label = format!(
                "{}: {}",
                title_case_key(key),
                if *granted { "Yes" } else { "No" }
            );
            let style = if *granted {
                styles::badge_granted_style()
            } else {
                styles::badge_denied_style()
            };
            spans.push(Span::styled(label, style));
        }
        Line::from(spans)
    }

    fn detail_view(&self, record: &ConsentRecord, stamps: &DerivedTimestamps) -> Vec<Line<'static>> {
        let field = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{:<16}", label), styles::muted_style()),
                Span::raw(value),
            ])
        };

        let cookie = record.timestamps.cookie_preferences.as_ref();

        let mut lines = vec![
            Line::from(Span::styled(
                format!("Details for {}", record.consent_id),
                styles::title_style(),
            )),
            Line::from(""),
            field("Consent ID:", format_optional(Some(record.consent_id.as_str()))),
            field("IP Address:", format_optional(record.ip_address.as_deref())),
            field("ISP:", format_optional(record.isp.as_deref())),
            field("City:", format_optional(record.city.as_deref())),
            field("Country:", format_optional(record.country.as_deref())),
            field("Purpose:", format_optional(record.purpose.as_deref())),
            field(
                "Consent Status:",
                format_optional(record.consent_status.as_deref()),
            ),
            Line::from(""),
            field(
                "Cookie Stamps:",
                format!(
                    "Created: {}, Updated: {}",
                    format_timestamp(cookie.and_then(|s| s.created_at.as_deref())),
                    format_timestamp(cookie.and_then(|s| s.updated_at.as_deref())),
                ),
            ),
            field("Created At:", stamps.created_at.clone()),
            field("Deleted At:", stamps.deleted_at.clone()),
            field("Expires At:", stamps.expires_at.clone()),
            Line::from(""),
        ];

        let mut pref_line = vec![Span::styled(
            format!("{:<16}", "Preferences:"),
            styles::muted_style(),
        )];
        pref_line.extend(self.format_preferences(&record.preferences).spans);
        lines.push(Line::from(pref_line));

        lines.push(field("Username:", format_optional(record.username.as_deref())));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn badge_texts(line: &Line) -> Vec<String> {
        line.spans
            .iter()
            .map(|s| s.content.to_string())
            .filter(|s| s != " ")
            .collect()
    }

    #[test]
    fn badges_carry_title_case_labels_and_yes_no() {
        let mut prefs = BTreeMap::new();
        prefs.insert("analyticsCookies".to_string(), true);
        prefs.insert("marketingCookies".to_string(), false);

        let line = BadgePresenter.format_preferences(&prefs);
        let texts = badge_texts(&line);
        assert_eq!(texts, vec!["Analytics Cookies: Yes", "Marketing Cookies: No"]);
    }

    #[test]
    fn badge_styles_encode_granted_and_denied() {
        let mut prefs = BTreeMap::new();
        prefs.insert("analyticsCookies".to_string(), true);
        prefs.insert("marketingCookies".to_string(), false);

        let line = BadgePresenter.format_preferences(&prefs);
        let styled: Vec<_> = line.spans.iter().filter(|s| s.content != " ").collect();
        assert_eq!(styled[0].style, styles::badge_granted_style());
        assert_eq!(styled[1].style, styles::badge_denied_style());
    }

    #[test]
    fn empty_preferences_render_na() {
        let line = BadgePresenter.format_preferences(&BTreeMap::new());
        assert_eq!(badge_texts(&line), vec!["N/A"]);
    }

    #[test]
    fn derived_timestamps_default_to_na() {
        let record = ConsentRecord {
            consent_id: "c1".to_string(),
            ..Default::default()
        };
        let stamps = DerivedTimestamps::for_record(&record);
        assert_eq!(stamps.created_at, "N/A");
        assert_eq!(stamps.deleted_at, "N/A");
        assert_eq!(stamps.expires_at, "N/A");
    }

    #[test]
    fn detail_view_never_renders_blank_fields() {
        let record = ConsentRecord {
            consent_id: "c1".to_string(),
            ..Default::default()
        };
        let stamps = DerivedTimestamps::for_record(&record);
        let lines = BadgePresenter.detail_view(&record, &stamps);

        // Every labeled line has a non-empty value span.
        for line in &lines {
            if line.spans.len() >= 2 {
                let value = line.spans[1..]
                    .iter()
                    .map(|s| s.content.to_string())
                    .collect::<String>();
                assert!(!value.trim().is_empty());
            }
        }
    }
}
