use chrono::{DateTime, Local, Utc};

use consentdeck_core::models::parse_timestamp;

/// Placeholder shown for absent fields. Never render blank cells.
pub const NOT_AVAILABLE: &str = "N/A";

/// Format an optional display field, treating empty strings as absent.
pub fn format_optional(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Format a wire timestamp in local time, "N/A" when absent.
/// Unparseable values pass through as-is rather than rendering blank.
pub fn format_timestamp(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => match parse_timestamp(s) {
            Some(dt) => format_instant(dt),
            None => s.to_string(),
        },
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Format an instant in local time.
pub fn format_instant(dt: DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%b %d, %Y %H:%M").to_string()
}

/// Convert a camelCase preference key to spaced Title Case
/// ("analyticsCookies" -> "Analytics Cookies").
pub fn title_case_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else {
            if c.is_uppercase() {
                out.push(' ');
            }
            out.push(c);
        }
    }
    out
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    let cleaned: String = s.replace('\t', " ").trim().to_string();
    if cleaned.chars().count() <= max_len {
        cleaned
    } else {
        let kept: String = cleaned.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_show_na_never_blank() {
        assert_eq!(format_optional(None), "N/A");
        assert_eq!(format_optional(Some("")), "N/A");
        assert_eq!(format_optional(Some("   ")), "N/A");
        assert_eq!(format_optional(Some("Berlin")), "Berlin");
    }

    #[test]
    fn absent_timestamps_show_na() {
        assert_eq!(format_timestamp(None), "N/A");
        assert_eq!(format_timestamp(Some("")), "N/A");
    }

    #[test]
    fn unparseable_timestamps_pass_through() {
        assert_eq!(format_timestamp(Some("yesterday")), "yesterday");
    }

    #[test]
    fn valid_timestamps_render_non_empty() {
        let rendered = format_timestamp(Some("2024-01-01T00:00:00Z"));
        assert!(rendered.contains("2024") || rendered.contains("2023"));
        assert_ne!(rendered, "N/A");
    }

    #[test]
    fn camel_case_keys_become_title_case() {
        assert_eq!(title_case_key("analyticsCookies"), "Analytics Cookies");
        assert_eq!(title_case_key("marketingCookies"), "Marketing Cookies");
        assert_eq!(title_case_key("performance"), "Performance");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello W…");
    }
}
