//! Client-side row filtering for the records view.

use super::ConsentRecord;

/// Status dropdown values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Deleted,
}

impl StatusFilter {
    /// Whether a record passes this filter on its own.
    pub fn matches(&self, record: &ConsentRecord) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !record.is_deleted(),
            StatusFilter::Deleted => record.is_deleted(),
        }
    }

    /// Cycle to the next filter value (wrapping around).
    pub fn next(&self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Deleted,
            StatusFilter::Deleted => StatusFilter::All,
        }
    }

    /// Display label for the filter control.
    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All Records",
            StatusFilter::Active => "Active Only",
            StatusFilter::Deleted => "Deleted Only",
        }
    }
}

/// Two-layer visibility rule: a record renders only if it passes BOTH the
/// dropdown filter AND the show-deleted toggle. The layers compose with AND
/// semantics; neither overrides the other.
pub fn is_visible(record: &ConsentRecord, filter: StatusFilter, show_deleted: bool) -> bool {
    filter.matches(record) && (show_deleted || !record.is_deleted())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StampSet, Timestamps};

    fn record(id: &str, deleted: bool) -> ConsentRecord {
        ConsentRecord {
            consent_id: id.to_string(),
            timestamps: Timestamps {
                location: deleted.then(|| StampSet {
                    deleted_at: Some("2024-01-01T00:00:00Z".to_string()),
                    ..Default::default()
                }),
                cookie_preferences: None,
            },
            ..Default::default()
        }
    }

    fn mixed() -> Vec<ConsentRecord> {
        vec![
            record("a", false),
            record("b", true),
            record("c", false),
            record("d", true),
        ]
    }

    fn visible_count(records: &[ConsentRecord], filter: StatusFilter, show_deleted: bool) -> usize {
        records
            .iter()
            .filter(|r| is_visible(r, filter, show_deleted))
            .count()
    }

    #[test]
    fn deleted_filter_with_toggle_off_yields_zero_rows() {
        let records = mixed();
        assert_eq!(visible_count(&records, StatusFilter::Deleted, false), 0);
    }

    #[test]
    fn toggling_show_deleted_is_monotonic_and_reversible() {
        let records = mixed();
        for filter in [StatusFilter::All, StatusFilter::Active, StatusFilter::Deleted] {
            let hidden = visible_count(&records, filter, false);
            let shown = visible_count(&records, filter, true);
            assert!(shown >= hidden);
            // Toggling back restores the original count.
            assert_eq!(visible_count(&records, filter, false), hidden);
        }
    }

    #[test]
    fn active_filter_excludes_deleted_regardless_of_toggle() {
        let records = mixed();
        assert_eq!(visible_count(&records, StatusFilter::Active, false), 2);
        assert_eq!(visible_count(&records, StatusFilter::Active, true), 2);
    }

    #[test]
    fn all_filter_with_toggle_on_shows_everything() {
        let records = mixed();
        assert_eq!(visible_count(&records, StatusFilter::All, true), 4);
        assert_eq!(visible_count(&records, StatusFilter::All, false), 2);
    }

    #[test]
    fn filter_cycles_through_all_values() {
        assert_eq!(StatusFilter::All.next(), StatusFilter::Active);
        assert_eq!(StatusFilter::Active.next(), StatusFilter::Deleted);
        assert_eq!(StatusFilter::Deleted.next(), StatusFilter::All);
    }
}
