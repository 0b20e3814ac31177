//! Dashboard controller: full record table with view and soft-delete actions.
//!
//! Search round-trips to the backend after the debounce quiet period; no
//! client-side filtering is applied. The record cache is replaced wholesale by
//! every completed fetch.

use consentdeck_core::models::ConsentRecord;

use super::FetchState;

pub struct DashboardController {
    /// Last fetched record list, replaced wholesale on every fetch.
    pub records: Vec<ConsentRecord>,
    pub fetch: FetchState,
    pub selection: usize,
    pub search_query: String,
}

impl DashboardController {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            fetch: FetchState::Idle,
            selection: 0,
            search_query: String::new(),
        }
    }

    /// Replace the cache with a completed fetch result.
    pub fn replace_records(&mut self, records: Vec<ConsentRecord>) {
        self.records = records;
        self.fetch = FetchState::Loaded;
        self.selection = self.selection.min(self.records.len().saturating_sub(1));
    }

    pub fn set_loading(&mut self) {
        self.fetch = FetchState::Loading;
    }

    pub fn set_error(&mut self, message: String) {
        self.fetch = FetchState::Error(message);
    }

    /// Cache lookup by consent ID (the view action's first stop).
    pub fn record_by_id(&self, consent_id: &str) -> Option<&ConsentRecord> {
        self.records.iter().find(|r| r.consent_id == consent_id)
    }

    pub fn selected(&self) -> Option<&ConsentRecord> {
        self.records.get(self.selection)
    }

    pub fn select_next(&mut self, step: usize) {
        if !self.records.is_empty() {
            self.selection = (self.selection + step).min(self.records.len() - 1);
        }
    }

    pub fn select_prev(&mut self, step: usize) {
        self.selection = self.selection.saturating_sub(step);
    }
}

impl Default for DashboardController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> ConsentRecord {
        ConsentRecord {
            consent_id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn replace_overwrites_wholesale() {
        let mut ctrl = DashboardController::new();
        ctrl.replace_records(vec![record("a"), record("b"), record("c")]);
        assert_eq!(ctrl.records.len(), 3);

        // A narrower search result replaces, never merges.
        ctrl.replace_records(vec![record("z")]);
        assert_eq!(ctrl.records.len(), 1);
        assert_eq!(ctrl.records[0].consent_id, "z");
        assert!(ctrl.record_by_id("a").is_none());
    }

    #[test]
    fn selection_clamps_to_shrunken_cache() {
        let mut ctrl = DashboardController::new();
        ctrl.replace_records(vec![record("a"), record("b"), record("c")]);
        ctrl.select_next(2);
        assert_eq!(ctrl.selection, 2);

        ctrl.replace_records(vec![record("z")]);
        assert_eq!(ctrl.selection, 0);
        assert_eq!(ctrl.selected().unwrap().consent_id, "z");
    }

    #[test]
    fn selection_saturates_at_bounds() {
        let mut ctrl = DashboardController::new();
        ctrl.replace_records(vec![record("a"), record("b")]);
        ctrl.select_prev(5);
        assert_eq!(ctrl.selection, 0);
        ctrl.select_next(10);
        assert_eq!(ctrl.selection, 1);
    }
}
