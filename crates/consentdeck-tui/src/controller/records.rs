//! Records controller: self-contained table with two-layer client-side
//! filtering and delegated presentation.
//!
//! Unlike the dashboard, this view filters its cache locally: a record is
//! rendered only if it passes both the status filter and the show-deleted
//! toggle. Badge formatting and the detail modal go through the injected
//! `RecordPresenter`; row actions are view-only.

use consentdeck_core::models::{is_visible, ConsentRecord, StatusFilter};

use super::FetchState;
use crate::ui::presenter::RecordPresenter;

pub struct RecordsController {
    records: Vec<ConsentRecord>,
    pub fetch: FetchState,
    pub selection: usize,
    pub search_query: String,
    pub status_filter: StatusFilter,
    pub show_deleted: bool,
    presenter: Box<dyn RecordPresenter>,
}

impl RecordsController {
    pub fn new(presenter: Box<dyn RecordPresenter>) -> Self {
        Self {
            records: Vec::new(),
            fetch: FetchState::Idle,
            selection: 0,
            search_query: String::new(),
            status_filter: StatusFilter::All,
            show_deleted: false,
            presenter,
        }
    }

    /// Read accessor for the cached list.
    pub fn records(&self) -> &[ConsentRecord] {
        &self.records
    }

    pub fn presenter(&self) -> &dyn RecordPresenter {
        self.presenter.as_ref()
    }

    /// Replace the cache with a completed fetch result.
    pub fn replace_records(&mut self, records: Vec<ConsentRecord>) {
        self.records = records;
        self.fetch = FetchState::Loaded;
        self.clamp_selection();
    }

    pub fn set_loading(&mut self) {
        self.fetch = FetchState::Loading;
    }

    pub fn set_error(&mut self, message: String) {
        self.fetch = FetchState::Error(message);
    }

    /// The re-render entry point: the rows currently visible under both
    /// filter layers, recomputed from the cache.
    pub fn visible_records(&self) -> Vec<&ConsentRecord> {
        self.records
            .iter()
            .filter(|r| is_visible(r, self.status_filter, self.show_deleted))
            .collect()
    }

    pub fn selected_visible(&self) -> Option<&ConsentRecord> {
        self.visible_records().get(self.selection).copied()
    }

    pub fn cache_lookup(&self, consent_id: &str) -> Option<&ConsentRecord> {
        self.records.iter().find(|r| r.consent_id == consent_id)
    }

    pub fn toggle_show_deleted(&mut self) {
        self.show_deleted = !self.show_deleted;
        self.clamp_selection();
    }

    pub fn cycle_status_filter(&mut self) {
        self.status_filter = self.status_filter.next();
        self.clamp_selection();
    }

    pub fn select_next(&mut self, step: usize) {
        let len = self.visible_records().len();
        if len > 0 {
            self.selection = (self.selection + step).min(len - 1);
        }
    }

    pub fn select_prev(&mut self, step: usize) {
        self.selection = self.selection.saturating_sub(step);
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_records().len();
        self.selection = self.selection.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consentdeck_core::models::{StampSet, Timestamps};
    use crate::ui::presenter::BadgePresenter;

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

    fn controller_with_mixed() -> RecordsController {
        let mut ctrl = RecordsController::new(Box::new(BadgePresenter));
        ctrl.replace_records(vec![
            record("a", false),
            record("b", true),
            record("c", false),
        ]);
        ctrl
    }

    #[test]
    fn deleted_rows_hidden_by_default() {
        let ctrl = controller_with_mixed();
        let visible = ctrl.visible_records();
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|r| !r.is_deleted()));
    }

    #[test]
    fn toggling_show_deleted_grows_then_restores_row_count() {
        let mut ctrl = controller_with_mixed();
        let hidden = ctrl.visible_records().len();

        ctrl.toggle_show_deleted();
        let shown = ctrl.visible_records().len();
        assert!(shown >= hidden);
        assert_eq!(shown, 3);

        ctrl.toggle_show_deleted();
        assert_eq!(ctrl.visible_records().len(), hidden);
    }

    #[test]
    fn deleted_filter_without_toggle_shows_nothing() {
        let mut ctrl = controller_with_mixed();
        ctrl.status_filter = StatusFilter::Deleted;
        assert!(ctrl.visible_records().is_empty());

        ctrl.toggle_show_deleted();
        assert_eq!(ctrl.visible_records().len(), 1);
        assert_eq!(ctrl.visible_records()[0].consent_id, "b");
    }

    #[test]
    fn selection_tracks_visible_rows_not_cache() {
        let mut ctrl = controller_with_mixed();
        ctrl.toggle_show_deleted();
        ctrl.select_next(2);
        assert_eq!(ctrl.selected_visible().unwrap().consent_id, "c");

        // Hiding deleted rows shrinks the visible list; selection clamps.
        ctrl.toggle_show_deleted();
        assert!(ctrl.selected_visible().is_some());
        assert!(ctrl.selection < ctrl.visible_records().len());
    }

    #[test]
    fn cache_accessor_sees_hidden_records() {
        let ctrl = controller_with_mixed();
        assert_eq!(ctrl.records().len(), 3);
        assert!(ctrl.cache_lookup("b").is_some());
    }
}
