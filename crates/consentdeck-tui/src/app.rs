//! Application state management for consentdeck.
//!
//! The `App` struct owns the two view controllers, the overlay state, and the
//! background-fetch channel. Every network call runs as a spawned task and
//! reports back through the MPSC channel; results are applied on the UI
//! thread. There is deliberately no request ordering or cancellation - a
//! stale response can overwrite a newer one, and the search debounce timer is
//! the only rate limiter.

use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use consentdeck_core::api::{encode_search_term, ApiClient};
use consentdeck_core::auth::TokenStore;
use consentdeck_core::config::Config;
use consentdeck_core::models::ConsentRecord;

use crate::controller::{DashboardController, RecordsController};
use crate::ui::presenter::{BadgePresenter, DerivedTimestamps};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background fetch message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Quiet period after the last search keystroke before a request is issued.
const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Number of rows to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Error raised by the records view when no token is stored.
pub const MISSING_TOKEN_MESSAGE: &str = "No admin token found. Please log in.";

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Records,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Records => "Records",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Records,
            Tab::Records => Tab::Dashboard,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    ShowingDetail,
    ConfirmingDelete,
    ConfirmingQuit,
    Quitting,
}

/// An open detail modal. Self-removes when dismissed.
pub struct DetailOverlay {
    pub record: ConsentRecord,
    pub stamps: DerivedTimestamps,
    /// Which view opened it - the records view renders through its presenter,
    /// the dashboard through its own inline formatting.
    pub source: Tab,
}

// ============================================================================
// Background Fetch Results
// ============================================================================

/// Result types from background fetch tasks, sent through the MPSC channel
/// back to the main application.
enum FetchResult {
    /// Dashboard list/search fetch completed
    DashboardRecords(Vec<ConsentRecord>),
    DashboardError(String),
    /// Records-view list/search fetch completed
    TableRecords(Vec<ConsentRecord>),
    TableError(String),
    /// Fallback single-ID lookup for the dashboard detail view
    DetailRecords(Vec<ConsentRecord>),
    DetailError(String),
    /// Soft delete acknowledged by the backend
    SoftDeleted(String),
    SoftDeleteError(String),
    /// Logout round trip
    LoggedOut,
    LogoutError(String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
#[allow(dead_code)]
pub struct App {
    // Core services
    pub config: Config,
    pub api: ApiClient,
    pub tokens: TokenStore,

    // UI state
    pub state: AppState,
    pub current_tab: Tab,
    pub detail: Option<DetailOverlay>,
    pub pending_delete: Option<String>,
    pub status_message: Option<String>,

    // View controllers (each owns its record cache)
    pub dashboard: DashboardController,
    pub table: RecordsController,

    // Pending debounced searches, one timer per view
    dashboard_search_deadline: Option<Instant>,
    table_search_deadline: Option<Instant>,

    // Background task channel
    fetch_rx: mpsc::Receiver<FetchResult>,
    fetch_tx: mpsc::Sender<FetchResult>,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let cache_dir = config
            .cache_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("./cache"));
        let tokens = TokenStore::new(cache_dir);

        let api = ApiClient::new(config.api_url())?;
        debug!(base_url = api.base_url(), "API client created");

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            config,
            api,
            tokens,

            state: AppState::Normal,
            current_tab: Tab::Dashboard,
            detail: None,
            pending_delete: None,
            status_message: None,

            dashboard: DashboardController::new(),
            table: RecordsController::new(Box::new(BadgePresenter)),

            dashboard_search_deadline: None,
            table_search_deadline: None,

            fetch_rx: rx,
            fetch_tx: tx,
        })
    }

    /// Initial fetches - both views self-initialize on startup.
    pub fn init(&mut self) {
        self.refresh_dashboard();
        self.refresh_table();
    }

    /// Build a client carrying the token as stored right now. The token is
    /// read fresh for every request; a missing token simply sends the request
    /// unauthenticated and the backend rejects it.
    fn authed_api(&self) -> ApiClient {
        match self.tokens.load() {
            Some(token) => self.api.with_token(token),
            None => self.api.clone(),
        }
    }

    // =========================================================================
    // Dashboard actions
    // =========================================================================

    /// Fetch the full record list for the dashboard.
    pub fn refresh_dashboard(&mut self) {
        self.dashboard.set_loading();
        let api = self.authed_api();
        let tx = self.fetch_tx.clone();

        tokio::spawn(async move {
            let result = match api.fetch_records().await {
                Ok(records) => FetchResult::DashboardRecords(records),
                Err(e) => FetchResult::DashboardError(e.to_string()),
            };
            let _ = tx.send(result).await;
        });
    }

    /// Issue the debounced dashboard search: non-empty terms hit the per-ID
    /// endpoint, an empty box falls back to the full list.
    fn search_dashboard(&mut self) {
        let term = self.dashboard.search_query.trim().to_string();
        self.dashboard.set_loading();
        let api = self.authed_api();
        let tx = self.fetch_tx.clone();

        tokio::spawn(async move {
            let fetched = if term.is_empty() {
                api.fetch_records().await
            } else {
                api.fetch_record(&term).await
            };
            let result = match fetched {
                Ok(records) => FetchResult::DashboardRecords(records),
                Err(e) => FetchResult::DashboardError(e.to_string()),
            };
            let _ = tx.send(result).await;
        });
    }

    /// Open the detail modal for a consent ID, falling back to a single-ID
    /// fetch when the cache no longer holds the record (e.g. after a search
    /// narrowed it). The fallback fetch replaces the cache, then the modal
    /// opens on the first record.
    pub fn view_dashboard_record(&mut self, consent_id: String) {
        if let Some(record) = self.dashboard.record_by_id(&consent_id) {
            let record = record.clone();
            self.open_detail(record, Tab::Dashboard);
            return;
        }

        debug!(%consent_id, "Record not in cache, fetching for detail view");
        self.dashboard.set_loading();
        let api = self.authed_api();
        let tx = self.fetch_tx.clone();

        tokio::spawn(async move {
            let result = match api.fetch_record(&consent_id).await {
                Ok(records) => FetchResult::DetailRecords(records),
                Err(e) => FetchResult::DetailError(e.to_string()),
            };
            let _ = tx.send(result).await;
        });
    }

    /// Ask for confirmation before soft-deleting the selected record.
    /// Already-deleted rows have no delete action.
    pub fn request_soft_delete(&mut self) {
        if let Some(record) = self.dashboard.selected() {
            if !record.is_deleted() {
                self.pending_delete = Some(record.consent_id.clone());
                self.state = AppState::ConfirmingDelete;
            }
        }
    }

    /// Confirmed: issue the soft delete. Backend-only mutation; the local
    /// cache is untouched until the follow-up refresh.
    pub fn confirm_soft_delete(&mut self) {
        self.state = AppState::Normal;
        let Some(consent_id) = self.pending_delete.take() else {
            return;
        };

        let api = self.authed_api();
        let tx = self.fetch_tx.clone();

        tokio::spawn(async move {
            let result = match api.soft_delete(&consent_id).await {
                Ok(()) => FetchResult::SoftDeleted(consent_id),
                Err(e) => FetchResult::SoftDeleteError(e.to_string()),
            };
            let _ = tx.send(result).await;
        });
    }

    pub fn cancel_soft_delete(&mut self) {
        self.pending_delete = None;
        self.state = AppState::Normal;
    }

    /// End the admin session. Uses the session cookie, not the bearer token.
    pub fn logout(&mut self) {
        let api = self.api.clone();
        let tx = self.fetch_tx.clone();

        tokio::spawn(async move {
            let result = match api.logout().await {
                Ok(()) => FetchResult::LoggedOut,
                Err(e) => FetchResult::LogoutError(e.to_string()),
            };
            let _ = tx.send(result).await;
        });
    }

    // =========================================================================
    // Records-view actions
    // =========================================================================

    /// Fetch the full record list for the records view. Unlike the dashboard,
    /// this view checks for a stored token before calling out.
    pub fn refresh_table(&mut self) {
        if self.tokens.load().is_none() {
            self.table.set_error(MISSING_TOKEN_MESSAGE.to_string());
            return;
        }

        self.table.set_loading();
        let api = self.authed_api();
        let tx = self.fetch_tx.clone();

        tokio::spawn(async move {
            let result = match api.fetch_admin_records().await {
                Ok(records) => FetchResult::TableRecords(records),
                Err(e) => FetchResult::TableError(e.to_string()),
            };
            let _ = tx.send(result).await;
        });
    }

    /// Issue the debounced records-view search. The term is percent-encoded
    /// before path interpolation.
    fn search_table(&mut self) {
        if self.tokens.load().is_none() {
            self.table.set_error(MISSING_TOKEN_MESSAGE.to_string());
            return;
        }

        let term = self.table.search_query.trim().to_string();
        self.table.set_loading();
        let api = self.authed_api();
        let tx = self.fetch_tx.clone();

        tokio::spawn(async move {
            let fetched = if term.is_empty() {
                api.fetch_admin_records().await
            } else {
                api.fetch_record(&encode_search_term(&term)).await
            };
            let result = match fetched {
                Ok(records) => FetchResult::TableRecords(records),
                Err(e) => FetchResult::TableError(e.to_string()),
            };
            let _ = tx.send(result).await;
        });
    }

    /// Open the detail modal for the selected visible row. Cache-only lookup;
    /// this view has no fallback fetch.
    pub fn view_table_record(&mut self) {
        let Some(record) = self.table.selected_visible() else {
            return;
        };
        let consent_id = record.consent_id.clone();
        if let Some(record) = self.table.cache_lookup(&consent_id) {
            let record = record.clone();
            self.open_detail(record, Tab::Records);
        }
    }

    // =========================================================================
    // Shared actions
    // =========================================================================

    /// Refresh whichever view is active.
    pub fn refresh_current(&mut self) {
        match self.current_tab {
            Tab::Dashboard => self.refresh_dashboard(),
            Tab::Records => self.refresh_table(),
        }
    }

    /// Open the detail view for the selected row of the active tab.
    pub fn view_selected(&mut self) {
        match self.current_tab {
            Tab::Dashboard => {
                if let Some(record) = self.dashboard.selected() {
                    let consent_id = record.consent_id.clone();
                    self.view_dashboard_record(consent_id);
                }
            }
            Tab::Records => self.view_table_record(),
        }
    }

    fn open_detail(&mut self, record: ConsentRecord, source: Tab) {
        let stamps = DerivedTimestamps::for_record(&record);
        self.detail = Some(DetailOverlay {
            record,
            stamps,
            source,
        });
        self.state = AppState::ShowingDetail;
    }

    /// Dismiss the detail modal.
    pub fn close_detail(&mut self) {
        self.detail = None;
        self.state = AppState::Normal;
    }

    /// Active tab's search query, for the input handler.
    pub fn active_search_query_mut(&mut self) -> &mut String {
        match self.current_tab {
            Tab::Dashboard => &mut self.dashboard.search_query,
            Tab::Records => &mut self.table.search_query,
        }
    }

    /// Restart the debounce timer for the active tab's search.
    pub fn bump_search_debounce(&mut self) {
        let deadline = Instant::now() + Duration::from_millis(SEARCH_DEBOUNCE_MS);
        match self.current_tab {
            Tab::Dashboard => self.dashboard_search_deadline = Some(deadline),
            Tab::Records => self.table_search_deadline = Some(deadline),
        }
    }

    // =========================================================================
    // Background task processing
    // =========================================================================

    /// Fire due debounced searches and apply completed fetches. Called from
    /// the event loop on every tick.
    pub fn check_background_tasks(&mut self) {
        let now = Instant::now();
        if self.dashboard_search_deadline.is_some_and(|d| now >= d) {
            self.dashboard_search_deadline = None;
            self.search_dashboard();
        }
        if self.table_search_deadline.is_some_and(|d| now >= d) {
            self.table_search_deadline = None;
            self.search_table();
        }

        while let Ok(result) = self.fetch_rx.try_recv() {
            self.apply(result);
        }
    }

    /// Apply a completed fetch. Caches are replaced wholesale; whichever
    /// response arrives last wins.
    fn apply(&mut self, result: FetchResult) {
        match result {
            FetchResult::DashboardRecords(records) => {
                debug!(count = records.len(), "Dashboard records fetched");
                self.dashboard.replace_records(records);
            }
            FetchResult::DashboardError(message) => {
                error!(error = %message, "Dashboard fetch failed");
                self.dashboard.set_error(message);
            }
            FetchResult::TableRecords(records) => {
                debug!(count = records.len(), "Table records fetched");
                self.table.replace_records(records);
            }
            FetchResult::TableError(message) => {
                error!(error = %message, "Table fetch failed");
                self.table.set_error(message);
            }
            FetchResult::DetailRecords(records) => {
                self.dashboard.replace_records(records);
                if let Some(first) = self.dashboard.records.first() {
                    let record = first.clone();
                    self.open_detail(record, Tab::Dashboard);
                }
            }
            FetchResult::DetailError(message) => {
                error!(error = %message, "Detail lookup failed");
                self.dashboard.set_error(message);
            }
            FetchResult::SoftDeleted(consent_id) => {
                info!(%consent_id, "Record soft-deleted");
                self.status_message = Some("Data soft-deleted successfully.".to_string());
                self.refresh_dashboard();
            }
            FetchResult::SoftDeleteError(message) => {
                error!(error = %message, "Soft delete failed");
                self.status_message = Some(format!("Failed to soft-delete data: {}", message));
            }
            FetchResult::LoggedOut => {
                info!("Admin session ended");
                if let Err(e) = self.tokens.clear() {
                    warn!(error = %e, "Failed to clear stored token");
                }
                // The page-reload analog: fresh controllers, fresh fetches.
                self.dashboard = DashboardController::new();
                self.table = RecordsController::new(Box::new(BadgePresenter));
                self.status_message = Some("Logged out".to_string());
                self.init();
            }
            FetchResult::LogoutError(message) => {
                error!(error = %message, "Logout failed");
                self.status_message = Some("Logout failed".to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consentdeck_core::models::{StampSet, Timestamps};

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

    #[test]
    fn fetch_results_replace_caches_wholesale() {
        let mut app = App::new().unwrap();
        app.apply(FetchResult::DashboardRecords(vec![
            record("a", false),
            record("b", true),
        ]));
        assert_eq!(app.dashboard.records.len(), 2);

        // A later (possibly stale) response overwrites unconditionally.
        app.apply(FetchResult::DashboardRecords(vec![record("c", false)]));
        assert_eq!(app.dashboard.records.len(), 1);
        assert_eq!(app.dashboard.records[0].consent_id, "c");
    }

    #[test]
    fn fetch_errors_surface_on_the_owning_view_only() {
        let mut app = App::new().unwrap();
        app.apply(FetchResult::TableRecords(vec![record("a", false)]));
        app.apply(FetchResult::DashboardError("HTTP error".to_string()));

        assert!(matches!(
            app.dashboard.fetch,
            crate::controller::FetchState::Error(_)
        ));
        assert_eq!(app.table.records().len(), 1);
    }

    #[test]
    fn detail_lookup_replaces_cache_and_opens_modal_on_first() {
        let mut app = App::new().unwrap();
        app.apply(FetchResult::DetailRecords(vec![record("x", false)]));

        assert_eq!(app.dashboard.records.len(), 1);
        assert_eq!(app.state, AppState::ShowingDetail);
        assert_eq!(app.detail.as_ref().unwrap().record.consent_id, "x");
    }

    #[test]
    fn empty_detail_lookup_opens_nothing() {
        let mut app = App::new().unwrap();
        app.apply(FetchResult::DetailRecords(vec![]));
        assert_eq!(app.state, AppState::Normal);
        assert!(app.detail.is_none());
    }

    #[test]
    fn delete_request_skips_already_deleted_rows() {
        let mut app = App::new().unwrap();
        app.apply(FetchResult::DashboardRecords(vec![record("a", true)]));
        app.request_soft_delete();
        assert_eq!(app.state, AppState::Normal);
        assert!(app.pending_delete.is_none());
    }

    #[test]
    fn delete_request_prompts_for_active_rows() {
        let mut app = App::new().unwrap();
        app.apply(FetchResult::DashboardRecords(vec![record("a", false)]));
        app.request_soft_delete();
        assert_eq!(app.state, AppState::ConfirmingDelete);
        assert_eq!(app.pending_delete.as_deref(), Some("a"));

        app.cancel_soft_delete();
        assert_eq!(app.state, AppState::Normal);
        assert!(app.pending_delete.is_none());
    }

    #[tokio::test]
    async fn soft_delete_success_alerts_and_refreshes() {
        let mut app = App::new().unwrap();
        app.apply(FetchResult::SoftDeleted("a".to_string()));
        assert_eq!(
            app.status_message.as_deref(),
            Some("Data soft-deleted successfully.")
        );
        assert!(app.dashboard.fetch.is_loading());
    }

    #[test]
    fn closing_the_detail_modal_drops_it() {
        let mut app = App::new().unwrap();
        app.apply(FetchResult::DetailRecords(vec![record("x", false)]));
        assert!(app.detail.is_some());

        app.close_detail();
        assert!(app.detail.is_none());
        assert_eq!(app.state, AppState::Normal);
    }
}
