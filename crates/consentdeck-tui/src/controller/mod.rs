//! View controllers for the two record surfaces.
//!
//! Each controller owns its own fetched-record cache and UI state; nothing is
//! shared between them beyond the API client they are driven with. Fetch
//! lifecycle per controller is idle -> loading -> loaded/error, nothing more.

pub mod dashboard;
pub mod records;

pub use dashboard::DashboardController;
pub use records::RecordsController;

/// Fetch lifecycle for one controller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error(String),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }
}
