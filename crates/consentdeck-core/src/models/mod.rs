//! Data models for consent records and row filtering.

pub mod consent;
pub mod filter;

pub use consent::{
    parse_timestamp, ConsentRecord, RecordsResponse, StampSet, Timestamps, RETENTION_DAYS,
};
pub use filter::{is_visible, StatusFilter};
