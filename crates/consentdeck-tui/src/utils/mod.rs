pub mod format;

pub use format::{
    format_instant, format_optional, format_timestamp, title_case_key, truncate, NOT_AVAILABLE,
};
