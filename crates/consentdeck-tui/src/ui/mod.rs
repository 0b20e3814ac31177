//! Terminal UI: rendering, styles, input handling, presentation adapter.

pub mod input;
pub mod presenter;
pub mod render;
pub mod styles;
pub mod tabs;
