//! # palette-adapter-terminal
//!
//! Line-oriented rendering of the status monitor.
//!
//! ## Responsibilities
//! - Implement the `MonitorView` port from `palette-app::ports`
//! - Format the status line, the event list, the filter dropdowns and the
//!   page indicator as plain text
//!
//! ## Dependency rule
//! Depends on `palette-app` (for port traits) and `palette-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod render;
pub mod view;

pub use view::TerminalView;
