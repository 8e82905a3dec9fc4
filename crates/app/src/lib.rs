//! # palette-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `MonitorClient`: one `GET /rest/monitor` request
//!   - `ActionClient`: user-initiated POSTs
//!   - `CookieJar`: persistence of the last known status
//!   - `MonitorView`: rendering of status, event list and pagination
//!   - `StatePublisher`: the `state` channel
//! - Provide the use-cases:
//!   - `StatusPoller` / `Monitor`: the sequential poll loop
//!   - `PaginationController`: page and filter navigation
//!   - `ActionGate`: which manage actions are currently allowed
//! - Provide **in-process infrastructure** (state bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `palette-domain` only (plus `tokio` for channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod services;
