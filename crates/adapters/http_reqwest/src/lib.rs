//! # palette-adapter-http-reqwest
//!
//! HTTP adapter using [reqwest](https://docs.rs/reqwest).
//!
//! ## Responsibilities
//! - Implement `MonitorClient` (`GET /rest/monitor`) and `ActionClient`
//!   (form POSTs) from `palette-app::ports`
//! - Decode JSON bodies into domain types
//! - Map transport failures into `ConsoleError`
//!
//! ## Dependency rule
//! Depends on `palette-app` (for port traits) and `palette-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod client;
pub mod error;

pub use client::ReqwestClient;
pub use error::HttpError;
