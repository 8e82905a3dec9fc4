//! # palette-adapter-cookie-file
//!
//! Cookie jar adapters.
//!
//! ## Responsibilities
//! - Implement the `CookieJar` port from `palette-app::ports`
//! - Persist cookies as a JSON document so the last known status survives
//!   a restart of the console
//! - Hide expired cookies from readers
//!
//! ## Dependency rule
//! Depends on `palette-app` (for port traits) and `palette-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod file_jar;
pub mod memory_jar;

pub use error::CookieError;
pub use file_jar::FileCookieJar;
pub use memory_jar::MemoryCookieJar;
