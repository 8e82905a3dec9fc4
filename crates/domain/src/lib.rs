//! # palette-domain
//!
//! Pure domain model of the palette administration console.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps, cookies
//! - Define the **monitor payload** returned by `/rest/monitor`
//! - Define the **event filter** (pagination, selectors, live update) and
//!   the query it produces
//! - Define the **snapshot** and **status display** used for change detection
//! - Define the **actions** offered by the manage page
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod action;
pub mod cookie;
pub mod filter;
pub mod payload;
pub mod snapshot;
pub mod status;
