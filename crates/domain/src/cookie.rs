//! Client-side cookies used to remember the last known status across restarts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::{Timestamp, days_after};

/// Cookie holding the last applied status color.
pub const STATUS_COLOR_COOKIE: &str = "status_color";

/// Cookie holding the last applied status text.
pub const STATUS_TEXT_COOKIE: &str = "status_text";

/// A single `name=value` cookie scoped to `/`.
///
/// Values are stored with spaces replaced by `_`, the way they travel in a
/// `Cookie` header; [`Cookie::value`] gives the decoded form back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    #[serde(rename = "value")]
    raw_value: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<Timestamp>,
}

impl Cookie {
    /// Session cookie (no expiry) scoped to `/`.
    #[must_use]
    pub fn new(name: impl Into<String>, value: &str) -> Self {
        Self {
            name: name.into(),
            raw_value: value.replace(' ', "_"),
            path: "/".to_string(),
            expires: None,
        }
    }

    /// Expire `days` days after `now`.
    #[must_use]
    pub fn expiring_in(mut self, now: Timestamp, days: u32) -> Self {
        self.expires = Some(days_after(now, days));
        self
    }

    /// Decoded value.
    #[must_use]
    pub fn value(&self) -> String {
        self.raw_value.replace('_', " ")
    }

    /// Value as written in the header.
    #[must_use]
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires.is_some_and(|at| at <= now)
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.raw_value)?;
        if let Some(expires) = self.expires {
            write!(
                f,
                "; expires={}",
                expires.format("%a, %d %b %Y %H:%M:%S GMT")
            )?;
        }
        write!(f, "; path={}", self.path)
    }
}
