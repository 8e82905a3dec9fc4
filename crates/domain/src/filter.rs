//! Event filter: the current view into the paginated, filterable event log.
//!
//! The filter is a small state machine driven from two sides: user
//! navigation (page and dropdown changes) and monitor responses (event
//! window, total count). It also produces the query string of the next
//! monitor request.

use std::collections::BTreeMap;
use std::fmt;

use crate::payload::MonitorEvent;

/// Events per page.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Selector value meaning "no filter applied".
pub const NO_FILTER: &str = "0";

/// Filter dimensions known to the event log.
pub const DEFAULT_SELECTORS: [&str; 2] = ["status", "type"];

/// Cheap fingerprint of the displayed event window.
///
/// Events are ordered, so the first id, the last id and the length are
/// enough to tell whether the window changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowSummary {
    pub first: i64,
    pub last: i64,
    pub count: usize,
}

impl WindowSummary {
    /// Summarize a non-empty batch; `None` for an empty one.
    #[must_use]
    pub fn of(events: &[MonitorEvent]) -> Option<Self> {
        let first = events.first()?;
        let last = events.last()?;
        Some(Self {
            first: first.eventid,
            last: last.eventid,
            count: events.len(),
        })
    }
}

/// Outcome of applying an event batch to the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowChange {
    /// The batch was empty: list cleared, reference time dropped.
    Cleared,
    /// Same window as the one displayed; nothing to render.
    Unchanged,
    /// New window; the list must be re-rendered.
    Replaced,
}

/// Ordered `key=value` parameters of a monitor request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorQuery {
    params: Vec<(String, String)>,
}

impl MonitorQuery {
    fn push(&mut self, key: &str, value: impl ToString) {
        self.params.push((key.to_string(), value.to_string()));
    }

    /// Value of the first parameter named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Percent-encode a query parameter value (handles `+`, `&`, `=`, spaces, etc.).
fn encode_query_value(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('+', "%2B")
        .replace('&', "%26")
        .replace('=', "%3D")
        .replace(' ', "%20")
}

impl fmt::Display for MonitorQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{key}={}", encode_query_value(value))?;
        }
        Ok(())
    }
}

/// Pagination and filter state of the event log.
#[derive(Debug, Clone, PartialEq)]
pub struct EventFilter {
    page: u32,
    limit: u32,
    count: u64,
    seq: u64,
    reference: Option<f64>,
    selectors: BTreeMap<String, String>,
    current: WindowSummary,
    live_update: bool,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl EventFilter {
    /// Fresh filter on page 1 with every selector unset.
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            count: 0,
            seq: 0,
            reference: None,
            selectors: DEFAULT_SELECTORS
                .iter()
                .map(|name| ((*name).to_string(), NO_FILTER.to_string()))
                .collect(),
            current: WindowSummary::default(),
            live_update: true,
        }
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    #[must_use]
    pub fn reference(&self) -> Option<f64> {
        self.reference
    }

    #[must_use]
    pub fn current(&self) -> WindowSummary {
        self.current
    }

    #[must_use]
    pub fn live_update(&self) -> bool {
        self.live_update
    }

    /// Stored value of a selector, if the selector exists.
    #[must_use]
    pub fn selector(&self, name: &str) -> Option<&str> {
        self.selectors.get(name).map(String::as_str)
    }

    /// Number of pages for the current total (ceiling of `count / limit`).
    #[must_use]
    pub fn page_count(&self) -> u32 {
        let limit = u64::from(self.limit.max(1));
        let pages = self.count.div_ceil(limit);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Move to page `n` (clamped to 1) and keep the list live for at least
    /// one more poll cycle.
    pub fn set_page(&mut self, n: u32) {
        let n = n.max(1);
        if n != self.page {
            self.seq = 0;
        }
        self.page = n;
        self.live_update = true;
    }

    /// Back to page 1 after a filter change.
    pub fn reset_to_first_page(&mut self) {
        self.page = 1;
        self.seq = 0;
        self.live_update = true;
    }

    /// Restart the request sequence (next query carries `seq=0`).
    pub fn reset_seq(&mut self) {
        self.seq = 0;
    }

    /// Build the query of the next monitor request.
    ///
    /// `dropdowns` holds the values currently selected in the filter
    /// dropdowns. Selectors without a dropdown are left out of the query;
    /// a dropdown value that differs from the stored one is adopted, which
    /// sends the view back to page 1 with a fresh sequence.
    pub fn build_query(
        &mut self,
        include_events: bool,
        dropdowns: &BTreeMap<String, String>,
    ) -> MonitorQuery {
        let mut query = MonitorQuery::default();

        if !include_events {
            query.push("seq", self.next_seq());
            query.push("event", "false");
            return query;
        }

        let mut selected = Vec::new();
        let mut changed = false;
        for (key, stored) in &mut self.selectors {
            let Some(value) = dropdowns.get(key) else {
                continue;
            };
            if value != stored {
                stored.clone_from(value);
                changed = true;
            }
            if value != NO_FILTER {
                selected.push((key.clone(), value.clone()));
            }
        }
        if changed {
            self.reset_to_first_page();
        }

        query.push("seq", self.next_seq());
        for (key, value) in selected {
            query.push(&key, value);
        }

        let reference = self
            .reference
            .map_or_else(|| "null".to_string(), |r| r.to_string());
        if self.page > 1 {
            if self.live_update {
                query.push("limit", self.limit);
                query.push("page", self.page);
                query.push("ref", reference);
            } else {
                query.push("event", "false");
            }
        } else {
            query.push("limit", self.limit);
            query.push("ref", reference);
        }
        query
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.seq;
        self.seq += 1;
        seq
    }

    /// Apply a freshly received event batch.
    pub fn apply_window(&mut self, events: &[MonitorEvent]) -> WindowChange {
        let Some(summary) = WindowSummary::of(events) else {
            self.reference = None;
            self.current = WindowSummary::default();
            return WindowChange::Cleared;
        };
        if summary == self.current {
            return WindowChange::Unchanged;
        }
        self.current = summary;
        if self.page == 1 {
            self.reference = events[0].reference_time;
        }
        WindowChange::Replaced
    }

    /// Record the total number of matching events reported by the server.
    pub fn apply_event_count(&mut self, count: u64) {
        self.count = count;
    }

    /// Pages past the first are a frozen snapshot: stop refreshing them.
    pub fn freeze_paged_view(&mut self) {
        if self.page > 1 {
            self.live_update = false;
        }
    }
}
