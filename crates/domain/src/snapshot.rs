//! Snapshot of the last accepted monitor payload.

use crate::payload::MonitorPayload;

/// Serialized form of the last payload pushed to the view.
///
/// Replaced wholesale on every accepted update and never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    current: Option<String>,
}

impl Snapshot {
    /// Accept `payload` if it differs from the stored one.
    ///
    /// Returns `false` (and keeps the stored form) when the serialized
    /// payload is identical to the previous one.
    pub fn accept(&mut self, payload: &MonitorPayload) -> bool {
        let json = payload.canonical_json();
        if self.current.as_deref() == Some(json.as_str()) {
            return false;
        }
        self.current = Some(json);
        true
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.current.as_deref()
    }
}
