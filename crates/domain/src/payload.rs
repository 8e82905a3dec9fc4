//! Monitor payload: the body returned by `GET /rest/monitor`.
//!
//! Only the fields the console reacts to are typed. Everything else the
//! server sends is kept verbatim in `extra` so that the serialized form
//! still covers the whole body when it is compared against the previous
//! snapshot.
//!
//! Decoding is lenient: a top-level field whose shape does not match (an
//! event without `eventid`, `events` sent as a string, ...) decodes as
//! absent, so the remaining parts of the payload still apply.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::status::{DISCONNECTED_TEXT, StatusColor};

/// One row of the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorEvent {
    pub eventid: i64,
    /// Epoch seconds with sub-second precision.
    #[serde(
        rename = "reference-time",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reference_time: Option<f64>,
    /// Remaining event fields (title, summary, level, …) used by the renderer.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl MonitorEvent {
    /// Build an event with no extra fields.
    #[must_use]
    pub fn new(eventid: i64, reference_time: Option<f64>) -> Self {
        Self {
            eventid,
            reference_time,
            fields: Map::new(),
        }
    }

    /// Look up an extra field as a string.
    #[must_use]
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// One selectable entry of a filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    #[serde(default)]
    pub id: Value,
    pub item: String,
}

/// Description of a filter dropdown (`status`, `type`, …) sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default)]
    pub options: Vec<FilterOption>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Decoded `/rest/monitor` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorPayload {
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub state: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub text: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<String>,
    /// `None` when the request asked for `event=false`.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub events: Option<Vec<MonitorEvent>>,
    #[serde(
        rename = "reference-time",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub reference_time: Option<f64>,
    #[serde(
        rename = "event-count",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_count: Option<u64>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub config: Option<Vec<FilterConfig>>,
    #[serde(
        rename = "allowable-actions",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub allowable_actions: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub connected: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MonitorPayload {
    /// Synthetic status pushed through the update path when a poll fails.
    #[must_use]
    pub fn disconnected() -> Self {
        Self {
            text: Some(DISCONNECTED_TEXT.to_string()),
            color: Some(StatusColor::Yellow.to_string()),
            ..Self::default()
        }
    }

    /// Canonical serialized form used for change detection.
    ///
    /// Keys of the untyped parts are ordered, so two structurally equal
    /// payloads always produce the same string.
    #[must_use]
    pub fn canonical_json(&self) -> String {
        // Serializing plain data (strings, numbers, maps) cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Same payload without the parts that describe the event log
    /// (list, total, reference time, filter dropdowns).
    ///
    /// Used when the answered request predates a page or filter change.
    #[must_use]
    pub fn without_event_view(&self) -> Self {
        Self {
            events: None,
            reference_time: None,
            event_count: None,
            config: None,
            ..self.clone()
        }
    }
}

/// Decode an optional field, mapping a mismatched shape to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}
