//! Plain-text formatting of monitor payload parts.

use palette_domain::payload::{FilterConfig, MonitorEvent, MonitorPayload};
use palette_domain::status::StatusColor;

/// Status line, e.g. `[green] Running`.
#[must_use]
pub fn status_line(text: &str, color: Option<StatusColor>) -> String {
    match color {
        Some(color) => format!("[{color}] {text}"),
        None => format!("[?] {text}"),
    }
}

/// One event row: id, level letter, summary (date) and title.
#[must_use]
pub fn event_line(event: &MonitorEvent) -> String {
    let level = event.field_str("level").unwrap_or("-");
    let title = event.field_str("title").unwrap_or("");
    match event.field_str("summary") {
        Some(summary) => format!("{:>8} {level} {summary}  {title}", event.eventid),
        None => format!("{:>8} {level} {title}", event.eventid),
    }
}

fn option_id(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Filter dropdown: selected label followed by the selectable ids.
#[must_use]
pub fn dropdown_line(config: &FilterConfig) -> String {
    let selected = config.value.as_deref().unwrap_or("-");
    let options: Vec<String> = config
        .options
        .iter()
        .map(|option| format!("{}={}", option_id(&option.id), option.item))
        .collect();
    if options.is_empty() {
        format!("{}: {selected}", config.name)
    } else {
        format!("{}: {selected} ({})", config.name, options.join(", "))
    }
}

/// Total count and page indicator.
#[must_use]
pub fn page_line(count: u64, page: u32, page_count: u32) -> String {
    format!("{count} events, page {page} of {}", page_count.max(1))
}

/// Server summary: state, agent connection and allowed actions.
#[must_use]
pub fn server_lines(payload: &MonitorPayload) -> Vec<String> {
    let mut lines = Vec::new();
    let state = payload.state.as_deref().unwrap_or("UNKNOWN");
    let connection = match payload.connected {
        Some(true) => "agent connected",
        Some(false) => "agent disconnected",
        None => "agent unknown",
    };
    lines.push(format!("server: {state} ({connection})"));
    if let Some(actions) = payload.allowable_actions.as_ref().filter(|a| !a.is_empty()) {
        lines.push(format!("actions: {}", actions.join(", ")));
    }
    lines
}
