//! View port: the rendered side bar, event list and pagination controls.
//!
//! The poller decides *when* something must be redrawn; the view decides
//! *how* (templates, terminal lines, …).

use palette_domain::payload::{FilterConfig, MonitorPayload};
use palette_domain::status::StatusColor;

/// Render target driven by the status poller.
pub trait MonitorView {
    /// Paint the status line text.
    fn show_status_text(&mut self, text: &str);

    /// Paint the status icon color.
    fn show_status_color(&mut self, color: StatusColor);

    /// Replace the event list with the events of `payload`.
    fn render_event_list(&mut self, payload: &MonitorPayload);

    /// Remove every displayed event.
    fn clear_event_list(&mut self);

    /// Show the page navigation controls.
    fn show_pagination(&mut self);

    /// Hide the page navigation controls (the total count stays visible).
    fn hide_pagination(&mut self);

    /// Update the total count and the "page X of Y" indicator.
    fn show_page_info(&mut self, count: u64, page: u32, page_count: u32);

    /// Re-render one filter dropdown from its server-side description.
    fn render_filter_dropdown(&mut self, config: &FilterConfig);

    /// Re-render the server list from the full payload.
    fn render_server_list(&mut self, payload: &MonitorPayload);
}
