//! [`MonitorView`] writing to any `io::Write` sink (stdout in the binary).

use std::io::Write;

use palette_app::ports::MonitorView;
use palette_domain::payload::{FilterConfig, MonitorPayload};
use palette_domain::status::StatusColor;

use crate::render;

/// Hint printed while more than one page is available.
const NAVIGATION_HINT: &str = "[n]ext [p]rev [f]irst [l]ast [g <page>]";

/// Terminal renderer of the status monitor.
pub struct TerminalView<W> {
    out: W,
    text: Option<String>,
    color: Option<StatusColor>,
    pagination: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            text: None,
            color: None,
            pagination: false,
        }
    }

    /// Whether the navigation hint is currently shown.
    #[must_use]
    pub fn pagination_visible(&self) -> bool {
        self.pagination
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, line: &str) {
        if let Err(err) = writeln!(self.out, "{line}") {
            tracing::warn!(%err, "failed to write to terminal");
        }
    }

    fn flush(&mut self) {
        if let Err(err) = self.out.flush() {
            tracing::warn!(%err, "failed to flush terminal");
        }
    }

    fn repaint_status(&mut self) {
        let line = render::status_line(self.text.as_deref().unwrap_or(""), self.color);
        self.line(&line);
        self.flush();
    }
}

impl<W: Write> MonitorView for TerminalView<W> {
    fn show_status_text(&mut self, text: &str) {
        self.text = Some(text.to_string());
        self.repaint_status();
    }

    fn show_status_color(&mut self, color: StatusColor) {
        self.color = Some(color);
        self.repaint_status();
    }

    fn render_event_list(&mut self, payload: &MonitorPayload) {
        let lines: Vec<String> = payload
            .events
            .iter()
            .flatten()
            .map(render::event_line)
            .collect();
        self.line("-- events --");
        for line in &lines {
            self.line(line);
        }
        self.flush();
    }

    fn clear_event_list(&mut self) {
        self.line("-- no events --");
        self.flush();
    }

    fn show_pagination(&mut self) {
        self.pagination = true;
        self.line(NAVIGATION_HINT);
    }

    fn hide_pagination(&mut self) {
        self.pagination = false;
    }

    fn show_page_info(&mut self, count: u64, page: u32, page_count: u32) {
        let line = render::page_line(count, page, page_count);
        self.line(&line);
        self.flush();
    }

    fn render_filter_dropdown(&mut self, config: &FilterConfig) {
        let line = render::dropdown_line(config);
        self.line(&line);
    }

    fn render_server_list(&mut self, payload: &MonitorPayload) {
        for line in render::server_lines(payload) {
            self.line(&line);
        }
        self.flush();
    }
}
