//! Status poller: keeps the status line and the event log in sync with
//! `/rest/monitor`.
//!
//! One poll cycle builds a query from the current [`EventFilter`], issues a
//! single request and pushes the result (or a synthetic "Browser
//! Disconnected" status on failure) through the update path. The next
//! request is scheduled only once the previous one completed, so a slow
//! server can never accumulate pending requests.
//!
//! The update path is guarded twice against redundant work: the whole
//! payload is compared against the last [`Snapshot`], and the event list
//! is only re-rendered when its `(first, last, count)` window changed.
//!
//! [`EventFilter`]: palette_domain::filter::EventFilter

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use palette_domain::cookie::{Cookie, STATUS_COLOR_COOKIE, STATUS_TEXT_COOKIE};
use palette_domain::error::{ConsoleError, ValidationError};
use palette_domain::filter::WindowChange;
use palette_domain::payload::MonitorPayload;
use palette_domain::snapshot::Snapshot;
use palette_domain::status::{FALLBACK_COLOR, FALLBACK_TEXT, StatusColor, StatusDisplay};
use palette_domain::time::now;

use crate::ports::{CookieJar, MonitorClient, MonitorView, StatePublisher};
use crate::services::pagination::{CommandEffect, MonitorCommand, PaginationController};

/// Delay between the completion of a poll and the next one.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Capacity of the command channel between the handle and the poller task.
const COMMAND_CAPACITY: usize = 32;

/// Tunables of the status poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Delay between the end of one poll and the start of the next.
    pub interval: Duration,
    /// Events per page.
    pub page_size: u32,
    /// Lifetime of the status cookies; `None` for session cookies.
    pub cookie_expiry_days: Option<u32>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            page_size: palette_domain::filter::DEFAULT_PAGE_SIZE,
            cookie_expiry_days: None,
        }
    }
}

/// Single owner of the monitor state: event filter, snapshot and status.
pub struct StatusPoller<C, J, V, P> {
    client: C,
    jar: J,
    view: V,
    publisher: P,
    config: PollerConfig,
    pagination: PaginationController,
    snapshot: Snapshot,
    status: StatusDisplay,
    pagination_visible: Option<bool>,
}

impl<C, J, V, P> StatusPoller<C, J, V, P>
where
    C: MonitorClient,
    J: CookieJar,
    V: MonitorView,
    P: StatePublisher,
{
    /// Create a poller; nothing is requested until it is polled or run.
    pub fn new(client: C, jar: J, view: V, publisher: P, config: PollerConfig) -> Self {
        let pagination = PaginationController::new(config.page_size);
        Self {
            client,
            jar,
            view,
            publisher,
            config,
            pagination,
            snapshot: Snapshot::default(),
            status: StatusDisplay::default(),
            pagination_visible: None,
        }
    }

    #[must_use]
    pub fn pagination(&self) -> &PaginationController {
        &self.pagination
    }

    #[must_use]
    pub fn status(&self) -> &StatusDisplay {
        &self.status
    }

    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Whether the event list is requested at all.
    pub fn set_include_events(&mut self, include_events: bool) {
        self.pagination.set_include_events(include_events);
    }

    /// Paint the last known status from the cookies, before the first poll
    /// has answered.
    pub fn restore_status(&mut self) {
        let text = self.read_cookie(STATUS_TEXT_COOKIE);
        let color = self
            .read_cookie(STATUS_COLOR_COOKIE)
            .and_then(|name| name.parse::<StatusColor>().ok());

        if let Some(text) = &text {
            self.view.show_status_text(text);
        }
        if let Some(color) = color {
            self.view.show_status_color(color);
        }
        tracing::debug!(?text, ?color, "restored last known status");
        self.status = StatusDisplay::restored(text, color);
    }

    fn read_cookie(&self, name: &str) -> Option<String> {
        match self.jar.get(name) {
            Ok(cookie) => cookie.map(|c| c.value()),
            Err(err) => {
                tracing::warn!(%err, cookie = name, "failed to read status cookie");
                None
            }
        }
    }

    /// Apply a user command to the event filter.
    pub fn apply_command(&mut self, command: MonitorCommand) -> CommandEffect {
        self.pagination.apply(command)
    }

    /// Run one complete poll cycle (query, request, update).
    ///
    /// Returns `true` when the response changed the view.
    pub async fn poll_once(&mut self) -> bool {
        let query = self.pagination.next_query();
        tracing::debug!(%query, "polling monitor");
        let result = self.client.fetch_status(&query).await;
        self.complete(result, true).await
    }

    async fn complete(
        &mut self,
        result: Result<MonitorPayload, ConsoleError>,
        current: bool,
    ) -> bool {
        let payload = match result {
            Ok(payload) if current => payload,
            Ok(payload) => {
                tracing::debug!("response predates a page or filter change, ignoring its events");
                payload.without_event_view()
            }
            Err(err) => {
                tracing::warn!(%err, "monitor request failed, showing disconnected status");
                MonitorPayload::disconnected()
            }
        };
        self.update(payload, current).await
    }

    /// Push a payload through the update path.
    ///
    /// Identical payloads (by serialized form) are dropped before anything
    /// is broadcast or rendered. Returns `true` when the payload was accepted.
    pub async fn update(&mut self, payload: MonitorPayload, current: bool) -> bool {
        if !self.snapshot.accept(&payload) {
            tracing::trace!("monitor payload unchanged");
            return false;
        }

        if let Err(err) = self.publisher.publish(payload.clone()).await {
            tracing::warn!(%err, "failed to broadcast state change");
        }

        let text = payload.text.as_deref().unwrap_or(FALLBACK_TEXT);
        self.apply_status_text(text);

        let color = payload
            .color
            .as_deref()
            .unwrap_or_else(|| FALLBACK_COLOR.as_str());
        self.apply_status_color(color);

        if current {
            self.update_events(&payload);
        }

        self.view.render_server_list(&payload);
        true
    }

    fn apply_status_text(&mut self, text: &str) {
        if !self.status.apply_text(text) {
            return;
        }
        tracing::info!(status = text, "status text changed");
        self.view.show_status_text(text);
        self.persist(STATUS_TEXT_COOKIE, text);
    }

    fn apply_status_color(&mut self, name: &str) {
        let Some(color) = self.status.apply_color(name) else {
            return;
        };
        self.view.show_status_color(color);
        self.persist(STATUS_COLOR_COOKIE, color.as_str());
    }

    fn persist(&self, name: &str, value: &str) {
        let mut cookie = Cookie::new(name, value);
        if let Some(days) = self.config.cookie_expiry_days {
            cookie = cookie.expiring_in(now(), days);
        }
        if let Err(err) = self.jar.set(cookie) {
            tracing::warn!(%err, cookie = name, "failed to persist status cookie");
        }
    }

    fn update_events(&mut self, payload: &MonitorPayload) {
        let filter = self.pagination.filter_mut();

        if let Some(count) = payload.event_count {
            filter.apply_event_count(count);
        }

        if let Some(events) = &payload.events {
            match filter.apply_window(events) {
                WindowChange::Cleared => self.view.clear_event_list(),
                WindowChange::Unchanged => {}
                WindowChange::Replaced => self.view.render_event_list(payload),
            }
        }

        for config in payload.config.iter().flatten() {
            self.view.render_filter_dropdown(config);
        }

        if let Some(count) = payload.event_count {
            self.view
                .show_page_info(count, filter.page(), filter.page_count());
        }

        let visible = filter.current().count > 0 && filter.page_count() > 1;
        if self.pagination_visible != Some(visible) {
            if visible {
                self.view.show_pagination();
            } else {
                self.view.hide_pagination();
            }
            self.pagination_visible = Some(visible);
        }

        filter.freeze_paged_view();
    }
}

impl<C, J, V, P> StatusPoller<C, J, V, P>
where
    C: MonitorClient + Send + Sync + 'static,
    J: CookieJar + Send + Sync + 'static,
    V: MonitorView + Send + 'static,
    P: StatePublisher + Send + Sync + 'static,
{
    /// Poll until a [`MonitorCommand::Shutdown`] arrives or every
    /// [`MonitorHandle`] is dropped.
    ///
    /// Commands received while a request is in flight update the filter
    /// right away; the request itself is never cancelled, and the next one
    /// is issued as soon as it completes instead of after the interval.
    pub async fn run(mut self, mut commands: mpsc::Receiver<MonitorCommand>) {
        tracing::info!(
            interval_ms = u64::try_from(self.config.interval.as_millis()).unwrap_or(u64::MAX),
            include_events = self.pagination.include_events(),
            "status monitor started"
        );
        let mut stopping = false;

        loop {
            let query = self.pagination.next_query();
            let generation = self.pagination.generation();
            let mut reset = false;
            tracing::debug!(%query, "polling monitor");

            let result = {
                let mut fetch = std::pin::pin!(self.client.fetch_status(&query));
                loop {
                    tokio::select! {
                        result = &mut fetch => break result,
                        command = commands.recv(), if !stopping => match command {
                            Some(command) => match self.pagination.apply(command) {
                                CommandEffect::Reset => reset = true,
                                CommandEffect::Ignored => {}
                                CommandEffect::Shutdown => stopping = true,
                            },
                            None => stopping = true,
                        },
                    }
                }
            };

            let current = generation == self.pagination.generation();
            self.complete(result, current).await;

            if stopping {
                break;
            }
            if reset {
                continue;
            }

            let mut sleep = std::pin::pin!(tokio::time::sleep(self.config.interval));
            loop {
                tokio::select! {
                    () = &mut sleep => break,
                    command = commands.recv() => match command {
                        Some(command) => match self.pagination.apply(command) {
                            CommandEffect::Reset => break,
                            CommandEffect::Ignored => {}
                            CommandEffect::Shutdown => {
                                stopping = true;
                                break;
                            }
                        },
                        None => {
                            stopping = true;
                            break;
                        }
                    },
                }
            }

            if stopping {
                break;
            }
        }

        tracing::info!("status monitor stopped");
    }
}

/// Cloneable sender of user commands to a running monitor.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    sender: mpsc::Sender<MonitorCommand>,
}

impl MonitorHandle {
    async fn send(&self, command: MonitorCommand) -> Result<(), ConsoleError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| ConsoleError::MonitorStopped)
    }

    /// # Errors
    ///
    /// Returns [`ConsoleError::MonitorStopped`] if the monitor has exited.
    pub async fn next_page(&self) -> Result<(), ConsoleError> {
        self.send(MonitorCommand::NextPage).await
    }

    /// # Errors
    ///
    /// Returns [`ConsoleError::MonitorStopped`] if the monitor has exited.
    pub async fn previous_page(&self) -> Result<(), ConsoleError> {
        self.send(MonitorCommand::PreviousPage).await
    }

    /// # Errors
    ///
    /// Returns [`ConsoleError::MonitorStopped`] if the monitor has exited.
    pub async fn first_page(&self) -> Result<(), ConsoleError> {
        self.send(MonitorCommand::FirstPage).await
    }

    /// # Errors
    ///
    /// Returns [`ConsoleError::MonitorStopped`] if the monitor has exited.
    pub async fn last_page(&self) -> Result<(), ConsoleError> {
        self.send(MonitorCommand::LastPage).await
    }

    /// Jump to a 1-based page.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroPage`] for page 0, or
    /// [`ConsoleError::MonitorStopped`] if the monitor has exited.
    pub async fn go_to_page(&self, page: u32) -> Result<(), ConsoleError> {
        if page == 0 {
            return Err(ValidationError::ZeroPage.into());
        }
        self.send(MonitorCommand::GoToPage(page)).await
    }

    /// Select `value` in the dropdown `name` (`"0"` clears the filter).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyFilterName`] for an empty name, or
    /// [`ConsoleError::MonitorStopped`] if the monitor has exited.
    pub async fn select_filter(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ConsoleError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyFilterName.into());
        }
        self.send(MonitorCommand::SelectFilter {
            name,
            value: value.into(),
        })
        .await
    }

    /// # Errors
    ///
    /// Returns [`ConsoleError::MonitorStopped`] if the monitor has exited.
    pub async fn include_events(&self, include_events: bool) -> Result<(), ConsoleError> {
        self.send(MonitorCommand::IncludeEvents(include_events))
            .await
    }

    /// # Errors
    ///
    /// Returns [`ConsoleError::MonitorStopped`] if the monitor has exited.
    pub async fn refresh(&self) -> Result<(), ConsoleError> {
        self.send(MonitorCommand::Refresh).await
    }

    /// # Errors
    ///
    /// Returns [`ConsoleError::MonitorStopped`] if the monitor has exited.
    pub async fn shutdown(&self) -> Result<(), ConsoleError> {
        self.send(MonitorCommand::Shutdown).await
    }
}

/// Entry point owning the poller until it is started.
pub struct Monitor<C, J, V, P> {
    handle: MonitorHandle,
    pending: Option<(StatusPoller<C, J, V, P>, mpsc::Receiver<MonitorCommand>)>,
    task: Option<JoinHandle<()>>,
}

impl<C, J, V, P> Monitor<C, J, V, P>
where
    C: MonitorClient + Send + Sync + 'static,
    J: CookieJar + Send + Sync + 'static,
    V: MonitorView + Send + 'static,
    P: StatePublisher + Send + Sync + 'static,
{
    /// Wrap a poller; nothing runs until [`start_monitor`](Self::start_monitor).
    pub fn new(poller: StatusPoller<C, J, V, P>) -> Self {
        let (sender, receiver) = mpsc::channel(COMMAND_CAPACITY);
        Self {
            handle: MonitorHandle { sender },
            pending: Some((poller, receiver)),
            task: None,
        }
    }

    /// Start polling (idempotent).
    ///
    /// The first call restores the cookie status, spawns the poll task and
    /// issues the first poll. Later calls only switch the event list on or
    /// off and poll again immediately.
    pub async fn start_monitor(&mut self, include_events: bool) -> MonitorHandle {
        if let Some((mut poller, receiver)) = self.pending.take() {
            poller.set_include_events(include_events);
            poller.restore_status();
            self.task = Some(tokio::spawn(poller.run(receiver)));
        } else if let Err(err) = self.handle.include_events(include_events).await {
            tracing::warn!(%err, "status monitor already stopped");
        }
        self.handle.clone()
    }

    #[must_use]
    pub fn handle(&self) -> MonitorHandle {
        self.handle.clone()
    }

    /// Ask the poller to stop and wait for the in-flight poll to finish.
    pub async fn stop(mut self) {
        let _ = self.handle.shutdown().await;
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                tracing::warn!(%err, "status monitor task failed");
            }
        }
    }
}
