//! Pagination and filter controller.
//!
//! Translates user navigation (next/previous/first/last page, filter
//! dropdown changes) into [`EventFilter`] mutations and tells the poller
//! whether the pending poll must be replaced by an immediate one.

use std::collections::BTreeMap;

use palette_domain::filter::{EventFilter, MonitorQuery};

/// A user request delivered to the running status monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorCommand {
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    GoToPage(u32),
    /// A filter dropdown changed to the option identified by `value`.
    SelectFilter {
        name: String,
        value: String,
    },
    /// Turn the event list on or off (status-only polling).
    IncludeEvents(bool),
    /// Poll right now without changing the view.
    Refresh,
    Shutdown,
}

/// What the poller must do after a command was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandEffect {
    /// Drop the pending timer and poll immediately.
    Reset,
    /// Nothing changed (e.g. "next" on the last page).
    Ignored,
    /// Stop polling.
    Shutdown,
}

/// Owns the event filter and the dropdown selections of the view.
#[derive(Debug, Clone)]
pub struct PaginationController {
    filter: EventFilter,
    dropdowns: BTreeMap<String, String>,
    include_events: bool,
    generation: u64,
}

impl PaginationController {
    /// Controller for a list of `page_size` events per page.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            filter: EventFilter::new(page_size),
            dropdowns: BTreeMap::new(),
            include_events: true,
            generation: 0,
        }
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut EventFilter {
        &mut self.filter
    }

    #[must_use]
    pub fn include_events(&self) -> bool {
        self.include_events
    }

    pub fn set_include_events(&mut self, include_events: bool) {
        self.include_events = include_events;
    }

    /// Counter bumped on every page or filter change.
    ///
    /// A response to a request built under an older generation no longer
    /// matches what the user is looking at.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Query of the next monitor request (advances the sequence number).
    pub fn next_query(&mut self) -> MonitorQuery {
        self.filter.build_query(self.include_events, &self.dropdowns)
    }

    /// Apply a user command.
    pub fn apply(&mut self, command: MonitorCommand) -> CommandEffect {
        match command {
            MonitorCommand::NextPage => {
                if self.filter.page() < self.filter.page_count() {
                    self.navigate(self.filter.page() + 1)
                } else {
                    CommandEffect::Ignored
                }
            }
            MonitorCommand::PreviousPage => {
                if self.filter.page() > 1 {
                    self.navigate(self.filter.page() - 1)
                } else {
                    CommandEffect::Ignored
                }
            }
            MonitorCommand::FirstPage => self.navigate(1),
            MonitorCommand::LastPage => self.navigate(self.filter.page_count()),
            MonitorCommand::GoToPage(page) => self.navigate(page),
            MonitorCommand::SelectFilter { name, value } => {
                if name.is_empty() {
                    return CommandEffect::Ignored;
                }
                tracing::debug!(%name, %value, "event filter changed");
                self.dropdowns.insert(name, value);
                self.filter.reset_to_first_page();
                self.generation += 1;
                CommandEffect::Reset
            }
            MonitorCommand::IncludeEvents(include_events) => {
                self.include_events = include_events;
                self.generation += 1;
                self.filter.reset_seq();
                CommandEffect::Reset
            }
            MonitorCommand::Refresh => {
                self.filter.reset_seq();
                CommandEffect::Reset
            }
            MonitorCommand::Shutdown => CommandEffect::Shutdown,
        }
    }

    fn navigate(&mut self, page: u32) -> CommandEffect {
        tracing::debug!(from = self.filter.page(), to = page, "event page changed");
        self.filter.set_page(page);
        self.filter.reset_seq();
        self.generation += 1;
        CommandEffect::Reset
    }
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new(palette_domain::filter::DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_count(count: u64) -> PaginationController {
        let mut controller = PaginationController::default();
        controller.filter_mut().apply_event_count(count);
        controller
    }

    #[test]
    fn should_move_to_next_page_within_bounds() {
        let mut controller = with_count(60);
        assert_eq!(controller.apply(MonitorCommand::NextPage), CommandEffect::Reset);
        assert_eq!(controller.filter().page(), 2);
    }

    #[test]
    fn should_ignore_next_page_on_last_page() {
        let mut controller = with_count(25);
        assert_eq!(
            controller.apply(MonitorCommand::NextPage),
            CommandEffect::Ignored
        );
        assert_eq!(controller.filter().page(), 1);
    }

    #[test]
    fn should_ignore_previous_page_on_first_page() {
        let mut controller = with_count(100);
        assert_eq!(
            controller.apply(MonitorCommand::PreviousPage),
            CommandEffect::Ignored
        );
        assert_eq!(controller.generation(), 0);
    }

    #[test]
    fn should_jump_to_last_page() {
        let mut controller = with_count(101);
        controller.apply(MonitorCommand::LastPage);
        assert_eq!(controller.filter().page(), 5);
    }

    #[test]
    fn should_stay_on_first_page_when_last_page_of_empty_log() {
        let mut controller = with_count(0);
        controller.apply(MonitorCommand::LastPage);
        assert_eq!(controller.filter().page(), 1);
    }

    #[test]
    fn should_resume_live_update_on_navigation() {
        let mut controller = with_count(100);
        controller.apply(MonitorCommand::GoToPage(3));
        controller.filter_mut().freeze_paged_view();
        assert!(!controller.filter().live_update());

        controller.apply(MonitorCommand::FirstPage);
        assert!(controller.filter().live_update());
        assert_eq!(controller.filter().page(), 1);
    }

    #[test]
    fn should_reset_seq_on_navigation() {
        let mut controller = with_count(100);
        controller.next_query();
        controller.next_query();
        controller.apply(MonitorCommand::NextPage);
        assert_eq!(controller.next_query().get("seq"), Some("0"));
    }

    #[test]
    fn should_return_to_first_page_on_filter_change() {
        let mut controller = with_count(100);
        controller.apply(MonitorCommand::GoToPage(4));
        controller.next_query();

        let effect = controller.apply(MonitorCommand::SelectFilter {
            name: "status".to_string(),
            value: "3".to_string(),
        });
        assert_eq!(effect, CommandEffect::Reset);
        assert_eq!(controller.filter().page(), 1);

        let query = controller.next_query();
        assert_eq!(query.to_string(), "seq=0&status=3&limit=25&ref=null");
    }

    #[test]
    fn should_ignore_filter_without_name() {
        let mut controller = PaginationController::default();
        let effect = controller.apply(MonitorCommand::SelectFilter {
            name: String::new(),
            value: "1".to_string(),
        });
        assert_eq!(effect, CommandEffect::Ignored);
    }

    #[test]
    fn should_switch_to_status_only_queries() {
        let mut controller = PaginationController::default();
        controller.apply(MonitorCommand::IncludeEvents(false));
        assert_eq!(controller.next_query().to_string(), "seq=0&event=false");
    }

    #[test]
    fn should_bump_generation_on_navigation_but_not_on_refresh() {
        let mut controller = with_count(100);
        controller.apply(MonitorCommand::NextPage);
        assert_eq!(controller.generation(), 1);
        assert_eq!(controller.apply(MonitorCommand::Refresh), CommandEffect::Reset);
        assert_eq!(controller.generation(), 1);
    }
}
