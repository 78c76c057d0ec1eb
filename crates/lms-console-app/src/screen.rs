// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::time::{Duration, Instant};

use crate::{
    CriterionKind, FetchController, FetchTicket, FilterSet, FilterUpdate, PageDirection,
    PageResult, Pager, Record, ScreenKind, page_in_bounds,
};

/// `Idle -> Loading -> {Ready, Error}`; `Ready`/`Error` go back to `Loading`
/// on the next fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    /// The previously shown value is kept out of view but can still be
    /// patched by a mutation that lands mid-fetch.
    Loading { previous: Option<T> },
    Ready(T),
    Error(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> LoadState<T> {
    pub fn visible(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn held(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Loading { previous } => previous.as_ref(),
            Self::Idle | Self::Error(_) => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn begin_loading(&mut self) {
        let previous = match std::mem::take(self) {
            Self::Ready(value) => Some(value),
            Self::Loading { previous } => previous,
            Self::Idle | Self::Error(_) => None,
        };
        *self = Self::Loading { previous };
    }

    /// Failures drop whatever was held; the error replaces the content.
    pub fn finish(&mut self, result: Result<T, String>) {
        *self = match result {
            Ok(value) => Self::Ready(value),
            Err(message) => Self::Error(message),
        };
    }

    fn replace_held(&mut self, value: T) {
        match self {
            Self::Ready(current) => *current = value,
            Self::Loading { previous } => *previous = Some(value),
            Self::Idle | Self::Error(_) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenCommand {
    Filter(FilterUpdate),
    Page(PageDirection),
    GoToPage(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    FiltersChanged(FilterSet),
    FetchScheduled { due_in: Duration },
    PageRequested(u32),
    PageRejected { requested: u32 },
    PageApplied { request_id: u64, records: usize },
    FetchFailed { request_id: u64, message: String },
    StaleResponseDropped { request_id: u64 },
    RecordPatched { id: String, is_active: bool },
    RecordNotOnPage { id: String },
}

/// Filter state, debounced fetching and the loaded page for one list screen.
/// All mutations go through the methods below.
#[derive(Debug, Clone)]
pub struct ListScreen<R> {
    kind: ScreenKind,
    page_size: u32,
    filters: FilterSet,
    fetch: FetchController<FilterSet>,
    state: LoadState<PageResult<R>>,
}

impl<R: Record> ListScreen<R> {
    pub fn new(
        kind: ScreenKind,
        criterion_kind: CriterionKind,
        page_size: u32,
        quiet_period: Duration,
    ) -> Self {
        Self {
            kind,
            page_size,
            filters: FilterSet::new(criterion_kind, page_size),
            fetch: FetchController::new(quiet_period),
            state: LoadState::Idle,
        }
    }

    pub fn kind(&self) -> ScreenKind {
        self.kind
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn state(&self) -> &LoadState<PageResult<R>> {
        &self.state
    }

    pub fn records(&self) -> &[R] {
        self.state
            .visible()
            .map(|page| page.records.as_slice())
            .unwrap_or_default()
    }

    pub fn pager(&self) -> Option<Pager> {
        self.state
            .visible()
            .and_then(|page| Pager::for_pagination(&page.pagination))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.fetch.next_deadline()
    }

    pub fn in_flight(&self) -> Option<u64> {
        self.fetch.in_flight()
    }

    /// Schedules the initial fetch for freshly mounted (default) filters.
    pub fn mount(&mut self, now: Instant) -> Vec<ScreenEvent> {
        self.fetch.schedule(self.filters.clone(), now);
        vec![ScreenEvent::FetchScheduled {
            due_in: self.fetch.quiet_period(),
        }]
    }

    pub fn dispatch(&mut self, command: ScreenCommand, now: Instant) -> Vec<ScreenEvent> {
        match command {
            ScreenCommand::Filter(update) => self.update_filters(update, now),
            ScreenCommand::Page(direction) => {
                let current = self.filters.page;
                let requested = match direction {
                    PageDirection::Previous => current.saturating_sub(1),
                    PageDirection::Next => current.saturating_add(1),
                };
                match self.pager().and_then(|pager| pager.target(direction)) {
                    Some(target) => self.change_page(target, now),
                    None => vec![ScreenEvent::PageRejected { requested }],
                }
            }
            ScreenCommand::GoToPage(requested) => {
                let total_pages = self.state.held().map(|page| page.pagination.total_pages);
                if !page_in_bounds(requested, total_pages) {
                    return vec![ScreenEvent::PageRejected { requested }];
                }
                self.change_page(requested, now)
            }
        }
    }

    pub fn poll_fetch(&mut self, now: Instant, has_token: bool) -> Option<FetchTicket<FilterSet>> {
        let ticket = self.fetch.poll(now, has_token)?;
        self.state.begin_loading();
        Some(ticket)
    }

    /// Fetches the current filters right away, bypassing the quiet period.
    pub fn fire_now(&mut self, has_token: bool) -> Option<FetchTicket<FilterSet>> {
        let ticket = self.fetch.fire_now(self.filters.clone(), has_token)?;
        self.state.begin_loading();
        Some(ticket)
    }

    pub fn complete(
        &mut self,
        request_id: u64,
        result: Result<PageResult<R>, String>,
    ) -> ScreenEvent {
        if !self.fetch.accept(request_id) {
            return ScreenEvent::StaleResponseDropped { request_id };
        }

        let event = match &result {
            Ok(page) => ScreenEvent::PageApplied {
                request_id,
                records: page.records.len(),
            },
            Err(message) => ScreenEvent::FetchFailed {
                request_id,
                message: message.clone(),
            },
        };
        self.state.finish(result);
        event
    }

    /// Merges a server-confirmed status into the held page by identity.
    pub fn apply_toggle(&mut self, id: &R::Id, is_active: bool) -> ScreenEvent {
        let patched = self
            .state
            .held()
            .and_then(|page| page.with_record_active(id, is_active));
        match patched {
            Some(page) => {
                self.state.replace_held(page);
                ScreenEvent::RecordPatched {
                    id: id.to_string(),
                    is_active,
                }
            }
            None => ScreenEvent::RecordNotOnPage { id: id.to_string() },
        }
    }

    /// Drops pending and in-flight work and forgets filters and data, as when
    /// the screen is navigated away from.
    pub fn teardown(&mut self) {
        self.fetch.cancel();
        self.filters = FilterSet::new(self.filters.criterion_kind, self.page_size);
        self.state = LoadState::Idle;
    }

    /// Stops fetching once the session is gone. A request already in flight
    /// still lands; otherwise the screen shows `message` unless it already
    /// holds an error.
    pub fn expire_session(&mut self, message: &str) {
        self.fetch.drop_pending();
        if self.fetch.in_flight().is_none() && self.state.error().is_none() {
            self.state.finish(Err(message.to_owned()));
        }
    }

    fn update_filters(&mut self, update: FilterUpdate, now: Instant) -> Vec<ScreenEvent> {
        if !self.filters.apply(update) {
            return Vec::new();
        }
        self.fetch.schedule(self.filters.clone(), now);
        vec![
            ScreenEvent::FiltersChanged(self.filters.clone()),
            ScreenEvent::FetchScheduled {
                due_in: self.fetch.quiet_period(),
            },
        ]
    }

    fn change_page(&mut self, page: u32, now: Instant) -> Vec<ScreenEvent> {
        let mut events = vec![ScreenEvent::PageRequested(page)];
        events.extend(self.update_filters(FilterUpdate::Page(page), now));
        events
    }
}
