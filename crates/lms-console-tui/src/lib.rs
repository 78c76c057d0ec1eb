// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod render;

use anyhow::{Context, Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use lms_console_app::{
    AdminFormField, AppCommand, AppEvent, AppMode, AppState, Course, CourseId, CreateAdminPayload,
    CriterionKind, DEFAULT_PAGE_SIZE, DEFAULT_QUIET_PERIOD, DashboardStats, FetchController,
    FilterField, FilterSet, FilterUpdate, ListScreen, LoadState, PageDirection, PageResult,
    ScreenCommand, ScreenEvent, ScreenKind, User, UserId, UserRole,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const DEFAULT_WIDE_MIN_WIDTH: u16 = 100;

const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const SESSION_EXPIRED: &str = "Session expired";
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub page_size: u32,
    pub quiet_period: Duration,
    /// Terminals at least this wide get tables; narrower ones get cards.
    pub wide_min_width: u16,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            quiet_period: DEFAULT_QUIET_PERIOD,
            wide_min_width: DEFAULT_WIDE_MIN_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Dashboard { request_id: u64 },
    Users { request_id: u64, filters: FilterSet },
    Courses { request_id: u64, filters: FilterSet },
}

impl FetchRequest {
    pub fn request_id(&self) -> u64 {
        match self {
            Self::Dashboard { request_id }
            | Self::Users { request_id, .. }
            | Self::Courses { request_id, .. } => *request_id,
        }
    }

    pub fn screen(&self) -> ScreenKind {
        match self {
            Self::Dashboard { .. } => ScreenKind::Dashboard,
            Self::Users { .. } => ScreenKind::Users,
            Self::Courses { .. } => ScreenKind::Courses,
        }
    }

    pub fn failed(self, message: String) -> FetchOutcome {
        match self {
            Self::Dashboard { request_id } => FetchOutcome::Dashboard {
                request_id,
                result: Err(message),
            },
            Self::Users { request_id, .. } => FetchOutcome::Users {
                request_id,
                result: Err(message),
            },
            Self::Courses { request_id, .. } => FetchOutcome::Courses {
                request_id,
                result: Err(message),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Dashboard {
        request_id: u64,
        result: Result<DashboardStats, String>,
    },
    Users {
        request_id: u64,
        result: Result<PageResult<User>, String>,
    },
    Courses {
        request_id: u64,
        result: Result<PageResult<Course>, String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    Fetched(FetchOutcome),
    /// The server rejected the session token.
    SessionExpired,
}

pub trait AppRuntime {
    fn has_token(&self) -> bool;
    fn load_dashboard(&mut self) -> Result<DashboardStats>;
    fn load_users(&mut self, filters: &FilterSet) -> Result<PageResult<User>>;
    fn load_courses(&mut self, filters: &FilterSet) -> Result<PageResult<Course>>;
    fn toggle_user_status(&mut self, id: &UserId) -> Result<bool>;
    fn toggle_course_status(&mut self, id: &CourseId) -> Result<bool>;
    fn create_admin(&mut self, payload: &CreateAdminPayload) -> Result<User>;
    fn logout(&mut self) -> Result<()>;

    fn run_fetch(&mut self, request: FetchRequest) -> FetchOutcome {
        match request {
            FetchRequest::Dashboard { request_id } => FetchOutcome::Dashboard {
                request_id,
                result: self.load_dashboard().map_err(|error| format!("{error:#}")),
            },
            FetchRequest::Users {
                request_id,
                filters,
            } => FetchOutcome::Users {
                request_id,
                result: self
                    .load_users(&filters)
                    .map_err(|error| format!("{error:#}")),
            },
            FetchRequest::Courses {
                request_id,
                filters,
            } => FetchOutcome::Courses {
                request_id,
                result: self
                    .load_courses(&filters)
                    .map_err(|error| format!("{error:#}")),
            },
        }
    }

    /// Runs the fetch and reports back over `tx`. The default runs inline;
    /// network-backed runtimes move the call off the UI thread.
    fn spawn_fetch(&mut self, request: FetchRequest, tx: Sender<InternalEvent>) -> Result<()> {
        let outcome = self.run_fetch(request);
        tx.send(InternalEvent::Fetched(outcome))
            .map_err(|_| anyhow!("fetch event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct AdminFormUiState {
    payload: CreateAdminPayload,
    field: usize,
    error: Option<String>,
}

impl AdminFormUiState {
    fn current_field(&self) -> AdminFormField {
        AdminFormField::ALL[self.field % AdminFormField::ALL.len()]
    }

    fn move_field(&mut self, delta: isize) {
        let len = AdminFormField::ALL.len() as isize;
        self.field = (self.field as isize + delta).rem_euclid(len) as usize;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingToggle {
    User { id: UserId, name: String },
    Course { id: CourseId, title: String },
}

impl PendingToggle {
    fn subject(&self) -> &'static str {
        match self {
            Self::User { .. } => "user",
            Self::Course { .. } => "course",
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::User { name, .. } => name,
            Self::Course { title, .. } => title,
        }
    }

    fn prompt(&self) -> String {
        format!(
            "Are you sure you want to change this {}'s status?",
            self.subject()
        )
    }
}

#[derive(Debug, Clone)]
struct ViewData {
    options: UiOptions,
    dashboard: LoadState<DashboardStats>,
    dashboard_fetch: FetchController<()>,
    users: ListScreen<User>,
    courses: ListScreen<Course>,
    user_cursor: usize,
    course_cursor: usize,
    filter_input: String,
    admin_form: AdminFormUiState,
    pending_toggle: Option<PendingToggle>,
    status_token: u64,
}

impl ViewData {
    fn new(options: UiOptions) -> Self {
        Self {
            options,
            dashboard: LoadState::Idle,
            dashboard_fetch: FetchController::new(options.quiet_period),
            users: ListScreen::new(
                ScreenKind::Users,
                CriterionKind::Role,
                options.page_size,
                options.quiet_period,
            ),
            courses: ListScreen::new(
                ScreenKind::Courses,
                CriterionKind::Category,
                options.page_size,
                options.quiet_period,
            ),
            user_cursor: 0,
            course_cursor: 0,
            filter_input: String::new(),
            admin_form: AdminFormUiState::default(),
            pending_toggle: None,
            status_token: 0,
        }
    }

    fn filters(&self, screen: ScreenKind) -> Option<&FilterSet> {
        match screen {
            ScreenKind::Dashboard => None,
            ScreenKind::Users => Some(self.users.filters()),
            ScreenKind::Courses => Some(self.courses.filters()),
        }
    }
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: UiOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(options);
    let (internal_tx, internal_rx) = mpsc::channel();

    mount_screen(
        state.active_screen,
        runtime,
        &mut view_data,
        &internal_tx,
        Instant::now(),
    );
    if !runtime.has_token() {
        emit_status(
            state,
            &mut view_data,
            &internal_tx,
            "no session token; set [auth].token or pass --token",
        );
    }

    let result = event_loop(
        &mut terminal,
        state,
        runtime,
        &mut view_data,
        &internal_tx,
        &internal_rx,
    );

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn event_loop<R: AppRuntime>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    internal_rx: &Receiver<InternalEvent>,
) -> Result<()> {
    loop {
        process_internal_events(state, runtime, view_data, internal_tx, internal_rx);
        launch_due_fetches(state, runtime, view_data, internal_tx, Instant::now());

        terminal
            .draw(|frame| render::render(frame, state, view_data))
            .context("draw frame")?;

        if !event::poll(EVENT_POLL_INTERVAL).context("poll event")? {
            continue;
        }
        if let Event::Key(key) = event::read().context("read event")?
            && handle_key_event(
                state,
                runtime,
                view_data,
                internal_tx,
                key,
                Instant::now(),
            )
        {
            return Ok(());
        }
    }
}

fn process_internal_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Fetched(outcome) => apply_fetch_outcome(view_data, outcome),
            InternalEvent::SessionExpired => expire_session(state, runtime, view_data, tx),
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn mount_screen<R: AppRuntime>(
    screen: ScreenKind,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    now: Instant,
) {
    let events = match screen {
        ScreenKind::Dashboard => {
            start_dashboard_fetch(runtime, view_data, tx);
            return;
        }
        ScreenKind::Users => view_data.users.mount(now),
        ScreenKind::Courses => view_data.courses.mount(now),
    };
    for event in &events {
        log_screen_event(screen, event);
    }
}

fn teardown_screen(screen: ScreenKind, view_data: &mut ViewData) {
    match screen {
        ScreenKind::Dashboard => {
            view_data.dashboard_fetch.cancel();
            view_data.dashboard = LoadState::Idle;
        }
        ScreenKind::Users => {
            view_data.users.teardown();
            view_data.user_cursor = 0;
        }
        ScreenKind::Courses => {
            view_data.courses.teardown();
            view_data.course_cursor = 0;
        }
    }
    view_data.pending_toggle = None;
    view_data.filter_input.clear();
}

fn start_dashboard_fetch<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    let Some(ticket) = view_data.dashboard_fetch.fire_now((), runtime.has_token()) else {
        debug!("dashboard fetch skipped without a session token");
        return;
    };
    view_data.dashboard.begin_loading();
    spawn_fetch(
        runtime,
        view_data,
        tx,
        FetchRequest::Dashboard {
            request_id: ticket.request_id,
        },
    );
}

fn launch_due_fetches<R: AppRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    now: Instant,
) {
    let has_token = runtime.has_token();
    let request = match state.active_screen {
        ScreenKind::Dashboard => None,
        ScreenKind::Users => {
            view_data
                .users
                .poll_fetch(now, has_token)
                .map(|ticket| FetchRequest::Users {
                    request_id: ticket.request_id,
                    filters: ticket.query,
                })
        }
        ScreenKind::Courses => {
            view_data
                .courses
                .poll_fetch(now, has_token)
                .map(|ticket| FetchRequest::Courses {
                    request_id: ticket.request_id,
                    filters: ticket.query,
                })
        }
    };
    if let Some(request) = request {
        spawn_fetch(runtime, view_data, tx, request);
    }
}

fn spawn_fetch<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    request: FetchRequest,
) {
    let screen = request.screen();
    debug!(
        screen = screen.label(),
        request_id = request.request_id(),
        "fetch started"
    );
    if let Err(error) = runtime.spawn_fetch(request.clone(), tx.clone()) {
        warn!(screen = screen.label(), %error, "fetch could not start");
        apply_fetch_outcome(view_data, request.failed(format!("{error:#}")));
    }
}

fn apply_fetch_outcome(view_data: &mut ViewData, outcome: FetchOutcome) {
    match outcome {
        FetchOutcome::Dashboard { request_id, result } => {
            if !view_data.dashboard_fetch.accept(request_id) {
                debug!(request_id, "stale dashboard response dropped");
                return;
            }
            match &result {
                Ok(_) => info!(request_id, "dashboard loaded"),
                Err(message) => warn!(request_id, %message, "dashboard fetch failed"),
            }
            view_data.dashboard.finish(result);
        }
        FetchOutcome::Users { request_id, result } => {
            let event = view_data.users.complete(request_id, result);
            log_screen_event(ScreenKind::Users, &event);
            view_data.user_cursor =
                clamp_cursor(view_data.user_cursor, view_data.users.records().len());
        }
        FetchOutcome::Courses { request_id, result } => {
            let event = view_data.courses.complete(request_id, result);
            log_screen_event(ScreenKind::Courses, &event);
            view_data.course_cursor =
                clamp_cursor(view_data.course_cursor, view_data.courses.records().len());
        }
    }
}

fn log_screen_event(screen: ScreenKind, event: &ScreenEvent) {
    let screen = screen.label();
    match event {
        ScreenEvent::PageApplied {
            request_id,
            records,
        } => info!(screen, request_id, records, "page applied"),
        ScreenEvent::FetchFailed {
            request_id,
            message,
        } => warn!(screen, request_id, %message, "page fetch failed"),
        ScreenEvent::StaleResponseDropped { request_id } => {
            debug!(screen, request_id, "stale page response dropped")
        }
        ScreenEvent::FetchScheduled { due_in } => {
            debug!(screen, due_in_ms = due_in.as_millis() as u64, "fetch scheduled")
        }
        ScreenEvent::RecordPatched { id, is_active } => {
            info!(screen, %id, is_active, "record status patched")
        }
        ScreenEvent::RecordNotOnPage { id } => {
            debug!(screen, %id, "toggled record is no longer on the page")
        }
        ScreenEvent::PageRejected { requested } => {
            debug!(screen, requested, "page request out of range")
        }
        ScreenEvent::FiltersChanged(_) | ScreenEvent::PageRequested(_) => {
            debug!(screen, ?event, "filters updated")
        }
    }
}

fn clamp_cursor(cursor: usize, len: usize) -> usize {
    cursor.min(len.saturating_sub(1))
}

fn end_session<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    message: &str,
    now: Instant,
) {
    if let Err(error) = runtime.logout() {
        warn!(%error, "logout failed");
    }
    info!("session ended");
    let screen = state.active_screen;
    teardown_screen(screen, view_data);
    mount_screen(screen, runtime, view_data, tx, now);
    state.dispatch(AppCommand::ExitToNav);
    emit_status(state, view_data, tx, message);
}

/// The server rejected the token mid-fetch. Unlike a logout the active screen
/// keeps its error; only further fetching stops.
fn expire_session<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    if let Err(error) = runtime.logout() {
        warn!(%error, "logout failed");
    }
    info!(screen = state.active_screen.label(), "session expired");
    match state.active_screen {
        ScreenKind::Dashboard => {
            if view_data.dashboard_fetch.in_flight().is_none()
                && view_data.dashboard.error().is_none()
            {
                view_data.dashboard.finish(Err(SESSION_EXPIRED.to_owned()));
            }
        }
        ScreenKind::Users => view_data.users.expire_session(SESSION_EXPIRED),
        ScreenKind::Courses => view_data.courses.expire_session(SESSION_EXPIRED),
    }
    view_data.pending_toggle = None;
    state.dispatch(AppCommand::ExitToNav);
    emit_status(
        state,
        view_data,
        tx,
        "session expired; sign in again with --token or [auth].token",
    );
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
    now: Instant,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match state.mode {
        AppMode::Alert => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                state.dispatch(AppCommand::DismissAlert);
            }
            false
        }
        AppMode::Confirm => {
            handle_confirm_key(state, runtime, view_data, internal_tx, key);
            false
        }
        AppMode::AdminForm => {
            handle_admin_form_key(state, runtime, view_data, internal_tx, key);
            false
        }
        AppMode::Filter(field) => {
            handle_filter_key(state, view_data, internal_tx, field, key, now);
            false
        }
        AppMode::Nav => handle_nav_key(state, runtime, view_data, internal_tx, key, now),
    }
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
    now: Instant,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Tab => switch_screen(state, runtime, view_data, tx, AppCommand::NextScreen, now),
        KeyCode::BackTab => {
            switch_screen(state, runtime, view_data, tx, AppCommand::PrevScreen, now)
        }
        KeyCode::Char(digit @ '1'..='3') => {
            let index = digit as usize - '1' as usize;
            let command = AppCommand::SelectScreen(ScreenKind::ALL[index]);
            switch_screen(state, runtime, view_data, tx, command, now);
        }
        KeyCode::Char('j') | KeyCode::Down => move_cursor(state, view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(state, view_data, -1),
        KeyCode::Char('h') | KeyCode::Left => dispatch_list(
            state,
            view_data,
            tx,
            ScreenCommand::Page(PageDirection::Previous),
            now,
        ),
        KeyCode::Char('l') | KeyCode::Right => dispatch_list(
            state,
            view_data,
            tx,
            ScreenCommand::Page(PageDirection::Next),
            now,
        ),
        KeyCode::Char('/') => begin_filter_edit(state, view_data, tx, FilterField::Search),
        KeyCode::Char('c') if state.active_screen == ScreenKind::Courses => {
            begin_filter_edit(state, view_data, tx, FilterField::Criterion)
        }
        KeyCode::Char('r') if state.active_screen == ScreenKind::Users => {
            let next = next_role_filter(&view_data.users.filters().criterion);
            dispatch_list(
                state,
                view_data,
                tx,
                ScreenCommand::Filter(FilterUpdate::Criterion(next)),
                now,
            );
        }
        KeyCode::Char('s') => {
            if let Some(filters) = view_data.filters(state.active_screen) {
                let next = filters.status.next();
                dispatch_list(
                    state,
                    view_data,
                    tx,
                    ScreenCommand::Filter(FilterUpdate::Status(next)),
                    now,
                );
            }
        }
        KeyCode::Char('t') | KeyCode::Enter => open_toggle_prompt(state, view_data, tx),
        KeyCode::Char('a') => open_admin_form(state, view_data, tx),
        KeyCode::Char('R') => refetch(state, runtime, view_data, tx),
        KeyCode::Char('L') => end_session(state, runtime, view_data, tx, "logged out", now),
        _ => {}
    }
    false
}

fn switch_screen<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    command: AppCommand,
    now: Instant,
) {
    for event in state.dispatch(command) {
        if let AppEvent::ScreenChanged { from, to } = event {
            info!(from = from.label(), to = to.label(), "screen changed");
            teardown_screen(from, view_data);
            mount_screen(to, runtime, view_data, tx, now);
        }
    }
}

fn dispatch_list(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    command: ScreenCommand,
    now: Instant,
) {
    let screen = state.active_screen;
    let events = match screen {
        ScreenKind::Dashboard => return,
        ScreenKind::Users => view_data.users.dispatch(command, now),
        ScreenKind::Courses => view_data.courses.dispatch(command, now),
    };
    for event in &events {
        log_screen_event(screen, event);
        match event {
            ScreenEvent::PageRejected { requested } => {
                emit_status(state, view_data, tx, format!("no page {requested}"));
            }
            ScreenEvent::FiltersChanged(_) => match screen {
                ScreenKind::Users => view_data.user_cursor = 0,
                ScreenKind::Courses => view_data.course_cursor = 0,
                ScreenKind::Dashboard => {}
            },
            _ => {}
        }
    }
}

fn next_role_filter(current: &str) -> String {
    let mut options = vec![""];
    options.extend(UserRole::FILTERABLE.iter().map(|role| role.as_str()));
    let index = options
        .iter()
        .position(|option| *option == current)
        .map_or(0, |index| (index + 1) % options.len());
    options[index].to_owned()
}

fn move_cursor(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let (cursor, len) = match state.active_screen {
        ScreenKind::Dashboard => return,
        ScreenKind::Users => (&mut view_data.user_cursor, view_data.users.records().len()),
        ScreenKind::Courses => (
            &mut view_data.course_cursor,
            view_data.courses.records().len(),
        ),
    };
    if len == 0 {
        *cursor = 0;
        return;
    }
    *cursor = (*cursor as isize + delta).clamp(0, len as isize - 1) as usize;
}

fn begin_filter_edit(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    field: FilterField,
) {
    let text = view_data
        .filters(state.active_screen)
        .map(|filters| filters.text(field));
    let Some(text) = text else {
        emit_status(state, view_data, tx, "filters apply to users and courses");
        return;
    };
    view_data.filter_input = text;
    state.dispatch(AppCommand::EditFilter(field));
}

fn handle_filter_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    field: FilterField,
    key: KeyEvent,
    now: Instant,
) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            state.dispatch(AppCommand::ExitToNav);
            return;
        }
        KeyCode::Backspace => {
            if view_data.filter_input.pop().is_none() {
                return;
            }
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.filter_input.push(ch);
        }
        _ => return,
    }

    let value = view_data.filter_input.clone();
    let update = match field {
        FilterField::Search => FilterUpdate::Search(value),
        FilterField::Criterion => FilterUpdate::Criterion(value),
        FilterField::Status => return,
    };
    dispatch_list(state, view_data, tx, ScreenCommand::Filter(update), now);
}

fn open_toggle_prompt(state: &mut AppState, view_data: &mut ViewData, tx: &Sender<InternalEvent>) {
    let pending = match state.active_screen {
        ScreenKind::Dashboard => None,
        ScreenKind::Users => view_data
            .users
            .records()
            .get(view_data.user_cursor)
            .map(|user| PendingToggle::User {
                id: user.id.clone(),
                name: user.name.clone(),
            }),
        ScreenKind::Courses => view_data
            .courses
            .records()
            .get(view_data.course_cursor)
            .map(|course| PendingToggle::Course {
                id: course.id.clone(),
                title: course.title.clone(),
            }),
    };
    let Some(pending) = pending else {
        emit_status(state, view_data, tx, "no row selected");
        return;
    };
    view_data.pending_toggle = Some(pending);
    state.dispatch(AppCommand::AskConfirm);
}

fn handle_confirm_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            confirm_toggle(state, runtime, view_data, tx);
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_data.pending_toggle = None;
            state.dispatch(AppCommand::ExitToNav);
            emit_status(state, view_data, tx, "status unchanged");
        }
        _ => {}
    }
}

fn confirm_toggle<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    state.dispatch(AppCommand::ExitToNav);
    let Some(pending) = view_data.pending_toggle.take() else {
        return;
    };
    if !runtime.has_token() {
        debug!("status toggle skipped without a session token");
        return;
    }

    let outcome = match &pending {
        PendingToggle::User { id, .. } => runtime
            .toggle_user_status(id)
            .map(|is_active| (is_active, view_data.users.apply_toggle(id, is_active))),
        PendingToggle::Course { id, .. } => runtime
            .toggle_course_status(id)
            .map(|is_active| (is_active, view_data.courses.apply_toggle(id, is_active))),
    };

    match outcome {
        Ok((is_active, event)) => {
            let screen = match pending {
                PendingToggle::User { .. } => ScreenKind::Users,
                PendingToggle::Course { .. } => ScreenKind::Courses,
            };
            log_screen_event(screen, &event);
            let verb = if is_active { "activated" } else { "deactivated" };
            emit_status(
                state,
                view_data,
                tx,
                format!("{} {verb}: {}", pending.subject(), pending.name()),
            );
        }
        Err(error) => {
            warn!(subject = pending.subject(), %error, "status toggle failed");
            state.dispatch(AppCommand::ShowAlert(format!("{error:#}")));
        }
    }
}

fn open_admin_form(state: &mut AppState, view_data: &mut ViewData, tx: &Sender<InternalEvent>) {
    if state.active_screen != ScreenKind::Users {
        emit_status(state, view_data, tx, "admins are created from the users screen");
        return;
    }
    view_data.admin_form = AdminFormUiState::default();
    state.dispatch(AppCommand::OpenAdminForm);
}

fn handle_admin_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            view_data.admin_form = AdminFormUiState::default();
            state.dispatch(AppCommand::ExitToNav);
            emit_status(state, view_data, tx, "admin creation canceled");
        }
        KeyCode::Tab | KeyCode::Down => view_data.admin_form.move_field(1),
        KeyCode::BackTab | KeyCode::Up => view_data.admin_form.move_field(-1),
        KeyCode::Backspace => {
            let field = view_data.admin_form.current_field();
            view_data.admin_form.payload.field_mut(field).pop();
        }
        KeyCode::Enter => submit_admin_form(state, runtime, view_data, tx),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let field = view_data.admin_form.current_field();
            view_data.admin_form.payload.field_mut(field).push(ch);
        }
        _ => {}
    }
}

fn submit_admin_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    let payload = view_data.admin_form.payload.clone();
    if let Err(error) = payload.validate() {
        view_data.admin_form.error = Some(error.to_string());
        return;
    }
    if !runtime.has_token() {
        state.dispatch(AppCommand::ShowAlert(
            "No authentication token found".to_owned(),
        ));
        return;
    }

    match runtime.create_admin(&payload) {
        Ok(admin) => {
            info!(admin_id = %admin.id, "admin created");
            view_data.admin_form = AdminFormUiState::default();
            state.dispatch(AppCommand::ExitToNav);
            state.dispatch(AppCommand::ShowAlert(
                "Admin created successfully!".to_owned(),
            ));
            let has_token = runtime.has_token();
            if let Some(ticket) = view_data.users.fire_now(has_token) {
                let request = FetchRequest::Users {
                    request_id: ticket.request_id,
                    filters: ticket.query,
                };
                spawn_fetch(runtime, view_data, tx, request);
            }
        }
        Err(error) => {
            warn!(%error, "admin creation failed");
            let message = format!("{error:#}");
            view_data.admin_form.error = Some(message.clone());
            state.dispatch(AppCommand::ShowAlert(format!(
                "Failed to create admin: {message}"
            )));
        }
    }
}

fn refetch<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    if !runtime.has_token() {
        emit_status(state, view_data, tx, "no session token; nothing to reload");
        return;
    }
    let request = match state.active_screen {
        ScreenKind::Dashboard => {
            start_dashboard_fetch(runtime, view_data, tx);
            None
        }
        ScreenKind::Users => view_data
            .users
            .fire_now(true)
            .map(|ticket| FetchRequest::Users {
                request_id: ticket.request_id,
                filters: ticket.query,
            }),
        ScreenKind::Courses => {
            view_data
                .courses
                .fire_now(true)
                .map(|ticket| FetchRequest::Courses {
                    request_id: ticket.request_id,
                    filters: ticket.query,
                })
        }
    };
    if let Some(request) = request {
        spawn_fetch(runtime, view_data, tx, request);
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, FetchOutcome, FetchRequest, InternalEvent, UiOptions, ViewData,
        handle_key_event, launch_due_fetches, mount_screen, next_role_filter,
        process_internal_events,
    };
    use anyhow::{Result, anyhow};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use lms_console_app::{
        ActiveFilter, AppMode, AppState, Course, CourseId, CreateAdminPayload, DashboardStats,
        FilterSet, LoadState, PageResult, ScreenKind, User, UserId,
    };
    use lms_console_testkit::{Catalog, sample_course};
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::time::{Duration, Instant};

    const QUIET: Duration = Duration::from_millis(500);

    #[derive(Debug)]
    struct TestRuntime {
        catalog: Catalog,
        token: bool,
        user_queries: Vec<FilterSet>,
        course_queries: Vec<FilterSet>,
        dashboard_loads: usize,
        toggle_error: Option<String>,
        created: Vec<CreateAdminPayload>,
    }

    impl TestRuntime {
        fn new(catalog: Catalog) -> Self {
            Self {
                catalog,
                token: true,
                user_queries: Vec::new(),
                course_queries: Vec::new(),
                dashboard_loads: 0,
                toggle_error: None,
                created: Vec::new(),
            }
        }
    }

    impl AppRuntime for TestRuntime {
        fn has_token(&self) -> bool {
            self.token
        }

        fn load_dashboard(&mut self) -> Result<DashboardStats> {
            self.dashboard_loads += 1;
            Ok(self.catalog.dashboard_stats())
        }

        fn load_users(&mut self, filters: &FilterSet) -> Result<PageResult<User>> {
            self.user_queries.push(filters.clone());
            Ok(self.catalog.list_users(filters))
        }

        fn load_courses(&mut self, filters: &FilterSet) -> Result<PageResult<Course>> {
            self.course_queries.push(filters.clone());
            Ok(self.catalog.list_courses(filters))
        }

        fn toggle_user_status(&mut self, id: &UserId) -> Result<bool> {
            if let Some(message) = &self.toggle_error {
                return Err(anyhow!("{message}"));
            }
            self.catalog.toggle_user(id)
        }

        fn toggle_course_status(&mut self, id: &CourseId) -> Result<bool> {
            if let Some(message) = &self.toggle_error {
                return Err(anyhow!("{message}"));
            }
            self.catalog.toggle_course(id)
        }

        fn create_admin(&mut self, payload: &CreateAdminPayload) -> Result<User> {
            self.created.push(payload.clone());
            self.catalog.create_admin(payload)
        }

        fn logout(&mut self) -> Result<()> {
            self.token = false;
            Ok(())
        }
    }

    struct Harness {
        state: AppState,
        runtime: TestRuntime,
        view_data: ViewData,
        tx: Sender<InternalEvent>,
        rx: Receiver<InternalEvent>,
        start: Instant,
    }

    impl Harness {
        fn new(catalog: Catalog) -> Self {
            let (tx, rx) = mpsc::channel();
            let mut harness = Self {
                state: AppState::default(),
                runtime: TestRuntime::new(catalog),
                view_data: ViewData::new(UiOptions::default()),
                tx,
                rx,
                start: Instant::now(),
            };
            mount_screen(
                harness.state.active_screen,
                &mut harness.runtime,
                &mut harness.view_data,
                &harness.tx,
                harness.start,
            );
            harness.settle(Duration::ZERO);
            harness
        }

        fn at(&self, offset: Duration) -> Instant {
            self.start + offset
        }

        fn press(&mut self, code: KeyCode, offset: Duration) -> bool {
            let modifiers = match code {
                KeyCode::Char(ch) if ch.is_ascii_uppercase() => KeyModifiers::SHIFT,
                _ => KeyModifiers::NONE,
            };
            let now = self.at(offset);
            handle_key_event(
                &mut self.state,
                &mut self.runtime,
                &mut self.view_data,
                &self.tx,
                KeyEvent::new(code, modifiers),
                now,
            )
        }

        fn type_text(&mut self, text: &str, offset: Duration) {
            for ch in text.chars() {
                self.press(KeyCode::Char(ch), offset);
            }
        }

        fn settle(&mut self, offset: Duration) {
            let now = self.at(offset);
            launch_due_fetches(
                &self.state,
                &mut self.runtime,
                &mut self.view_data,
                &self.tx,
                now,
            );
            process_internal_events(
                &mut self.state,
                &mut self.runtime,
                &mut self.view_data,
                &self.tx,
                &self.rx,
            );
        }
    }

    fn courses_catalog() -> Catalog {
        let mut catalog = Catalog::default();
        for index in 1..=25 {
            catalog.push_course(sample_course(
                &format!("c{index:02}"),
                &format!("Course {index}"),
                "Programming",
                true,
            ));
        }
        catalog
    }

    #[test]
    fn dashboard_fetches_immediately_on_mount() {
        let harness = Harness::new(Catalog::demo());
        assert_eq!(harness.runtime.dashboard_loads, 1);
        let stats = harness.view_data.dashboard.visible().expect("stats loaded");
        assert_eq!(*stats, harness.runtime.catalog.dashboard_stats());
    }

    #[test]
    fn initial_list_fetch_waits_for_quiet_period() {
        let mut harness = Harness::new(Catalog::demo());
        harness.press(KeyCode::Char('2'), Duration::ZERO);
        assert_eq!(harness.state.active_screen, ScreenKind::Users);

        harness.settle(QUIET / 2);
        assert!(harness.runtime.user_queries.is_empty());

        harness.settle(QUIET);
        assert_eq!(harness.runtime.user_queries.len(), 1);
        assert_eq!(harness.view_data.users.records().len(), 10);
    }

    #[test]
    fn typing_burst_issues_one_fetch_with_last_value() {
        let mut harness = Harness::new(Catalog::demo());
        harness.press(KeyCode::Char('2'), Duration::ZERO);
        harness.settle(QUIET);
        assert_eq!(harness.runtime.user_queries.len(), 1);

        let typing = QUIET * 2;
        harness.press(KeyCode::Char('/'), typing);
        assert_eq!(
            harness.state.mode,
            AppMode::Filter(lms_console_app::FilterField::Search)
        );
        harness.type_text("ave", typing);
        harness.settle(typing + Duration::from_millis(100));
        harness.press(KeyCode::Char('r'), typing + Duration::from_millis(200));
        harness.settle(typing + Duration::from_millis(400));
        assert_eq!(harness.runtime.user_queries.len(), 1);

        harness.settle(typing + Duration::from_millis(200) + QUIET);
        assert_eq!(harness.runtime.user_queries.len(), 2);
        let last = &harness.runtime.user_queries[1];
        assert_eq!(last.search, "aver");
        assert_eq!(last.page, 1);

        harness.press(KeyCode::Enter, typing + QUIET * 2);
        assert_eq!(harness.state.mode, AppMode::Nav);
    }

    #[test]
    fn next_page_fetches_page_two_of_three() {
        let mut harness = Harness::new(courses_catalog());
        harness.press(KeyCode::Char('3'), Duration::ZERO);
        harness.settle(QUIET);
        let pager = harness.view_data.courses.pager().expect("three pages");
        assert_eq!(pager.label(), "Page 1 of 3");
        assert!(!pager.previous_enabled);
        assert!(pager.next_enabled);

        harness.press(KeyCode::Char('l'), QUIET);
        harness.settle(QUIET * 2);
        assert_eq!(harness.runtime.course_queries.len(), 2);
        assert_eq!(harness.runtime.course_queries[1].page, 2);
        assert_eq!(harness.view_data.courses.records()[0].title, "Course 11");
    }

    #[test]
    fn previous_on_first_page_reports_and_does_not_fetch() {
        let mut harness = Harness::new(courses_catalog());
        harness.press(KeyCode::Char('3'), Duration::ZERO);
        harness.settle(QUIET);

        harness.press(KeyCode::Char('h'), QUIET);
        harness.settle(QUIET * 3);
        assert_eq!(harness.runtime.course_queries.len(), 1);
        assert_eq!(harness.state.status_line.as_deref(), Some("no page 0"));
    }

    #[test]
    fn confirmed_toggle_patches_only_the_selected_row() {
        let mut harness = Harness::new(courses_catalog());
        harness.press(KeyCode::Char('3'), Duration::ZERO);
        harness.settle(QUIET);
        harness.press(KeyCode::Char('j'), QUIET);
        let before = harness.view_data.courses.state().clone();

        harness.press(KeyCode::Char('t'), QUIET);
        assert_eq!(harness.state.mode, AppMode::Confirm);
        harness.press(KeyCode::Char('y'), QUIET);
        assert_eq!(harness.state.mode, AppMode::Nav);

        let before = before.visible().expect("page before");
        let after = harness.view_data.courses.state().visible().expect("page after");
        assert_eq!(after.pagination, before.pagination);
        assert!(!after.records[1].is_active);
        for index in [0, 2, 3, 9] {
            assert_eq!(after.records[index], before.records[index]);
        }
        assert_eq!(harness.runtime.course_queries.len(), 1);
    }

    #[test]
    fn declined_toggle_sends_nothing() {
        let mut harness = Harness::new(courses_catalog());
        harness.press(KeyCode::Char('3'), Duration::ZERO);
        harness.settle(QUIET);

        harness.press(KeyCode::Char('t'), QUIET);
        harness.press(KeyCode::Char('n'), QUIET);
        assert_eq!(harness.state.mode, AppMode::Nav);
        assert!(harness.runtime.catalog.courses()[0].is_active);
    }

    #[test]
    fn failed_toggle_alerts_and_leaves_page_unchanged() {
        let mut harness = Harness::new(courses_catalog());
        harness.press(KeyCode::Char('3'), Duration::ZERO);
        harness.settle(QUIET);
        harness.runtime.toggle_error = Some("Course not found".to_owned());
        let before = harness.view_data.courses.state().clone();

        harness.press(KeyCode::Enter, QUIET);
        harness.press(KeyCode::Char('y'), QUIET);
        assert_eq!(harness.state.mode, AppMode::Alert);
        assert_eq!(harness.state.alert.as_deref(), Some("Course not found"));
        assert_eq!(harness.view_data.courses.state(), &before);

        harness.press(KeyCode::Enter, QUIET);
        assert_eq!(harness.state.mode, AppMode::Nav);
    }

    #[test]
    fn admin_creation_refetches_with_current_filters() {
        let mut harness = Harness::new(Catalog::demo());
        harness.press(KeyCode::Char('2'), Duration::ZERO);
        harness.press(KeyCode::Char('s'), Duration::ZERO);
        harness.settle(QUIET);
        assert_eq!(harness.runtime.user_queries.len(), 1);

        harness.press(KeyCode::Char('a'), QUIET);
        assert_eq!(harness.state.mode, AppMode::AdminForm);
        harness.type_text("Root Admin", QUIET);
        harness.press(KeyCode::Tab, QUIET);
        harness.type_text("root@campus.edu", QUIET);
        harness.press(KeyCode::Tab, QUIET);
        harness.type_text("secret1", QUIET);
        harness.press(KeyCode::Enter, QUIET);

        assert_eq!(harness.state.mode, AppMode::Alert);
        assert_eq!(
            harness.state.alert.as_deref(),
            Some("Admin created successfully!")
        );
        assert_eq!(harness.runtime.created.len(), 1);
        assert_eq!(harness.view_data.admin_form, Default::default());

        harness.settle(QUIET);
        assert_eq!(harness.runtime.user_queries.len(), 2);
        assert_eq!(
            harness.runtime.user_queries[1],
            harness.runtime.user_queries[0]
        );
        assert_eq!(harness.runtime.user_queries[1].status, ActiveFilter::Active);

        harness.press(KeyCode::Esc, QUIET);
        assert_eq!(harness.state.mode, AppMode::Nav);
    }

    #[test]
    fn failed_admin_creation_keeps_form_open() {
        let mut harness = Harness::new(Catalog::demo());
        harness.press(KeyCode::Char('2'), Duration::ZERO);
        harness.settle(QUIET);
        let existing = harness.runtime.catalog.users()[0].email.clone();

        harness.press(KeyCode::Char('a'), QUIET);
        harness.type_text("Dup", QUIET);
        harness.press(KeyCode::Tab, QUIET);
        harness.type_text(&existing, QUIET);
        harness.press(KeyCode::Tab, QUIET);
        harness.type_text("secret1", QUIET);
        harness.press(KeyCode::Enter, QUIET);

        assert_eq!(
            harness.state.alert.as_deref(),
            Some("Failed to create admin: User already exists")
        );
        harness.press(KeyCode::Enter, QUIET);
        assert_eq!(harness.state.mode, AppMode::AdminForm);
        assert_eq!(
            harness.view_data.admin_form.error.as_deref(),
            Some("User already exists")
        );
        assert_eq!(harness.view_data.admin_form.payload.name, "Dup");
        assert_eq!(harness.runtime.user_queries.len(), 1);
    }

    #[test]
    fn invalid_admin_form_is_not_submitted() {
        let mut harness = Harness::new(Catalog::demo());
        harness.press(KeyCode::Char('2'), Duration::ZERO);
        harness.press(KeyCode::Char('a'), Duration::ZERO);
        harness.type_text("Root", Duration::ZERO);
        harness.press(KeyCode::Enter, Duration::ZERO);

        assert_eq!(harness.state.mode, AppMode::AdminForm);
        assert!(harness.runtime.created.is_empty());
        assert!(harness.view_data.admin_form.error.is_some());
    }

    #[test]
    fn admin_form_is_refused_outside_users_screen() {
        let mut harness = Harness::new(Catalog::demo());
        harness.press(KeyCode::Char('a'), Duration::ZERO);
        assert_eq!(harness.state.mode, AppMode::Nav);
        assert!(harness.state.status_line.is_some());
    }

    #[test]
    fn leaving_a_screen_discards_its_in_flight_result_and_filters() {
        let mut harness = Harness::new(Catalog::demo());
        harness.press(KeyCode::Char('2'), Duration::ZERO);
        harness.press(KeyCode::Char('/'), Duration::ZERO);
        harness.type_text("a", Duration::ZERO);
        harness.press(KeyCode::Enter, Duration::ZERO);

        let now = harness.at(QUIET);
        launch_due_fetches(
            &harness.state,
            &mut harness.runtime,
            &mut harness.view_data,
            &harness.tx,
            now,
        );
        assert_eq!(harness.runtime.user_queries.len(), 1);

        harness.press(KeyCode::Char('3'), QUIET);
        harness.settle(QUIET);
        assert_eq!(harness.view_data.users.state(), &LoadState::Idle);
        assert!(harness.view_data.users.filters().search.is_empty());
    }

    #[test]
    fn missing_token_never_fetches() {
        let mut harness = Harness::new(Catalog::demo());
        harness.runtime.token = false;
        harness.press(KeyCode::Char('3'), Duration::ZERO);
        harness.settle(QUIET * 4);

        assert!(harness.runtime.course_queries.is_empty());
        assert_eq!(harness.view_data.courses.state(), &LoadState::Idle);
    }

    #[test]
    fn session_expiry_logs_out_and_surfaces_an_error() {
        let mut harness = Harness::new(Catalog::demo());
        harness
            .tx
            .send(InternalEvent::SessionExpired)
            .expect("channel open");
        harness.settle(Duration::ZERO);

        assert!(!harness.runtime.token);
        assert_eq!(harness.view_data.dashboard.error(), Some("Session expired"));
        assert!(
            harness
                .state
                .status_line
                .as_deref()
                .is_some_and(|status| status.contains("session expired"))
        );
    }

    #[test]
    fn rejected_list_fetch_keeps_its_error_in_either_order() {
        for expiry_first in [true, false] {
            let mut harness = Harness::new(Catalog::demo());
            harness.press(KeyCode::Char('2'), Duration::ZERO);
            let ticket = harness
                .view_data
                .users
                .poll_fetch(harness.at(QUIET), true)
                .expect("users ticket");
            let failed = InternalEvent::Fetched(FetchOutcome::Users {
                request_id: ticket.request_id,
                result: Err("jwt expired".to_owned()),
            });

            if expiry_first {
                harness.tx.send(InternalEvent::SessionExpired).expect("channel open");
                harness.tx.send(failed).expect("channel open");
            } else {
                harness.tx.send(failed).expect("channel open");
                harness.tx.send(InternalEvent::SessionExpired).expect("channel open");
            }
            harness.settle(QUIET * 4);

            assert!(!harness.runtime.token);
            assert_eq!(harness.view_data.users.state().error(), Some("jwt expired"));
            assert!(harness.runtime.user_queries.is_empty());
        }
    }

    #[test]
    fn stale_dashboard_outcome_is_ignored() {
        let mut harness = Harness::new(Catalog::demo());
        let loaded = harness.view_data.dashboard.clone();
        harness
            .tx
            .send(InternalEvent::Fetched(FetchOutcome::Dashboard {
                request_id: 999,
                result: Err("late".to_owned()),
            }))
            .expect("channel open");
        harness.settle(Duration::ZERO);
        assert_eq!(harness.view_data.dashboard, loaded);
    }

    #[test]
    fn reload_key_refetches_current_page() {
        let mut harness = Harness::new(Catalog::demo());
        harness.press(KeyCode::Char('R'), Duration::ZERO);
        harness.settle(Duration::ZERO);
        assert_eq!(harness.runtime.dashboard_loads, 2);
    }

    #[test]
    fn quit_keys_end_the_loop() {
        let mut harness = Harness::new(Catalog::demo());
        assert!(harness.press(KeyCode::Char('q'), Duration::ZERO));
        let now = harness.at(Duration::ZERO);
        assert!(handle_key_event(
            &mut harness.state,
            &mut harness.runtime,
            &mut harness.view_data,
            &harness.tx,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            now,
        ));
    }

    #[test]
    fn role_filter_cycles_through_filterable_roles() {
        assert_eq!(next_role_filter(""), "Student");
        assert_eq!(next_role_filter("Student"), "Instructor");
        assert_eq!(next_role_filter("Instructor"), "");
        assert_eq!(next_role_filter("bogus"), "");
    }

    #[test]
    fn failed_request_carries_its_id() {
        let request = FetchRequest::Users {
            request_id: 4,
            filters: FilterSet::new(lms_console_app::CriterionKind::Role, 10),
        };
        assert_eq!(
            request.failed("boom".to_owned()),
            FetchOutcome::Users {
                request_id: 4,
                result: Err("boom".to_owned())
            }
        );
    }
}
