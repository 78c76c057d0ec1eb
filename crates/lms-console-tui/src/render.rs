// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{AdminFormUiState, PendingToggle, ViewData};
use lms_console_app::{
    AdminFormField, AppMode, AppState, Course, DashboardStats, FilterField, FilterSet, ListScreen,
    LoadState, PageResult, Pager, Record, ScreenKind, User,
};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap,
};
use time::OffsetDateTime;

/// Column layout and card text for a record shown on a list screen.
trait ListedRecord: Record {
    const NOUN: &'static str;
    const HEADERS: [&'static str; 6];
    const WIDTHS: [u16; 6];

    fn cells(&self) -> [String; 6];
    fn card_lines(&self) -> Vec<String>;
}

impl ListedRecord for User {
    const NOUN: &'static str = "users";
    const HEADERS: [&'static str; 6] = ["Name", "Email", "Role", "Status", "Joined", "Action"];
    const WIDTHS: [u16; 6] = [20, 28, 12, 10, 14, 16];

    fn cells(&self) -> [String; 6] {
        [
            self.name.clone(),
            self.email.clone(),
            self.role.as_str().to_owned(),
            status_badge(self.is_active).to_owned(),
            format_created(self.created_at),
            toggle_action_label(self.is_active).to_owned(),
        ]
    }

    fn card_lines(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.email.clone(),
            format!(
                "{} | {} | joined {}",
                self.role.as_str(),
                status_badge(self.is_active),
                format_created(self.created_at)
            ),
            format!("[{}]", toggle_action_label(self.is_active)),
        ]
    }
}

impl ListedRecord for Course {
    const NOUN: &'static str = "courses";
    const HEADERS: [&'static str; 6] = [
        "Title",
        "Instructor",
        "Enrollments",
        "Status",
        "Created",
        "Action",
    ];
    const WIDTHS: [u16; 6] = [28, 20, 12, 10, 14, 16];

    fn cells(&self) -> [String; 6] {
        [
            self.title.clone(),
            self.instructor_name().to_owned(),
            self.enrollment_count.to_string(),
            status_badge(self.is_active).to_owned(),
            format_created(self.created_at),
            toggle_action_label(self.is_active).to_owned(),
        ]
    }

    fn card_lines(&self) -> Vec<String> {
        let mut lines = vec![self.title.clone(), format!("by {}", self.instructor_name())];
        if !self.category.is_empty() {
            lines.push(self.category.clone());
        }
        lines.push(format!(
            "{} enrolled | {} | created {}",
            self.enrollment_count,
            status_badge(self.is_active),
            format_created(self.created_at)
        ));
        lines.push(format!("[{}]", toggle_action_label(self.is_active)));
        lines
    }
}

pub(crate) fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let selected = ScreenKind::ALL
        .iter()
        .position(|screen| *screen == state.active_screen)
        .unwrap_or(0);
    let titles = ScreenKind::ALL
        .iter()
        .enumerate()
        .map(|(index, screen)| format!("{} {}", index + 1, screen.title()))
        .collect::<Vec<String>>();
    let tabs = Tabs::new(titles)
        .block(Block::default().title("lms-console").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    let wide = layout[1].width >= view_data.options.wide_min_width;
    let editing = match state.mode {
        AppMode::Filter(field) => Some(field),
        _ => None,
    };
    match state.active_screen {
        ScreenKind::Dashboard => {
            let body = Paragraph::new(render_dashboard_text(&view_data.dashboard)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(ScreenKind::Dashboard.title()),
            );
            frame.render_widget(body, layout[1]);
        }
        ScreenKind::Users => render_list(
            frame,
            layout[1],
            &view_data.users,
            view_data.user_cursor,
            wide,
            editing,
        ),
        ScreenKind::Courses => render_list(
            frame,
            layout[1],
            &view_data.courses,
            view_data.course_cursor,
            wide,
            editing,
        ),
    }

    let status = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if state.mode == AppMode::AdminForm
        || (state.mode == AppMode::Alert && state.resume_mode == AppMode::AdminForm)
    {
        let area = centered_rect(60, 45, frame.area());
        frame.render_widget(Clear, area);
        let form = Paragraph::new(render_admin_form_text(&view_data.admin_form)).block(
            Block::default()
                .title("Create Admin")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(form, area);
    }

    if state.mode == AppMode::Confirm
        && let Some(pending) = &view_data.pending_toggle
    {
        let area = centered_rect(56, 25, frame.area());
        frame.render_widget(Clear, area);
        let prompt = Paragraph::new(render_confirm_text(pending))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("confirm").borders(Borders::ALL));
        frame.render_widget(prompt, area);
    }

    if let Some(alert) = &state.alert {
        let area = centered_rect(56, 25, frame.area());
        frame.render_widget(Clear, area);
        let dialog = Paragraph::new(format!("{alert}\n\n[enter] OK"))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title("alert")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Yellow)),
            );
        frame.render_widget(dialog, area);
    }
}

fn render_list<R: ListedRecord>(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    screen: &ListScreen<R>,
    cursor: usize,
    wide: bool,
    editing: Option<FilterField>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(screen.kind().title());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(filter_summary(screen.filters(), editing))
            .style(Style::default().fg(Color::Gray)),
        layout[0],
    );

    if let Some(message) = list_body_message(screen.state(), R::NOUN) {
        frame.render_widget(Paragraph::new(message), layout[1]);
        return;
    }

    let records = screen.records();
    if wide {
        let header = Row::new(R::HEADERS.iter().map(|label| {
            Cell::from(*label).style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
        }));
        let rows = records.iter().map(|record| {
            let cells = record.cells().into_iter().enumerate().map(|(column, text)| {
                let mut style = Style::default();
                if column == 3 {
                    style = style.fg(if record.is_active() {
                        Color::Green
                    } else {
                        Color::Red
                    });
                }
                Cell::from(text).style(style)
            });
            Row::new(cells)
        });
        let widths = R::WIDTHS.map(Constraint::Percentage);
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(Style::default().bg(Color::DarkGray));
        let mut table_state =
            TableState::default().with_selected((!records.is_empty()).then_some(cursor));
        frame.render_stateful_widget(table, layout[1], &mut table_state);
    } else {
        let scroll = card_scroll(records, cursor, layout[1].height);
        frame.render_widget(
            Paragraph::new(render_cards(records, cursor)).scroll((scroll, 0)),
            layout[1],
        );
    }

    frame.render_widget(
        Paragraph::new(pager_text(screen.pager())).style(Style::default().fg(Color::Cyan)),
        layout[2],
    );
}

fn render_dashboard_text(state: &LoadState<DashboardStats>) -> String {
    let stats = match state {
        LoadState::Idle => return "No data available.".to_owned(),
        LoadState::Loading { .. } => return "Loading dashboard...".to_owned(),
        LoadState::Error(message) => return format!("Error: {message}"),
        LoadState::Ready(stats) => stats,
    };

    [
        format!("Total Students:     {}", stats.total_students),
        format!("Total Instructors:  {}", stats.total_instructors),
        format!("Total Courses:      {}", stats.total_courses),
        format!("Total Enrollments:  {}", stats.total_enrollments),
        String::new(),
        "Quick Stats".to_owned(),
        format!(
            "Average enrollments per course: {}",
            format_quick_stat(stats.average_enrollments_per_course())
        ),
        format!(
            "Student to instructor ratio:    {}:1",
            format_quick_stat(stats.students_per_instructor())
        ),
        format!(
            "Courses per instructor:         {}",
            format_quick_stat(stats.courses_per_instructor())
        ),
    ]
    .join("\n")
}

fn format_quick_stat(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.1}"),
        None => "0".to_owned(),
    }
}

fn list_body_message<R>(state: &LoadState<PageResult<R>>, noun: &str) -> Option<String> {
    match state {
        LoadState::Loading { .. } => Some(format!("Loading {noun}...")),
        LoadState::Error(message) => Some(format!("Error: {message}")),
        LoadState::Idle | LoadState::Ready(_) => None,
    }
}

fn filter_summary(filters: &FilterSet, editing: Option<FilterField>) -> String {
    let show = |value: &str, field: FilterField, empty: &str| {
        let mut text = if value.is_empty() && editing != Some(field) {
            empty.to_owned()
        } else {
            value.to_owned()
        };
        if editing == Some(field) {
            text.push('_');
        }
        text
    };

    let criterion = filters.criterion_kind.label();
    format!(
        "search: {} | {criterion}: {} | status: {} | {} per page",
        show(&filters.search, FilterField::Search, "-"),
        show(&filters.criterion, FilterField::Criterion, "all"),
        filters.status.label(),
        filters.limit,
    )
}

fn render_cards<R: ListedRecord>(records: &[R], cursor: usize) -> String {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let marker = if index == cursor { "> " } else { "  " };
            record
                .card_lines()
                .iter()
                .enumerate()
                .map(|(line_index, line)| {
                    if line_index == 0 {
                        format!("{marker}{line}")
                    } else {
                        format!("  {line}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// First line to show so the selected card fits in `height` rows.
fn card_scroll<R: ListedRecord>(records: &[R], cursor: usize, height: u16) -> u16 {
    let Some(selected) = records.get(cursor) else {
        return 0;
    };
    let start: usize = records[..cursor]
        .iter()
        .map(|record| record.card_lines().len() + 1)
        .sum();
    let end = start + selected.card_lines().len();
    let scroll = end.saturating_sub(usize::from(height)).min(start);
    u16::try_from(scroll).unwrap_or(u16::MAX)
}

fn pager_text(pager: Option<Pager>) -> String {
    let Some(pager) = pager else {
        return String::new();
    };
    let previous = if pager.previous_enabled {
        "< Previous (h)"
    } else {
        "  Previous"
    };
    let next = if pager.next_enabled {
        "(l) Next >"
    } else {
        "Next  "
    };
    format!("{previous}   {}   {next}", pager.label())
}

fn status_badge(is_active: bool) -> &'static str {
    if is_active { "Active" } else { "Inactive" }
}

fn toggle_action_label(is_active: bool) -> &'static str {
    if is_active { "Deactivate" } else { "Activate" }
}

fn format_created(created_at: OffsetDateTime) -> String {
    created_at.date().to_string()
}

fn render_confirm_text(pending: &PendingToggle) -> String {
    format!(
        "{}\n\n{}\n\n[y] yes   [n] no",
        pending.prompt(),
        pending.name()
    )
}

fn render_admin_form_text(form: &AdminFormUiState) -> String {
    let current = form.current_field();
    let mut lines = AdminFormField::ALL
        .iter()
        .map(|field| {
            let marker = if *field == current { ">" } else { " " };
            let value = form.payload.field(*field);
            let shown = match field {
                AdminFormField::Password => "*".repeat(value.chars().count()),
                _ => value.to_owned(),
            };
            format!("{marker} {:<9} {shown}", field.label())
        })
        .collect::<Vec<_>>();
    if let Some(error) = &form.error {
        lines.push(String::new());
        lines.push(format!("error: {error}"));
    }
    lines.push(String::new());
    lines.push("[tab] next field   [enter] create   [esc] cancel".to_owned());
    lines.join("\n")
}

fn status_text(state: &AppState) -> String {
    let mode = match state.mode {
        AppMode::Nav => "NAV",
        AppMode::Filter(_) => "FILTER",
        AppMode::AdminForm => "FORM",
        AppMode::Confirm => "CONFIRM",
        AppMode::Alert => "ALERT",
    };
    let hints = match (state.mode, state.active_screen) {
        (AppMode::Nav, ScreenKind::Dashboard) => "tab/1-3 screens | R reload | L logout | q quit",
        (AppMode::Nav, ScreenKind::Users) => {
            "j/k rows | h/l pages | / search | r role | s status | t toggle | a new admin | R reload | q quit"
        }
        (AppMode::Nav, ScreenKind::Courses) => {
            "j/k rows | h/l pages | / search | c category | s status | t toggle | R reload | q quit"
        }
        (AppMode::Filter(_), _) => "type to filter | enter/esc done",
        (AppMode::AdminForm, _) => "tab next field | enter create | esc cancel",
        (AppMode::Confirm, _) => "y confirm | n cancel",
        (AppMode::Alert, _) => "enter dismiss",
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {hints}"),
        None => format!("{mode} | {hints}"),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
