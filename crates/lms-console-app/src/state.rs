// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{FilterField, ScreenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Nav,
    Filter(FilterField),
    AdminForm,
    Confirm,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub active_screen: ScreenKind,
    pub alert: Option<String>,
    /// Mode restored once the alert is acknowledged.
    pub resume_mode: AppMode,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            active_screen: ScreenKind::Dashboard,
            alert: None,
            resume_mode: AppMode::Nav,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextScreen,
    PrevScreen,
    SelectScreen(ScreenKind),
    EditFilter(FilterField),
    OpenAdminForm,
    AskConfirm,
    ExitToNav,
    ShowAlert(String),
    DismissAlert,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    ScreenChanged { from: ScreenKind, to: ScreenKind },
    AlertShown(String),
    AlertDismissed,
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextScreen => self.rotate_screen(1),
            AppCommand::PrevScreen => self.rotate_screen(-1),
            AppCommand::SelectScreen(screen) => self.switch_screen(screen),
            AppCommand::EditFilter(field) => self.set_mode(AppMode::Filter(field)),
            AppCommand::OpenAdminForm => {
                if self.active_screen != ScreenKind::Users {
                    return vec![self.set_status("admins are created from the users screen")];
                }
                self.set_mode(AppMode::AdminForm)
            }
            AppCommand::AskConfirm => self.set_mode(AppMode::Confirm),
            AppCommand::ExitToNav => self.set_mode(AppMode::Nav),
            AppCommand::ShowAlert(message) => {
                if self.mode != AppMode::Alert {
                    self.resume_mode = self.mode;
                }
                self.alert = Some(message.clone());
                self.mode = AppMode::Alert;
                vec![AppEvent::ModeChanged(self.mode), AppEvent::AlertShown(message)]
            }
            AppCommand::DismissAlert => {
                if self.alert.take().is_none() {
                    return Vec::new();
                }
                self.mode = self.resume_mode;
                self.resume_mode = AppMode::Nav;
                vec![AppEvent::AlertDismissed, AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_screen(&mut self, delta: isize) -> Vec<AppEvent> {
        let screens = ScreenKind::ALL;
        let current = screens
            .iter()
            .position(|screen| *screen == self.active_screen)
            .unwrap_or(0) as isize;
        let len = screens.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.switch_screen(screens[next])
    }

    fn switch_screen(&mut self, screen: ScreenKind) -> Vec<AppEvent> {
        if screen == self.active_screen {
            return Vec::new();
        }
        let from = self.active_screen;
        self.active_screen = screen;
        self.mode = AppMode::Nav;
        vec![AppEvent::ScreenChanged { from, to: screen }]
    }

    fn set_mode(&mut self, mode: AppMode) -> Vec<AppEvent> {
        self.mode = mode;
        vec![AppEvent::ModeChanged(mode)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
