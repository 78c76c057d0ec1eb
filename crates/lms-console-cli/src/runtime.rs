// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use lms_console_api::{ApiError, Client, Token};
use lms_console_app::{
    Course, CourseId, CreateAdminPayload, DashboardStats, FilterSet, PageResult, User, UserId,
};
use lms_console_testkit::Catalog;
use lms_console_tui::{AppRuntime, FetchOutcome, FetchRequest, InternalEvent};
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{debug, info, warn};

const MISSING_TOKEN: &str = "No authentication token found";

/// Talks to the LMS admin API. Fetches run on worker threads; mutations run
/// on the caller's thread so their outcome can drive the blocking alert.
pub struct ApiRuntime {
    client: Client,
    token: Option<Token>,
}

impl ApiRuntime {
    pub fn new(client: Client, token: Option<Token>) -> Self {
        Self { client, token }
    }

    fn token(&self) -> Result<&Token> {
        self.token.as_ref().ok_or_else(|| anyhow!(MISSING_TOKEN))
    }

    fn settle<T>(&mut self, result: Result<T, ApiError>) -> Result<T> {
        result.map_err(|error| {
            if error.is_unauthorized() {
                info!("session token rejected; clearing it");
                self.token = None;
            }
            anyhow!(error.user_message())
        })
    }
}

impl AppRuntime for ApiRuntime {
    fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn load_dashboard(&mut self) -> Result<DashboardStats> {
        let result = self.client.dashboard_stats(self.token()?);
        self.settle(result)
    }

    fn load_users(&mut self, filters: &FilterSet) -> Result<PageResult<User>> {
        let result = self.client.list_users(self.token()?, filters);
        self.settle(result)
    }

    fn load_courses(&mut self, filters: &FilterSet) -> Result<PageResult<Course>> {
        let result = self.client.list_courses(self.token()?, filters);
        self.settle(result)
    }

    fn toggle_user_status(&mut self, id: &UserId) -> Result<bool> {
        let result = self.client.toggle_user_status(self.token()?, id);
        self.settle(result)
    }

    fn toggle_course_status(&mut self, id: &CourseId) -> Result<bool> {
        let result = self.client.toggle_course_status(self.token()?, id);
        self.settle(result)
    }

    fn create_admin(&mut self, payload: &CreateAdminPayload) -> Result<User> {
        let result = self.client.create_admin(self.token()?, payload);
        self.settle(result)
    }

    fn logout(&mut self) -> Result<()> {
        self.token = None;
        Ok(())
    }

    fn spawn_fetch(&mut self, request: FetchRequest, tx: Sender<InternalEvent>) -> Result<()> {
        let token = self.token()?.clone();
        let client = self.client.clone();
        let request_id = request.request_id();
        debug!(request_id, screen = ?request.screen(), "starting fetch");

        thread::Builder::new()
            .name(format!("lms-fetch-{request_id}"))
            .spawn(move || {
                let (outcome, expired) = fetch_with(&client, &token, request);
                let _ = tx.send(InternalEvent::Fetched(outcome));
                if expired {
                    let _ = tx.send(InternalEvent::SessionExpired);
                }
            })
            .context("spawn fetch worker")?;
        Ok(())
    }
}

/// Runs one fetch and reports whether the server rejected the token.
fn fetch_with(client: &Client, token: &Token, request: FetchRequest) -> (FetchOutcome, bool) {
    fn split<T>(result: Result<T, ApiError>) -> (Result<T, String>, bool) {
        match result {
            Ok(value) => (Ok(value), false),
            Err(error) => {
                warn!(%error, "fetch failed");
                let expired = error.is_unauthorized();
                (Err(error.user_message()), expired)
            }
        }
    }

    match request {
        FetchRequest::Dashboard { request_id } => {
            let (result, expired) = split(client.dashboard_stats(token));
            (FetchOutcome::Dashboard { request_id, result }, expired)
        }
        FetchRequest::Users {
            request_id,
            filters,
        } => {
            let (result, expired) = split(client.list_users(token, &filters));
            (FetchOutcome::Users { request_id, result }, expired)
        }
        FetchRequest::Courses {
            request_id,
            filters,
        } => {
            let (result, expired) = split(client.list_courses(token, &filters));
            (FetchOutcome::Courses { request_id, result }, expired)
        }
    }
}

/// Serves the console from an in-memory catalog, for `--demo`.
#[derive(Debug)]
pub struct DemoRuntime {
    catalog: Catalog,
    signed_in: bool,
}

impl DemoRuntime {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            signed_in: true,
        }
    }

    fn ensure_signed_in(&self) -> Result<()> {
        if self.signed_in {
            Ok(())
        } else {
            Err(anyhow!(MISSING_TOKEN))
        }
    }
}

impl AppRuntime for DemoRuntime {
    fn has_token(&self) -> bool {
        self.signed_in
    }

    fn load_dashboard(&mut self) -> Result<DashboardStats> {
        self.ensure_signed_in()?;
        Ok(self.catalog.dashboard_stats())
    }

    fn load_users(&mut self, filters: &FilterSet) -> Result<PageResult<User>> {
        self.ensure_signed_in()?;
        Ok(self.catalog.list_users(filters))
    }

    fn load_courses(&mut self, filters: &FilterSet) -> Result<PageResult<Course>> {
        self.ensure_signed_in()?;
        Ok(self.catalog.list_courses(filters))
    }

    fn toggle_user_status(&mut self, id: &UserId) -> Result<bool> {
        self.ensure_signed_in()?;
        self.catalog.toggle_user(id)
    }

    fn toggle_course_status(&mut self, id: &CourseId) -> Result<bool> {
        self.ensure_signed_in()?;
        self.catalog.toggle_course(id)
    }

    fn create_admin(&mut self, payload: &CreateAdminPayload) -> Result<User> {
        self.ensure_signed_in()?;
        self.catalog.create_admin(payload)
    }

    fn logout(&mut self) -> Result<()> {
        self.signed_in = false;
        Ok(())
    }
}
