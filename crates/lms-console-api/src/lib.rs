// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod error;

pub use error::ApiError;

use anyhow::{Context, Result, bail};
use lms_console_app::{
    Course, CourseId, CreateAdminPayload, DashboardStats, FilterSet, PageResult, User, UserId,
};
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Bearer credential issued by the LMS. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token([REDACTED])")
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            bail!("api.base_url must not be empty");
        }

        let base_url = Url::parse(&format!("{trimmed}/"))
            .with_context(|| format!("parse api.base_url {trimmed:?}"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!(
                "api.base_url {trimmed:?} must use http or https, got {}",
                base_url.scheme()
            );
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn dashboard_stats(&self, token: &Token) -> Result<DashboardStats, ApiError> {
        let url = self.endpoint(&["admin", "dashboard"]);
        let body: Envelope<DashboardBody> =
            self.send(self.http.get(url), token, "dashboard stats")?;
        Ok(body.into_inner().stats)
    }

    pub fn list_users(
        &self,
        token: &Token,
        filters: &FilterSet,
    ) -> Result<PageResult<User>, ApiError> {
        let url = self.endpoint(&["admin", "users"]);
        let request = self.http.get(url).query(&filters.query_pairs());
        self.send(request, token, "user page")
    }

    pub fn list_courses(
        &self,
        token: &Token,
        filters: &FilterSet,
    ) -> Result<PageResult<Course>, ApiError> {
        let url = self.endpoint(&["admin", "courses"]);
        let request = self.http.get(url).query(&filters.query_pairs());
        self.send(request, token, "course page")
    }

    /// Returns the server's authoritative `isActive` after the toggle.
    pub fn toggle_user_status(&self, token: &Token, id: &UserId) -> Result<bool, ApiError> {
        let url = self.endpoint(&["admin", "users", id.as_str(), "toggle-status"]);
        let body: Envelope<ToggleBody> = self.send(self.http.patch(url), token, "user status")?;
        Ok(body.into_inner().is_active)
    }

    pub fn toggle_course_status(&self, token: &Token, id: &CourseId) -> Result<bool, ApiError> {
        let url = self.endpoint(&["admin", "courses", id.as_str(), "toggle-status"]);
        let body: Envelope<ToggleBody> =
            self.send(self.http.patch(url), token, "course status")?;
        Ok(body.into_inner().is_active)
    }

    pub fn create_admin(
        &self,
        token: &Token,
        payload: &CreateAdminPayload,
    ) -> Result<User, ApiError> {
        let url = self.endpoint(&["admin", "users", "create-admin"]);
        let request = self.http.post(url).json(&payload.normalized());
        let body: CreatedAdmin = self.send(request, token, "created admin")?;
        Ok(body.into_user())
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: &Token,
        what: &'static str,
    ) -> Result<T, ApiError> {
        debug!(what, "sending request");
        let response = request
            .bearer_auth(token.expose())
            .send()
            .map_err(|error| self.unreachable(error))?;

        let status = response.status();
        let body = response.text().map_err(|error| self.unreachable(error))?;
        if !status.is_success() {
            let error = ApiError::from_status(status, &body);
            warn!(what, status = status.as_u16(), %error, "request failed");
            return Err(error);
        }

        debug!(what, status = status.as_u16(), bytes = body.len(), "request succeeded");
        serde_json::from_str(&body).map_err(|error| ApiError::Decode { what, error })
    }

    fn unreachable(&self, error: reqwest::Error) -> ApiError {
        warn!(base_url = self.base_url(), %error, "request did not complete");
        ApiError::Unreachable {
            base_url: self.base_url().to_owned(),
            error,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DashboardBody {
    stats: DashboardStats,
}

#[derive(Debug, Deserialize)]
struct ToggleBody {
    #[serde(rename = "isActive")]
    is_active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CreatedAdmin {
    Wrapped { data: User },
    Named { user: User },
    Bare(User),
}

impl CreatedAdmin {
    fn into_user(self) -> User {
        match self {
            Self::Wrapped { data } | Self::Named { user: data } | Self::Bare(data) => data,
        }
    }
}
