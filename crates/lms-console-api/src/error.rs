// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("cannot reach {base_url} -- check [api].base_url and that the LMS API is running ({error})")]
    Unreachable {
        base_url: String,
        error: reqwest::Error,
    },
    /// The credential was rejected. Ending the session is up to the caller.
    #[error("session rejected ({status}): {message} -- log in again or update [auth].token")]
    Unauthorized { status: u16, message: String },
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("decode {what}: {error}")]
    Decode {
        what: &'static str,
        error: serde_json::Error,
    },
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Message suitable for an alert or an error pane.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { message, .. } | Self::Server { message, .. } => message.clone(),
            _ => self.to_string(),
        }
    }

    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        let message = clean_error_message(status, body);
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Self::Unauthorized {
                status: status.as_u16(),
                message,
            };
        }
        Self::Server {
            status: status.as_u16(),
            message,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    message: Option<String>,
    error: Option<String>,
}

fn clean_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<MessageEnvelope>(body) {
        if let Some(message) = parsed.message.filter(|message| !message.is_empty()) {
            return message;
        }
        if let Some(error) = parsed.error.filter(|error| !error.is_empty()) {
            return error;
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() < 100 && !trimmed.contains('{') {
        return trimmed.to_owned();
    }

    format!("server returned {}", status.as_u16())
}
