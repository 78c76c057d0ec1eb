// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::Serialize;
use std::fmt;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminFormField {
    Name,
    Email,
    Password,
}

impl AdminFormField {
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Password];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Password => "password",
        }
    }
}

/// Body of the create-admin request.
#[derive(Clone, PartialEq, Eq, Default, Serialize)]
pub struct CreateAdminPayload {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl CreateAdminPayload {
    pub fn field(&self, field: AdminFormField) -> &str {
        match field {
            AdminFormField::Name => &self.name,
            AdminFormField::Email => &self.email,
            AdminFormField::Password => &self.password,
        }
    }

    pub fn field_mut(&mut self, field: AdminFormField) -> &mut String {
        match field {
            AdminFormField::Name => &mut self.name,
            AdminFormField::Email => &mut self.email,
            AdminFormField::Password => &mut self.password,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("name is required");
        }
        validate_email(self.email.trim())?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            bail!("password must be at least {MIN_PASSWORD_LEN} characters");
        }
        Ok(())
    }

    /// Trimmed copy sent over the wire. The password is left as typed.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_ascii_lowercase(),
            password: self.password.clone(),
        }
    }
}

impl fmt::Debug for CreateAdminPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateAdminPayload")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

fn validate_email(email: &str) -> Result<()> {
    let Some((local, domain)) = email.split_once('@') else {
        bail!("email {email:?} must contain @");
    };
    if local.is_empty() || domain.is_empty() {
        bail!("email {email:?} is missing a local part or domain");
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        bail!("email domain {domain:?} looks incomplete");
    }
    if email.chars().any(char::is_whitespace) {
        bail!("email {email:?} must not contain spaces");
    }
    Ok(())
}
