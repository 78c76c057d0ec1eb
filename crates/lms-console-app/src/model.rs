// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Student,
    Instructor,
    Admin,
}

impl UserRole {
    /// Roles offered by the users screen filter, in cycle order.
    pub const FILTERABLE: [Self; 2] = [Self::Student, Self::Instructor];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Instructor => "Instructor",
            Self::Admin => "Admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Student" => Some(Self::Student),
            "Instructor" => Some(Self::Instructor),
            "Admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Tri-state `isActive` filter. `Any` is omitted from the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActiveFilter {
    #[default]
    Any,
    Active,
    Inactive,
}

impl ActiveFilter {
    pub const ALL: [Self; 3] = [Self::Any, Self::Active, Self::Inactive];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "",
            Self::Active => "true",
            Self::Inactive => "false",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "" => Some(Self::Any),
            "true" => Some(Self::Active),
            "false" => Some(Self::Inactive),
            _ => None,
        }
    }

    pub const fn as_query(self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            Self::Active => Some("true"),
            Self::Inactive => Some("false"),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Any => "Any Status",
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Any => Self::Active,
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Any,
        }
    }
}

/// A server-owned entity that the console lists and toggles.
pub trait Record: Clone {
    type Id: Clone + PartialEq + fmt::Display;

    fn id(&self) -> &Self::Id;
    fn is_active(&self) -> bool;
    fn with_active(&self, is_active: bool) -> Self;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Record for User {
    type Id = UserId;

    fn id(&self) -> &UserId {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn with_active(&self, is_active: bool) -> Self {
        Self {
            is_active,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: CourseId,
    pub title: String,
    #[serde(default)]
    pub instructor: Option<InstructorRef>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub enrollment_count: u64,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Course {
    pub fn instructor_name(&self) -> &str {
        self.instructor
            .as_ref()
            .map(|instructor| instructor.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("Instructor Not Found")
    }
}

impl Record for Course {
    type Id = CourseId;

    fn id(&self) -> &CourseId {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn with_active(&self, is_active: bool) -> Self {
        Self {
            is_active,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult<R> {
    #[serde(rename = "data")]
    pub records: Vec<R>,
    pub pagination: Pagination,
}

impl<R: Record> PageResult<R> {
    /// Returns a copy with one record's `is_active` replaced, or `None` when
    /// the id is not on this page. Pagination and siblings are carried over
    /// untouched.
    pub fn with_record_active(&self, id: &R::Id, is_active: bool) -> Option<Self> {
        if !self.records.iter().any(|record| record.id() == id) {
            return None;
        }

        Some(Self {
            records: self
                .records
                .iter()
                .map(|record| {
                    if record.id() == id {
                        record.with_active(is_active)
                    } else {
                        record.clone()
                    }
                })
                .collect(),
            pagination: self.pagination,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: u64,
    pub total_instructors: u64,
    pub total_courses: u64,
    pub total_enrollments: u64,
}

impl DashboardStats {
    pub fn average_enrollments_per_course(&self) -> Option<f64> {
        ratio(self.total_enrollments, self.total_courses)
    }

    pub fn students_per_instructor(&self) -> Option<f64> {
        ratio(self.total_students, self.total_instructors)
    }

    pub fn courses_per_instructor(&self) -> Option<f64> {
        ratio(self.total_courses, self.total_instructors)
    }
}

fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        return None;
    }
    Some(numerator as f64 / denominator as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenKind {
    Dashboard,
    Users,
    Courses,
}

impl ScreenKind {
    pub const ALL: [Self; 3] = [Self::Dashboard, Self::Users, Self::Courses];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Users => "users",
            Self::Courses => "courses",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Users => "User Management",
            Self::Courses => "Course Management",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dashboard" => Some(Self::Dashboard),
            "users" => Some(Self::Users),
            "courses" => Some(Self::Courses),
            _ => None,
        }
    }
}

/// Which secondary criterion a list screen filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriterionKind {
    Category,
    Role,
}

impl CriterionKind {
    pub const fn query_key(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Role => "role",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Role => "role",
        }
    }
}
