// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ActiveFilter, CriterionKind};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Search,
    Criterion,
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    Search(String),
    Criterion(String),
    Status(ActiveFilter),
    Limit(u32),
    Page(u32),
}

impl FilterUpdate {
    pub const fn resets_page(&self) -> bool {
        !matches!(self, Self::Page(_))
    }
}

/// Query parameters for one list screen. Every change other than `page`
/// restarts pagination at page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub criterion: String,
    pub status: ActiveFilter,
    pub criterion_kind: CriterionKind,
}

impl FilterSet {
    pub fn new(criterion_kind: CriterionKind, limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            search: String::new(),
            criterion: String::new(),
            status: ActiveFilter::Any,
            criterion_kind,
        }
    }

    /// Applies one update and reports whether anything changed. A page of 0
    /// and a limit of 0 are rejected.
    pub fn apply(&mut self, update: FilterUpdate) -> bool {
        let before = self.clone();
        let resets_page = update.resets_page();

        match update {
            FilterUpdate::Search(value) => self.search = value,
            FilterUpdate::Criterion(value) => self.criterion = value,
            FilterUpdate::Status(value) => self.status = value,
            FilterUpdate::Limit(value) => {
                if value == 0 {
                    return false;
                }
                self.limit = value.min(MAX_PAGE_SIZE);
            }
            FilterUpdate::Page(value) => {
                if value == 0 {
                    return false;
                }
                self.page = value;
            }
        }

        if resets_page {
            self.page = 1;
        }
        *self != before
    }

    pub fn text(&self, field: FilterField) -> String {
        match field {
            FilterField::Search => self.search.clone(),
            FilterField::Criterion => self.criterion.clone(),
            FilterField::Status => self.status.as_str().to_owned(),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if !self.criterion.is_empty() {
            pairs.push((self.criterion_kind.query_key(), self.criterion.clone()));
        }
        if let Some(status) = self.status.as_query() {
            pairs.push(("isActive", status.to_owned()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterSet, FilterUpdate};
    use crate::{ActiveFilter, CriterionKind};

    fn on_page(page: u32) -> FilterSet {
        let mut filters = FilterSet::new(CriterionKind::Category, 10);
        filters.page = page;
        filters
    }

    #[test]
    fn every_non_page_update_resets_page_to_one() {
        let updates = [
            FilterUpdate::Search("rust".to_owned()),
            FilterUpdate::Criterion("Math".to_owned()),
            FilterUpdate::Status(ActiveFilter::Inactive),
            FilterUpdate::Limit(25),
        ];
        for update in updates {
            let mut filters = on_page(3);
            assert!(filters.apply(update.clone()), "{update:?} should change filters");
            assert_eq!(filters.page, 1, "{update:?} should reset page");
        }
    }

    #[test]
    fn page_update_keeps_other_fields() {
        let mut filters = on_page(1);
        filters.apply(FilterUpdate::Search("go".to_owned()));
        assert!(filters.apply(FilterUpdate::Page(2)));
        assert_eq!(filters.page, 2);
        assert_eq!(filters.search, "go");
    }

    #[test]
    fn page_zero_and_limit_zero_are_rejected() {
        let mut filters = on_page(2);
        assert!(!filters.apply(FilterUpdate::Page(0)));
        assert!(!filters.apply(FilterUpdate::Limit(0)));
        assert_eq!(filters.page, 2);
        assert_eq!(filters.limit, 10);
    }

    #[test]
    fn identical_value_on_first_page_reports_no_change() {
        let mut filters = on_page(1);
        assert!(!filters.apply(FilterUpdate::Search(String::new())));
    }

    #[test]
    fn limit_is_clamped_to_maximum() {
        let mut filters = FilterSet::new(CriterionKind::Role, 500);
        assert_eq!(filters.limit, 100);
        filters.apply(FilterUpdate::Limit(1_000));
        assert_eq!(filters.limit, 100);
    }

    #[test]
    fn query_pairs_omit_empty_values() {
        let filters = FilterSet::new(CriterionKind::Role, 10);
        assert_eq!(
            filters.query_pairs(),
            vec![("page", "1".to_owned()), ("limit", "10".to_owned())]
        );
    }

    #[test]
    fn query_pairs_use_the_screen_criterion_key() {
        let mut users = FilterSet::new(CriterionKind::Role, 10);
        users.apply(FilterUpdate::Criterion("Student".to_owned()));
        users.apply(FilterUpdate::Status(ActiveFilter::Active));
        users.apply(FilterUpdate::Search("ada".to_owned()));
        assert_eq!(
            users.query_pairs(),
            vec![
                ("page", "1".to_owned()),
                ("limit", "10".to_owned()),
                ("search", "ada".to_owned()),
                ("role", "Student".to_owned()),
                ("isActive", "true".to_owned()),
            ]
        );

        let mut courses = FilterSet::new(CriterionKind::Category, 10);
        courses.apply(FilterUpdate::Criterion("Design".to_owned()));
        assert!(courses.query_pairs().contains(&("category", "Design".to_owned())));
    }
}
