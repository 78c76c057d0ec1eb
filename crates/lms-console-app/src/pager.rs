// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Pagination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Previous,
    Next,
}

/// Pager controls derived from server pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub current_page: u32,
    pub total_pages: u32,
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

impl Pager {
    /// `None` when there is at most one page; the pager is not shown then.
    pub fn for_pagination(pagination: &Pagination) -> Option<Self> {
        if pagination.total_pages <= 1 {
            return None;
        }
        Some(Self {
            current_page: pagination.current_page,
            total_pages: pagination.total_pages,
            previous_enabled: pagination.has_previous_page,
            next_enabled: pagination.has_next_page,
        })
    }

    pub fn target(&self, direction: PageDirection) -> Option<u32> {
        let (enabled, requested) = match direction {
            PageDirection::Previous => (self.previous_enabled, self.current_page.checked_sub(1)?),
            PageDirection::Next => (self.next_enabled, self.current_page.checked_add(1)?),
        };
        if !enabled || !page_in_bounds(requested, Some(self.total_pages)) {
            return None;
        }
        Some(requested)
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages)
    }
}

/// Pages are 1-based. Without known pagination only the lower bound applies.
pub fn page_in_bounds(requested: u32, total_pages: Option<u32>) -> bool {
    if requested < 1 {
        return false;
    }
    match total_pages {
        Some(total) => requested <= total,
        None => true,
    }
}
