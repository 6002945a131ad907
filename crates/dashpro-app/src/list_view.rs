// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::pipeline::PageView;

/// What the list body shows, decided before any row is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListBody<'a, R> {
    Loading,
    Empty(&'static str),
    Rows(Vec<&'a R>),
}

pub fn list_body<'a, R>(
    view: &PageView<'a, R>,
    loading: bool,
    empty_message: &'static str,
) -> ListBody<'a, R> {
    if loading {
        ListBody::Loading
    } else if view.is_empty() {
        ListBody::Empty(empty_message)
    } else {
        ListBody::Rows(view.page_records.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    First,
    Prev,
    Next,
    Last,
}

impl PageControl {
    pub const ALL: [Self; 4] = [Self::First, Self::Prev, Self::Next, Self::Last];

    pub const fn label(self) -> &'static str {
        match self {
            Self::First => "«",
            Self::Prev => "‹",
            Self::Next => "›",
            Self::Last => "»",
        }
    }

    /// Page this control asks for. May fall outside the valid range; the list
    /// ignores such requests.
    pub fn target(self, current_page: usize, total_pages: usize) -> usize {
        match self {
            Self::First => 1,
            Self::Prev => current_page.saturating_sub(1),
            Self::Next => current_page + 1,
            Self::Last => total_pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationControls {
    pub current_page: usize,
    pub total_pages: usize,
    pub summary: String,
}

impl PaginationControls {
    /// Controls for `view`, or `None` when everything fits on one page.
    pub fn for_view<R>(view: &PageView<'_, R>) -> Option<Self> {
        if view.total_pages <= 1 {
            return None;
        }
        Some(Self {
            current_page: view.current_page,
            total_pages: view.total_pages,
            summary: format!(
                "Showing {} to {} of {} results",
                view.start_index, view.end_index, view.total_items
            ),
        })
    }

    pub fn enabled(&self, control: PageControl) -> bool {
        match control {
            PageControl::First | PageControl::Prev => self.current_page > 1,
            PageControl::Next | PageControl::Last => self.current_page < self.total_pages,
        }
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages)
    }
}
