// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use dashpro_app::{
    DASHBOARD_LOAD_DELAY, DashboardSnapshot, PRODUCTS_LOAD_DELAY, PageContainer, PageControl,
    PageKind, Product, Record, ScheduledTask, SearchInput, StockStatus, USERS_LOAD_DELAY, User,
    UserRole, UserStatus, earliest,
};
use ratatui::layout::Constraint;
use std::time::{Duration, Instant};

use crate::UiOptions;
use crate::palette::Tone;

const STOCK_BAR_WIDTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TableCell {
    pub text: String,
    pub detail: Option<String>,
    pub tone: Tone,
}

impl TableCell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            detail: None,
            tone: Tone::Plain,
        }
    }

    fn with_detail(text: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            detail: Some(detail.into()),
            tone: Tone::Plain,
        }
    }

    fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            detail: None,
            tone,
        }
    }
}

/// How a record type is laid out as a table row on its list page.
pub(crate) trait TableRow: Record {
    const HEADERS: &'static [&'static str];
    const SEARCH_FIELDS: &'static [&'static str];
    const PLACEHOLDER: &'static str;
    const EMPTY_MESSAGE: &'static str;
    const CONFIRM_DELETE: &'static str;

    fn widths() -> Vec<Constraint>;
    fn title(&self) -> &str;
    fn cells(&self) -> Vec<TableCell>;
}

impl TableRow for Product {
    const HEADERS: &'static [&'static str] = &["Product", "Category", "Price", "Stock", "Status"];
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "category", "sku"];
    const PLACEHOLDER: &'static str = "Search products by name, SKU, or category...";
    const EMPTY_MESSAGE: &'static str = "No products found. Try adjusting your search.";
    const CONFIRM_DELETE: &'static str = "Are you sure you want to delete this product?";

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Min(18),
            Constraint::Length(16),
            Constraint::Length(10),
            Constraint::Length(11),
            Constraint::Length(14),
        ]
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn cells(&self) -> Vec<TableCell> {
        vec![
            TableCell::with_detail(self.name.clone(), self.sku.clone()),
            TableCell::plain(self.category.as_str()),
            TableCell::plain(self.price_label()),
            TableCell::toned(stock_bar(self.stock), stock_tone(self.stock)),
            TableCell::toned(self.status.as_str(), stock_status_tone(self.status)),
        ]
    }
}

impl TableRow for User {
    const HEADERS: &'static [&'static str] = &["User", "Contact", "Role", "Status", "Joined"];
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email", "role"];
    const PLACEHOLDER: &'static str = "Search users by name, email, or role...";
    const EMPTY_MESSAGE: &'static str = "No users found. Try adjusting your search.";
    const CONFIRM_DELETE: &'static str = "Are you sure you want to delete this user?";

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Min(18),
            Constraint::Min(24),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(11),
        ]
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn cells(&self) -> Vec<TableCell> {
        vec![
            TableCell::with_detail(self.name.clone(), format!("@{}", self.username)),
            TableCell::with_detail(self.email.clone(), self.phone.clone()),
            TableCell::toned(self.role.as_str(), Tone::Accent),
            TableCell::toned(self.status.as_str(), user_status_tone(self.status)),
            TableCell::plain(self.joined_label()),
        ]
    }
}

pub(crate) fn stock_tone(stock: u32) -> Tone {
    if stock > 20 {
        Tone::Success
    } else if stock > 10 {
        Tone::Warning
    } else {
        Tone::Danger
    }
}

fn stock_bar(stock: u32) -> String {
    let filled = (stock.min(100) as usize * STOCK_BAR_WIDTH).div_ceil(100);
    format!(
        "{}{} {stock}",
        "▮".repeat(filled),
        "▯".repeat(STOCK_BAR_WIDTH - filled)
    )
}

fn stock_status_tone(status: StockStatus) -> Tone {
    match status {
        StockStatus::InStock => Tone::Success,
        StockStatus::LowStock => Tone::Warning,
        StockStatus::OutOfStock => Tone::Danger,
    }
}

fn user_status_tone(status: UserStatus) -> Tone {
    match status {
        UserStatus::Active => Tone::Success,
        UserStatus::Pending => Tone::Warning,
        UserStatus::Inactive => Tone::Danger,
    }
}

/// A searchable, paginated list page: the record container plus the bits of
/// UI state that only make sense while the page is mounted.
#[derive(Debug)]
pub(crate) struct ListPage<R> {
    pub container: PageContainer<R>,
    pub search: SearchInput,
    pub selected: usize,
    pub confirm_delete: Option<i64>,
}

impl<R: TableRow> ListPage<R> {
    fn new(options: &UiOptions, load_delay: Duration, now: Instant) -> Result<Self> {
        Ok(Self {
            container: PageContainer::new(options.page_size, R::SEARCH_FIELDS, load_delay, now)?,
            search: SearchInput::new(R::PLACEHOLDER, options.search_debounce),
            selected: 0,
            confirm_delete: None,
        })
    }

    /// Land a due load and any settled search query.
    pub fn poll<F>(&mut self, now: Instant, loader: F) -> Result<()>
    where
        F: FnOnce() -> Result<Vec<R>>,
    {
        let loaded = self.container.poll_load(now, loader);
        if let Some(query) = self.search.poll(now)
            && self.container.set_query(&query)
        {
            self.selected = 0;
        }
        self.clamp_selection();
        loaded.map(|_| ())
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        earliest([self.container.next_deadline(), self.search.next_deadline()])
    }

    pub fn selected_record(&self) -> Option<&R> {
        self.container.view().page_records.get(self.selected).copied()
    }

    fn clamp_selection(&mut self) {
        let rows = self.container.view().page_records.len();
        self.selected = self.selected.min(rows.saturating_sub(1));
    }
}

/// Page-level operations the key handler needs without knowing the record type.
pub(crate) trait ListControls {
    fn type_char(&mut self, ch: char, now: Instant);
    fn backspace(&mut self, now: Instant);
    fn clear_search(&mut self);
    fn move_selection(&mut self, delta: isize);
    fn go_to(&mut self, control: PageControl) -> bool;
    fn confirming(&self) -> Option<&'static str>;
    fn request_delete(&mut self) -> bool;
    fn cancel_delete(&mut self);
    fn confirm_delete(&mut self) -> Option<String>;
}

impl<R: TableRow> ListControls for ListPage<R> {
    fn type_char(&mut self, ch: char, now: Instant) {
        self.search.insert_char(ch, now);
    }

    fn backspace(&mut self, now: Instant) {
        self.search.backspace(now);
    }

    fn clear_search(&mut self) {
        let query = self.search.clear();
        if self.container.set_query(&query) {
            self.selected = 0;
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let rows = self.container.view().page_records.len();
        if rows == 0 {
            return;
        }
        let next = (self.selected as isize + delta).clamp(0, rows as isize - 1);
        self.selected = next as usize;
    }

    fn go_to(&mut self, control: PageControl) -> bool {
        let target = control.target(self.container.current_page(), self.container.total_pages());
        let moved = self.container.request_page(target);
        if moved {
            self.selected = 0;
        }
        moved
    }

    fn confirming(&self) -> Option<&'static str> {
        self.confirm_delete.map(|_| R::CONFIRM_DELETE)
    }

    fn request_delete(&mut self) -> bool {
        self.confirm_delete = self.selected_record().map(Record::id);
        self.confirm_delete.is_some()
    }

    fn cancel_delete(&mut self) {
        self.confirm_delete = None;
    }

    fn confirm_delete(&mut self) -> Option<String> {
        let id = self.confirm_delete.take()?;
        let removed = self.container.delete(id)?;
        self.clamp_selection();
        Some(format!("deleted {}", removed.title()))
    }
}

impl ListPage<User> {
    /// Cycle the selected user's role. Returns the status message to show.
    pub fn cycle_role(&mut self) -> Option<String> {
        let (id, role) = self
            .selected_record()
            .map(|user| (user.id.get(), user.role.next()))?;
        let mut name = String::new();
        self.container.update(id, |user| {
            user.role = role;
            name = user.name.clone();
        });
        self.clamp_selection();
        Some(format!("{name} is now {}", role.as_str()))
    }

    pub fn role_counts(&self) -> UserCounts {
        let records = self.container.records();
        UserCounts {
            total: records.len(),
            active: records
                .iter()
                .filter(|user| user.status == UserStatus::Active)
                .count(),
            admins: records
                .iter()
                .filter(|user| user.role == UserRole::Admin)
                .count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UserCounts {
    pub total: usize,
    pub active: usize,
    pub admins: usize,
}

#[derive(Debug)]
pub(crate) struct DashboardPage {
    pub snapshot: Option<DashboardSnapshot>,
    load: ScheduledTask,
}

impl DashboardPage {
    fn new(load_delay: Duration, now: Instant) -> Self {
        Self {
            snapshot: None,
            load: ScheduledTask::after(now, load_delay),
        }
    }

    /// A failed load still leaves the loading state, with nothing to show.
    pub fn poll<F>(&mut self, now: Instant, loader: F) -> Result<()>
    where
        F: FnOnce() -> Result<DashboardSnapshot>,
    {
        if !self.load.fire(now) {
            return Ok(());
        }
        match loader() {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                Ok(())
            }
            Err(error) => {
                self.snapshot = Some(DashboardSnapshot::default());
                Err(error)
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.load.due()
    }
}

/// The page currently on screen. Replacing it drops the old page together
/// with its pending load and search state.
#[derive(Debug)]
pub(crate) enum MountedPage {
    Dashboard(DashboardPage),
    Products(ListPage<Product>),
    Users(ListPage<User>),
}

impl MountedPage {
    pub fn mount(page: PageKind, options: &UiOptions, now: Instant) -> Result<Self> {
        tracing::debug!(page = page.route(), "mounting page");
        let page = match page {
            PageKind::Dashboard => {
                Self::Dashboard(DashboardPage::new(options.load_delay(DASHBOARD_LOAD_DELAY), now))
            }
            PageKind::Products => Self::Products(ListPage::new(
                options,
                options.load_delay(PRODUCTS_LOAD_DELAY),
                now,
            )?),
            PageKind::Users => Self::Users(ListPage::new(
                options,
                options.load_delay(USERS_LOAD_DELAY),
                now,
            )?),
        };
        Ok(page)
    }

    pub fn kind(&self) -> PageKind {
        match self {
            Self::Dashboard(_) => PageKind::Dashboard,
            Self::Products(_) => PageKind::Products,
            Self::Users(_) => PageKind::Users,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match self {
            Self::Dashboard(page) => page.next_deadline(),
            Self::Products(page) => page.next_deadline(),
            Self::Users(page) => page.next_deadline(),
        }
    }

    pub fn list(&self) -> Option<&dyn ListControls> {
        match self {
            Self::Dashboard(_) => None,
            Self::Products(page) => Some(page),
            Self::Users(page) => Some(page),
        }
    }

    pub fn list_mut(&mut self) -> Option<&mut dyn ListControls> {
        match self {
            Self::Dashboard(_) => None,
            Self::Products(page) => Some(page),
            Self::Users(page) => Some(page),
        }
    }
}
