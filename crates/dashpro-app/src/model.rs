// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::borrow::Cow;
use time::Date;
use time::macros::format_description;

use crate::ids::*;
use crate::pipeline::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductCategory {
    Electronics,
    Clothing,
    HomeAndKitchen,
}

impl ProductCategory {
    pub const ALL: [Self; 3] = [Self::Electronics, Self::Clothing, Self::HomeAndKitchen];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Clothing => "Clothing",
            Self::HomeAndKitchen => "Home & Kitchen",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::LowStock => "Low Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Editor,
    Viewer,
    User,
}

impl UserRole {
    pub const ALL: [Self; 4] = [Self::Admin, Self::Editor, Self::Viewer, Self::User];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Editor => "Editor",
            Self::Viewer => "Viewer",
            Self::User => "User",
        }
    }

    /// Next entry in the role picker, wrapping from `User` back to `Admin`.
    pub fn next(self) -> Self {
        let index = Self::ALL
            .iter()
            .position(|role| *role == self)
            .unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Pending,
    Inactive,
}

impl UserStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Pending => "Pending",
            Self::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Order,
    Payment,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Dashboard,
    Products,
    Users,
}

impl PageKind {
    pub const ALL: [Self; 3] = [Self::Dashboard, Self::Products, Self::Users];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Products => "Products",
            Self::Users => "Users",
        }
    }

    pub const fn route(self) -> &'static str {
        match self {
            Self::Dashboard => "/dashboard",
            Self::Products => "/products",
            Self::Users => "/users",
        }
    }
}

/// Sidebar destinations. Only the first three have a page behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Dashboard,
    Products,
    Users,
    Analytics,
    Settings,
    Help,
}

impl NavItem {
    pub const ALL: [Self; 6] = [
        Self::Dashboard,
        Self::Products,
        Self::Users,
        Self::Analytics,
        Self::Settings,
        Self::Help,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Products => "Products",
            Self::Users => "Users",
            Self::Analytics => "Analytics",
            Self::Settings => "Settings",
            Self::Help => "Help & Support",
        }
    }

    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Dashboard => "▦",
            Self::Products => "▣",
            Self::Users => "☺",
            Self::Analytics => "▥",
            Self::Settings => "⚙",
            Self::Help => "?",
        }
    }

    pub const fn page(self) -> Option<PageKind> {
        match self {
            Self::Dashboard => Some(PageKind::Dashboard),
            Self::Products => Some(PageKind::Products),
            Self::Users => Some(PageKind::Users),
            Self::Analytics | Self::Settings | Self::Help => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub category: ProductCategory,
    pub price_cents: i64,
    pub stock: u32,
    pub status: StockStatus,
    pub description: String,
    pub created_at: Date,
}

impl Product {
    pub fn price_label(&self) -> String {
        format_price(self.price_cents)
    }
}

impl Record for Product {
    const FIELDS: &'static [&'static str] = &[
        "name",
        "sku",
        "category",
        "price",
        "stock",
        "status",
        "description",
    ];

    fn id(&self) -> i64 {
        self.id.get()
    }

    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "name" => Some(Cow::Borrowed(&self.name)),
            "sku" => Some(Cow::Borrowed(&self.sku)),
            "category" => Some(Cow::Borrowed(self.category.as_str())),
            "price" => Some(Cow::Owned(self.price_label())),
            "stock" => Some(Cow::Owned(self.stock.to_string())),
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "description" => Some(Cow::Borrowed(&self.description)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub joined: Date,
    pub last_active: String,
}

impl User {
    pub fn joined_label(&self) -> String {
        format_date(self.joined)
    }
}

impl Record for User {
    const FIELDS: &'static [&'static str] = &[
        "name", "username", "email", "phone", "role", "status", "joined",
    ];

    fn id(&self) -> i64 {
        self.id.get()
    }

    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "name" => Some(Cow::Borrowed(&self.name)),
            "username" => Some(Cow::Borrowed(&self.username)),
            "email" => Some(Cow::Borrowed(&self.email)),
            "phone" => Some(Cow::Borrowed(&self.phone)),
            "role" => Some(Cow::Borrowed(self.role.as_str())),
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "joined" => Some(Cow::Owned(self.joined_label())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub id: ActivityId,
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    pub time_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStat {
    pub label: String,
    pub value: String,
    pub change_percent: f64,
    pub description: String,
    pub positive: bool,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetric {
    pub label: String,
    pub value: String,
    pub change: String,
    pub positive: bool,
}

impl PerformanceMetric {
    /// Bar fill in percent: the leading number of `value` times ten, capped at 100.
    pub fn bar_percent(&self) -> u16 {
        let numeric = leading_number(&self.value).unwrap_or(0.0).abs();
        (numeric * 10.0).min(100.0).round() as u16
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTile {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub text: String,
    pub time_label: String,
    pub read: bool,
}

pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardSnapshot {
    pub stats: Vec<DashboardStat>,
    pub activity: Vec<Activity>,
    pub metrics: Vec<PerformanceMetric>,
    pub tiles: Vec<SummaryTile>,
}

pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

fn leading_number(value: &str) -> Option<f64> {
    let trimmed = value.trim_start_matches(|c: char| c == '$' || c == '+');
    let end = trimmed
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.' || *c == '-' || *c == ','))
        .map_or(trimmed.len(), |(index, _)| index);
    trimmed[..end].replace(',', "").parse().ok()
}
