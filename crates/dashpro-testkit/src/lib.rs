// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use dashpro_app::{
    Activity, ActivityId, ActivityKind, DashboardSnapshot, DashboardStat, Notification,
    NotificationId, PerformanceMetric, Product, ProductCategory, ProductId, StockStatus,
    SummaryTile, Trend, User, UserId, UserRole, UserStatus,
};
use std::path::PathBuf;
use time::macros::date;
use time::{Date, Month};

pub const PRODUCT_COUNT: usize = 24;
pub const USER_COUNT: usize = 32;

const FIRST_NAMES: [&str; 8] = [
    "Alex", "Jordan", "Taylor", "Morgan", "Casey", "Riley", "Avery", "Quinn",
];

const LAST_NAMES: [&str; 8] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
];

const EMAIL_DOMAINS: [&str; 4] = ["example.com", "test.com", "demo.com", "mail.com"];

const PRODUCT_DESCRIPTION: &str = "High-quality product with excellent features";
const PRODUCT_CREATED: Date = date!(2024 - 01 - 15);

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded source of dashboard demo data. Fixed-shape fields (names, SKUs,
/// categories, roles) follow the record index; prices, stock, statuses and
/// dates come from the seed.
#[derive(Debug, Clone)]
pub struct DashboardFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl DashboardFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn products(&mut self) -> Vec<Product> {
        (0..PRODUCT_COUNT).map(|index| self.product(index)).collect()
    }

    pub fn product(&mut self, index: usize) -> Product {
        let number = index as i64 + 1;
        let stock = self.rng.int_n(100) as u32;
        let status = if self.rng.int_n(10) >= 7 {
            StockStatus::OutOfStock
        } else if self.rng.int_n(10) >= 4 {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        };

        Product {
            id: ProductId::new(number),
            name: format!("Product {number}"),
            sku: format!("SKU-{}", 1000 + index),
            category: ProductCategory::ALL[index % ProductCategory::ALL.len()],
            price_cents: self.int_range(2_000, 51_999),
            stock,
            status,
            description: PRODUCT_DESCRIPTION.to_owned(),
            created_at: PRODUCT_CREATED,
        }
    }

    pub fn users(&mut self) -> Vec<User> {
        (0..USER_COUNT).map(|index| self.user(index)).collect()
    }

    pub fn user(&mut self, index: usize) -> User {
        let first = FIRST_NAMES[index % FIRST_NAMES.len()];
        let last = LAST_NAMES[(index / FIRST_NAMES.len()) % LAST_NAMES.len()];
        let domain = EMAIL_DOMAINS[index % EMAIL_DOMAINS.len()];
        let handle = format!("{}.{}", first.to_lowercase(), last.to_lowercase());

        let status = if self.rng.int_n(10) >= 8 {
            UserStatus::Inactive
        } else if self.rng.int_n(10) >= 6 {
            UserStatus::Pending
        } else {
            UserStatus::Active
        };

        User {
            id: UserId::new(index as i64 + 1),
            name: format!("{first} {last}"),
            email: format!("{handle}@{domain}"),
            username: handle,
            phone: format!("+1 (555) {}-{}", 100 + index, 1000 + index),
            role: UserRole::ALL[index % UserRole::ALL.len()],
            status,
            joined: self.joined_date(),
            last_active: format!("{}h ago", self.rng.int_n(24)),
        }
    }

    fn joined_date(&mut self) -> Date {
        let month = Month::try_from(self.int_range(1, 9) as u8).unwrap_or(Month::January);
        let day = self.int_range(1, 28) as u8;
        Date::from_calendar_date(2024, month, day).unwrap_or(PRODUCT_CREATED)
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

pub fn recent_activity() -> Vec<Activity> {
    [
        (
            ActivityKind::Order,
            "New order placed",
            "Order #ORD-78945 from John Smith",
            "5 min ago",
        ),
        (
            ActivityKind::Payment,
            "Payment received",
            "$1,250.00 from Acme Inc.",
            "1 hour ago",
        ),
        (
            ActivityKind::User,
            "New user registered",
            "Taylor Swift joined the platform",
            "2 hours ago",
        ),
        (
            ActivityKind::Order,
            "Order shipped",
            "Order #ORD-78944 has been shipped",
            "1 day ago",
        ),
        (
            ActivityKind::Payment,
            "Subscription renewed",
            "Premium plan - Annual subscription",
            "2 days ago",
        ),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (kind, title, description, time_label))| Activity {
        id: ActivityId::new(index as i64 + 1),
        kind,
        title: title.to_owned(),
        description: description.to_owned(),
        time_label: time_label.to_owned(),
    })
    .collect()
}

pub fn dashboard_stats() -> Vec<DashboardStat> {
    [
        ("Total Revenue", "$45,231.89", 20.1),
        ("New Customers", "2,350", 180.1),
        ("Products Sold", "12,234", -19.0),
        ("Active Users", "573", 12.5),
    ]
    .into_iter()
    .map(|(label, value, change_percent)| DashboardStat {
        label: label.to_owned(),
        value: value.to_owned(),
        change_percent,
        description: "vs last month".to_owned(),
        positive: change_percent >= 0.0,
        trend: if change_percent >= 0.0 {
            Trend::Up
        } else {
            Trend::Down
        },
    })
    .collect()
}

pub fn performance_metrics() -> Vec<PerformanceMetric> {
    [
        ("Conversion Rate", "3.2%", "+0.5%"),
        ("Avg. Order Value", "$128.45", "+$12.30"),
        ("Customer Satisfaction", "94%", "+2%"),
        ("Churn Rate", "2.1%", "-0.3%"),
    ]
    .into_iter()
    .map(|(label, value, change)| PerformanceMetric {
        label: label.to_owned(),
        value: value.to_owned(),
        change: change.to_owned(),
        // A falling churn rate is good news.
        positive: true,
    })
    .collect()
}

pub fn summary_tiles() -> Vec<SummaryTile> {
    [
        ("Uptime", "98.5%"),
        ("Total Users", "4,892"),
        ("Total Products", "1,247"),
    ]
    .into_iter()
    .map(|(label, value)| SummaryTile {
        label: label.to_owned(),
        value: value.to_owned(),
    })
    .collect()
}

pub fn dashboard_snapshot() -> DashboardSnapshot {
    DashboardSnapshot {
        stats: dashboard_stats(),
        activity: recent_activity(),
        metrics: performance_metrics(),
        tiles: summary_tiles(),
    }
}

pub fn notifications() -> Vec<Notification> {
    [
        ("New user registered", "5 min ago", false),
        ("Sales target achieved", "1 hour ago", false),
        ("System update available", "2 days ago", true),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (text, time_label, read))| Notification {
        id: NotificationId::new(index as i64 + 1),
        text: text.to_owned(),
        time_label: time_label.to_owned(),
        read,
    })
    .collect()
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("dashpro.db");
    Ok((dir, db_path))
}
