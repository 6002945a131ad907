// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use dashpro_app::{DashboardSnapshot, Notification, PreferenceStore, Product, User};
use dashpro_testkit::DashboardFaker;

pub const DEMO_SEED: u64 = 42;

/// Serves the seeded demo records and owns the preference store the UI
/// reads and writes.
pub struct MockRuntime {
    preferences: PreferenceStore,
    faker: DashboardFaker,
}

impl MockRuntime {
    pub fn new(preferences: PreferenceStore, seed: u64) -> Self {
        Self {
            preferences,
            faker: DashboardFaker::new(seed),
        }
    }
}

impl dashpro_tui::AppRuntime for MockRuntime {
    fn load_dashboard(&mut self) -> Result<DashboardSnapshot> {
        Ok(dashpro_testkit::dashboard_snapshot())
    }

    // A fresh faker per load keeps a remounted page identical to the last visit.
    fn load_products(&mut self) -> Result<Vec<Product>> {
        Ok(DashboardFaker::new(self.faker.seed()).products())
    }

    fn load_users(&mut self) -> Result<Vec<User>> {
        Ok(DashboardFaker::new(self.faker.seed()).users())
    }

    fn load_notifications(&mut self) -> Result<Vec<Notification>> {
        Ok(dashpro_testkit::notifications())
    }

    fn preferences(&mut self) -> &mut PreferenceStore {
        &mut self.preferences
    }
}
