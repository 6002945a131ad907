// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::sync::mpsc::Receiver;

use crate::prefs::{PreferenceChange, PreferenceStore};

pub const THEME_KEY: &str = "darkMode";

/// Dark/light choice backed by the preference store.
///
/// Starts from the stored value, or the OS hint when nothing is stored, and
/// follows writes other consumers make to the same key.
#[derive(Debug)]
pub struct ThemePreference {
    dark: bool,
    changes: Receiver<PreferenceChange>,
}

impl ThemePreference {
    pub fn load(store: &mut PreferenceStore, os_prefers_dark: bool) -> Self {
        let dark = store.get(THEME_KEY, os_prefers_dark);
        tracing::debug!(dark, os_prefers_dark, "theme loaded");
        Self {
            dark,
            changes: store.subscribe(THEME_KEY),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    /// Write the current value back. Called once after the first frame so the
    /// resolved choice is stored even when it came from the OS hint.
    pub fn persist(&self, store: &mut PreferenceStore) -> Result<()> {
        store.set(THEME_KEY, Some(&self.dark))
    }

    /// Switch theme and persist right away. The in-memory value changes even
    /// if the write fails.
    pub fn set(&mut self, dark: bool, store: &mut PreferenceStore) -> Result<()> {
        self.dark = dark;
        let result = self.persist(store);
        self.drain();
        result
    }

    pub fn toggle(&mut self, store: &mut PreferenceStore) -> Result<()> {
        self.set(!self.dark, store)
    }

    /// Pick up writes made through other handles. Returns true when the
    /// theme changed.
    pub fn sync(&mut self) -> bool {
        let before = self.dark;
        self.drain();
        self.dark != before
    }

    fn drain(&mut self) {
        while let Ok(change) = self.changes.try_recv() {
            // A removed key leaves the current choice in place until restart.
            if let Some(dark) = change.decode::<bool>() {
                self.dark = dark;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{THEME_KEY, ThemePreference};
    use crate::prefs::{MemoryMedium, PreferenceMedium, PreferenceStore};
    use anyhow::Result;

    #[test]
    fn unset_preference_follows_os_and_persists_after_first_render() -> Result<()> {
        let mut store = PreferenceStore::in_memory();
        let theme = ThemePreference::load(&mut store, true);
        assert!(theme.is_dark());

        theme.persist(&mut store)?;
        assert!(store.get(THEME_KEY, false));
        Ok(())
    }

    #[test]
    fn persisted_value_wins_over_os() -> Result<()> {
        let mut medium = MemoryMedium::new();
        medium.write(THEME_KEY, "false")?;
        let mut store = PreferenceStore::new(medium);
        let theme = ThemePreference::load(&mut store, true);
        assert!(!theme.is_dark());
        Ok(())
    }

    #[test]
    fn toggle_persists_immediately() -> Result<()> {
        let mut store = PreferenceStore::in_memory();
        let mut theme = ThemePreference::load(&mut store, false);
        theme.toggle(&mut store)?;
        assert!(theme.is_dark());
        assert!(store.get(THEME_KEY, false));

        theme.toggle(&mut store)?;
        assert!(!store.get(THEME_KEY, true));
        Ok(())
    }

    #[test]
    fn two_handles_stay_consistent() -> Result<()> {
        let mut store = PreferenceStore::in_memory();
        let mut first = ThemePreference::load(&mut store, false);
        let mut second = ThemePreference::load(&mut store, false);

        first.set(true, &mut store)?;
        assert!(second.sync());
        assert!(second.is_dark());
        assert!(!first.sync());
        Ok(())
    }
}
