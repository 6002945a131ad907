// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use dashpro_tui::{DEFAULT_DESKTOP_BREAKPOINT, DEFAULT_PAGE_SIZE, UiOptions};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_SEARCH_DEBOUNCE: &str = "300ms";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub ui: Ui,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            ui: Ui::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub desktop_breakpoint: Option<u16>,
    pub page_size: Option<usize>,
    pub search_debounce: Option<String>,
    pub simulate_latency: Option<bool>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            desktop_breakpoint: Some(DEFAULT_DESKTOP_BREAKPOINT),
            page_size: Some(DEFAULT_PAGE_SIZE),
            search_debounce: Some(DEFAULT_SEARCH_DEBOUNCE.to_owned()),
            simulate_latency: Some(true),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("DASHPRO_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set DASHPRO_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(dashpro_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [storage] and [ui]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            dashpro_db::validate_db_path(db_path)?;
        }

        if self.ui.desktop_breakpoint == Some(0) {
            bail!(
                "ui.desktop_breakpoint in {} must be positive, got 0",
                path.display()
            );
        }

        if self.ui.page_size == Some(0) {
            bail!("ui.page_size in {} must be positive, got 0", path.display());
        }

        if let Some(debounce) = &self.ui.search_debounce {
            parse_duration(debounce)
                .with_context(|| format!("ui.search_debounce in {}", path.display()))?;
        }

        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => dashpro_db::default_db_path(),
        }
    }

    pub fn ui_options(&self) -> Result<UiOptions> {
        let search_debounce = parse_duration(
            self.ui
                .search_debounce
                .as_deref()
                .unwrap_or(DEFAULT_SEARCH_DEBOUNCE),
        )?;
        Ok(UiOptions {
            desktop_breakpoint: self
                .ui
                .desktop_breakpoint
                .unwrap_or(DEFAULT_DESKTOP_BREAKPOINT),
            page_size: self.ui.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            search_debounce,
            simulate_latency: self.ui.simulate_latency.unwrap_or(true),
        })
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# dashpro config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/dashpro/dashpro.db)\n# db_path = \"/absolute/path/to/dashpro.db\"\n\n[ui]\n# Terminal columns at which the sidebar docks instead of overlaying.\ndesktop_breakpoint = {}\npage_size = {}\nsearch_debounce = \"{}\"\nsimulate_latency = true\n",
            path.display(),
            DEFAULT_DESKTOP_BREAKPOINT,
            DEFAULT_PAGE_SIZE,
            DEFAULT_SEARCH_DEBOUNCE,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        let secs = mins
            .checked_mul(60)
            .ok_or_else(|| anyhow!("duration {raw:?} is too large"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 300ms or 1s)")
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration};
    use anyhow::Result;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);

        let options = config.ui_options()?;
        assert_eq!(options.desktop_breakpoint, 100);
        assert_eq!(options.page_size, 8);
        assert_eq!(options.search_debounce, Duration::from_millis(300));
        assert!(options.simulate_latency);
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[ui]\npage_size = 10\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[storage] and [ui]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[ui]\ndesktop_breakpoint = 120\npage_size = 5\nsearch_debounce = \"1s\"\nsimulate_latency = false\n",
        )?;

        let options = Config::load(&path)?.ui_options()?;
        assert_eq!(options.desktop_breakpoint, 120);
        assert_eq!(options.page_size, 5);
        assert_eq!(options.search_debounce, Duration::from_secs(1));
        assert!(!options.simulate_latency);
        Ok(())
    }

    #[test]
    fn partial_ui_section_keeps_other_defaults() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\npage_size = 12\n")?;
        let options = Config::load(&path)?.ui_options()?;
        assert_eq!(options.page_size, 12);
        assert_eq!(options.desktop_breakpoint, 100);
        assert_eq!(options.search_debounce, Duration::from_millis(300));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn zero_sizes_are_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\npage_size = 0\n")?;
        let error = Config::load(&path).expect_err("zero page size should fail");
        assert!(error.to_string().contains("ui.page_size"));

        let (_temp, path) = write_config("version = 1\n[ui]\ndesktop_breakpoint = 0\n")?;
        let error = Config::load(&path).expect_err("zero breakpoint should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn bad_debounce_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nsearch_debounce = \"soon\"\n")?;
        let error = Config::load(&path).expect_err("bad debounce should fail");
        let message = format!("{error:#}");
        assert!(message.contains("ui.search_debounce"));
        assert!(message.contains("invalid duration"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("DASHPRO_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("DASHPRO_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn db_path_prefers_storage_config_over_env_override() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) =
            write_config("version = 1\n[storage]\ndb_path = \"/explicit/from-config.db\"\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("DASHPRO_DB_PATH", "/from/env.db");
        }
        let config = Config::load(&path)?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("DASHPRO_DB_PATH");
        }
        assert_eq!(config.db_path()?, PathBuf::from("/explicit/from-config.db"));
        Ok(())
    }

    #[test]
    fn db_path_uses_env_override_when_storage_db_path_missing() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("DASHPRO_DB_PATH", "/from/env-only.db");
        }
        let config = Config::load(&path)?;
        let resolved = config.db_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("DASHPRO_DB_PATH");
        }
        assert_eq!(resolved, PathBuf::from("/from/env-only.db"));
        Ok(())
    }

    #[test]
    fn db_path_rejects_uri_style_storage_value() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[storage]\ndb_path = \"https://evil.example/dashpro.db\"\n",
        )?;
        let error = Config::load(&path).expect_err("URI db_path should fail validation");
        assert!(error.to_string().contains("looks like a URI"));
        Ok(())
    }

    #[test]
    fn durations_parse_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("300ms")?, Duration::from_millis(300));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        assert!(parse_duration("oops").is_err());
        Ok(())
    }

    #[test]
    fn huge_minute_counts_error_instead_of_wrapping() {
        let raw = format!("{}m", u64::MAX / 10);
        let error = parse_duration(&raw).expect_err("overflowing minutes should fail");
        assert!(error.to_string().contains("too large"));
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, Config::example_config(&path))?;
        let options = Config::load(&path)?.ui_options()?;
        assert_eq!(options.page_size, 8);
        Ok(())
    }
}
