// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use dashpro_app::{AppState, PreferenceStore};
use dashpro_db::Store;
use runtime::{DEMO_SEED, MockRuntime};
use std::env;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const MEMORY_DB: &str = ":memory:";

const FLAGS: &[(&str, &str)] = &[
    ("--config <path>", "Read settings from this file instead of the default"),
    ("--demo", "Keep the theme choice in memory; nothing touches disk"),
    ("--check", "Load the config and open the preference store, then exit"),
    ("--print-config-path", "Print where the config file is looked up"),
    ("--print-path", "Print the preference database location"),
    ("--print-example-config", "Print a commented v1 config file"),
    ("-h, --help", "Show this help"),
];

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    init_tracing()?;

    let options = parse_cli_args(env::args().skip(1))?;
    if options.action == Action::Help {
        print!("{}", help_text());
        return Ok(());
    }

    let config_path = match options.config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };
    match options.action {
        Action::PrintConfigPath => {
            println!("{}", config_path.display());
            return Ok(());
        }
        Action::PrintExampleConfig => {
            print!("{}", Config::example_config(&config_path));
            return Ok(());
        }
        _ => {}
    }

    let config = Config::load(&config_path).with_context(|| {
        format!(
            "load config {}; run `dashpro --print-example-config` for a template",
            config_path.display()
        )
    })?;
    let ui_options = config.ui_options()?;
    let db_path = db_path_for(options.demo, &config)?;
    if options.action == Action::PrintDbPath {
        println!("{}", db_path.display());
        return Ok(());
    }

    let preferences = open_preferences(&db_path)?;
    tracing::info!(db = %db_path.display(), demo = options.demo, "preference store ready");
    if options.action == Action::Check {
        return Ok(());
    }

    let mut state = AppState::default();
    let mut runtime = MockRuntime::new(preferences, DEMO_SEED);
    dashpro_tui::run_app(&mut state, &mut runtime, ui_options)
}

fn db_path_for(demo: bool, config: &Config) -> Result<PathBuf> {
    if demo {
        Ok(PathBuf::from(MEMORY_DB))
    } else {
        config.db_path()
    }
}

fn open_preferences(db_path: &Path) -> Result<PreferenceStore> {
    if db_path == Path::new(MEMORY_DB) {
        return Ok(PreferenceStore::in_memory());
    }
    let store = Store::open(db_path).with_context(|| {
        format!(
            "open database {}; set [storage].db_path or DASHPRO_DB_PATH to move it",
            db_path.display()
        )
    })?;
    store.bootstrap()?;
    Ok(PreferenceStore::new(store))
}

// Logging is opt-in and file-only; the terminal belongs to the UI.
fn init_tracing() -> Result<()> {
    let Some(path) = env::var_os("DASHPRO_LOG") else {
        return Ok(());
    };
    let path = PathBuf::from(path);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {} (from DASHPRO_LOG)", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|error| anyhow!("initialise logging: {error}"))
}

/// What a single invocation does. At most one is chosen per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Run,
    Check,
    PrintConfigPath,
    PrintDbPath,
    PrintExampleConfig,
    Help,
}

impl Action {
    fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "--check" => Some(Self::Check),
            "--print-config-path" => Some(Self::PrintConfigPath),
            "--print-path" => Some(Self::PrintDbPath),
            "--print-example-config" => Some(Self::PrintExampleConfig),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    action: Action,
    config_path: Option<PathBuf>,
    demo: bool,
}

fn parse_cli_args<I, S>(args: I) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        action: Action::Run,
        config_path: None,
        demo: false,
    };
    let mut chosen: Option<String> = None;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let arg = arg.as_ref();
        if arg == "-h" || arg == "--help" {
            options.action = Action::Help;
            return Ok(options);
        }
        if arg == "--demo" {
            options.demo = true;
            continue;
        }
        if let Some(value) = arg.strip_prefix("--config=") {
            options.config_path = Some(config_value(value)?);
            continue;
        }
        if arg == "--config" {
            let value = iter
                .next()
                .ok_or_else(|| anyhow!("--config needs a file path"))?;
            options.config_path = Some(config_value(value.as_ref())?);
            continue;
        }

        let Some(action) = Action::from_flag(arg) else {
            bail!("unknown argument {arg:?}; see `dashpro --help`");
        };
        match &chosen {
            Some(previous) if previous != arg => {
                bail!("{previous} and {arg} cannot be combined");
            }
            _ => {
                chosen = Some(arg.to_owned());
                options.action = action;
            }
        }
    }

    Ok(options)
}

fn config_value(value: &str) -> Result<PathBuf> {
    if value.is_empty() {
        bail!("--config needs a file path");
    }
    Ok(PathBuf::from(value))
}

fn help_text() -> String {
    let width = FLAGS.iter().map(|(flag, _)| flag.len()).max().unwrap_or(0);
    let mut text =
        String::from("dashpro - admin dashboard for the terminal\n\nUsage: dashpro [options]\n\n");
    for (flag, about) in FLAGS {
        text.push_str(&format!("  {flag:<width$}  {about}\n"));
    }
    text.push_str("\nSet DASHPRO_LOG=<file> to write logs; RUST_LOG tunes the filter.\n");
    text
}
