// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};

/// String-keyed, string-valued durable storage behind the preference store.
pub trait PreferenceMedium {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Process-local medium for demo mode and tests. Nothing survives exit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryMedium {
    values: BTreeMap<String, String>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceMedium for MemoryMedium {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Delivered to subscribers after a write lands. `raw` is the JSON text now
/// stored, or `None` when the key was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceChange {
    pub key: String,
    pub raw: Option<String>,
}

impl PreferenceChange {
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        self.raw
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}

/// JSON-encoded preferences over a [`PreferenceMedium`], with per-key change
/// notification. Writes go straight to the medium; last write wins.
pub struct PreferenceStore {
    medium: Box<dyn PreferenceMedium>,
    subscribers: BTreeMap<String, Vec<Sender<PreferenceChange>>>,
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("subscribed_keys", &self.subscribers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl PreferenceStore {
    pub fn new(medium: impl PreferenceMedium + 'static) -> Self {
        Self {
            medium: Box::new(medium),
            subscribers: BTreeMap::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryMedium::new())
    }

    /// Read `key`, falling back to `initial` when the value is missing,
    /// unreadable, or does not decode as `T`. Failures are logged, never
    /// returned.
    pub fn get<T: DeserializeOwned>(&self, key: &str, initial: T) -> T {
        let raw = match self.medium.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return initial,
            Err(error) => {
                let error = format!("{error:#}");
                tracing::warn!(key, %error, "preference read failed");
                return initial;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(key, %raw, %error, "stored preference does not decode");
                initial
            }
        }
    }

    /// Persist `value` under `key`; `None` removes the key. Subscribers of
    /// `key` hear about it once the medium accepted the write.
    pub fn set<T: Serialize>(&mut self, key: &str, value: Option<&T>) -> Result<()> {
        let raw = match value {
            Some(value) => {
                let raw = serde_json::to_string(value)
                    .with_context(|| format!("encode preference {key}"))?;
                self.medium
                    .write(key, &raw)
                    .with_context(|| format!("persist preference {key}"))?;
                Some(raw)
            }
            None => {
                self.medium
                    .remove(key)
                    .with_context(|| format!("remove preference {key}"))?;
                None
            }
        };

        tracing::debug!(key, removed = raw.is_none(), "preference written");
        self.notify(PreferenceChange {
            key: key.to_owned(),
            raw,
        });
        Ok(())
    }

    pub fn subscribe(&mut self, key: &str) -> Receiver<PreferenceChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.entry(key.to_owned()).or_default().push(tx);
        rx
    }

    #[cfg(test)]
    fn subscriber_count(&self, key: &str) -> usize {
        self.subscribers.get(key).map_or(0, Vec::len)
    }

    fn notify(&mut self, change: PreferenceChange) {
        let Some(senders) = self.subscribers.get_mut(&change.key) else {
            return;
        };
        senders.retain(|tx| tx.send(change.clone()).is_ok());
        if senders.is_empty() {
            self.subscribers.remove(&change.key);
        }
    }
}
