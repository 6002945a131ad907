// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaQuery {
    MinWidth(u16),
    PrefersDark,
}

impl MediaQuery {
    pub fn evaluate(self, signals: ViewportSignals) -> bool {
        match self {
            Self::MinWidth(columns) => signals.width >= columns,
            Self::PrefersDark => signals.prefers_dark,
        }
    }
}

/// What the platform currently reports about the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportSignals {
    pub width: u16,
    pub height: u16,
    pub prefers_dark: bool,
}

#[derive(Debug)]
struct Listener {
    query: MediaQuery,
    matches: bool,
    tx: Sender<bool>,
}

#[derive(Debug)]
struct Registry {
    signals: ViewportSignals,
    listeners: BTreeMap<u64, Listener>,
    next_id: u64,
}

impl Registry {
    fn broadcast(&mut self) {
        let signals = self.signals;
        self.listeners.retain(|id, listener| {
            let matches = listener.query.evaluate(signals);
            if matches == listener.matches {
                return true;
            }
            listener.matches = matches;
            let delivered = listener.tx.send(matches).is_ok();
            if !delivered {
                tracing::debug!(listener = id, "viewport listener gone, pruning");
            }
            delivered
        });
    }
}

/// Source of viewport change events. Cheap to clone; clones share listeners.
#[derive(Debug, Clone)]
pub struct Viewport {
    inner: Rc<RefCell<Registry>>,
}

impl Viewport {
    pub fn new(signals: ViewportSignals) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                signals,
                listeners: BTreeMap::new(),
                next_id: 0,
            })),
        }
    }

    pub fn signals(&self) -> ViewportSignals {
        self.inner.borrow().signals
    }

    /// Start watching `query`. The initial answer is computed immediately.
    /// The listener goes away when the returned observer is dropped.
    pub fn observe(&self, query: MediaQuery) -> MediaQueryObserver {
        let mut registry = self.inner.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let matches = query.evaluate(registry.signals);
        let (tx, rx) = mpsc::channel();
        registry.listeners.insert(id, Listener { query, matches, tx });

        MediaQueryObserver {
            id,
            query,
            matches,
            rx,
            registry: Rc::downgrade(&self.inner),
        }
    }

    pub fn resize(&self, width: u16, height: u16) {
        let mut registry = self.inner.borrow_mut();
        registry.signals.width = width;
        registry.signals.height = height;
        registry.broadcast();
    }

    #[cfg(test)]
    fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

#[derive(Debug)]
pub struct MediaQueryObserver {
    id: u64,
    query: MediaQuery,
    matches: bool,
    rx: Receiver<bool>,
    registry: Weak<RefCell<Registry>>,
}

impl MediaQueryObserver {
    pub fn query(&self) -> MediaQuery {
        self.query
    }

    pub fn matches(&self) -> bool {
        self.matches
    }

    /// Drain queued change events. Returns the new answer when it differs
    /// from the last one this observer reported.
    pub fn poll_change(&mut self) -> Option<bool> {
        let before = self.matches;
        while let Ok(matches) = self.rx.try_recv() {
            self.matches = matches;
        }
        (self.matches != before).then_some(self.matches)
    }
}

impl Drop for MediaQueryObserver {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        match registry.try_borrow_mut() {
            Ok(mut registry) => {
                registry.listeners.remove(&self.id);
            }
            // The next broadcast prunes it once the send fails.
            Err(_) => tracing::warn!(
                listener = self.id,
                "viewport busy while dropping observer; listener removal deferred"
            ),
        }
    }
}

/// Read the terminal's light/dark hint from `COLORFGBG` ("fg;bg" or
/// "fg;default;bg"). Background indices 0-6 and 8 are dark colours.
pub fn prefers_dark_from_colorfgbg(value: Option<&str>) -> bool {
    let Some(value) = value else {
        return false;
    };
    let Some(background) = value.rsplit(';').next() else {
        return false;
    };
    matches!(background.trim().parse::<u8>(), Ok(0..=6 | 8))
}
