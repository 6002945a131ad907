// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::time::{Duration, Instant};

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// A single-shot deadline owned by whoever scheduled it.
///
/// Nothing runs on its own: the owner polls with the current instant and acts
/// when `fire` reports the deadline passed. Dropping or cancelling the handle
/// guarantees it never fires.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduledTask {
    due: Option<Instant>,
}

impl ScheduledTask {
    pub fn at(due: Instant) -> Self {
        Self { due: Some(due) }
    }

    pub fn after(now: Instant, delay: Duration) -> Self {
        Self::at(now + delay)
    }

    pub fn due(&self) -> Option<Instant> {
        self.due
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    /// Consume the deadline if it has passed. Fires at most once.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

/// Coalesces a stream of values, releasing the latest once input has been
/// quiet for `delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, ScheduledTask)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace any pending value and restart the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, ScheduledTask::after(now, self.delay)));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().and_then(|(_, task)| task.due())
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = self
            .pending
            .as_mut()
            .is_some_and(|(_, task)| task.fire(now));
        if ready {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }
}

/// Earliest of a set of optional deadlines.
pub fn earliest(deadlines: impl IntoIterator<Item = Option<Instant>>) -> Option<Instant> {
    deadlines.into_iter().flatten().min()
}
