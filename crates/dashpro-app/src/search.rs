// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::time::{Duration, Instant};

use crate::timer::Debouncer;

/// Text box state for a list search. Keystrokes are debounced before they
/// reach the list; clearing goes through immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInput {
    text: String,
    placeholder: &'static str,
    debounce: Debouncer<String>,
}

impl SearchInput {
    pub fn new(placeholder: &'static str, delay: Duration) -> Self {
        Self {
            text: String::new(),
            placeholder,
            debounce: Debouncer::new(delay),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    /// The clear affordance is only offered while there is text to clear.
    pub fn can_clear(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn insert_char(&mut self, ch: char, now: Instant) {
        self.text.push(ch);
        self.debounce.push(self.text.clone(), now);
    }

    pub fn backspace(&mut self, now: Instant) {
        if self.text.pop().is_some() {
            self.debounce.push(self.text.clone(), now);
        }
    }

    /// Empty the box and hand back the empty query right away, dropping any
    /// keystrokes still waiting out the debounce.
    pub fn clear(&mut self) -> String {
        self.debounce.cancel();
        self.text.clear();
        String::new()
    }

    /// The settled query, once input has been quiet long enough.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        self.debounce.poll(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.next_deadline()
    }
}
