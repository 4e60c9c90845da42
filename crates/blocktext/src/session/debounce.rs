// Copyright 2026 The Matrix.org Foundation C.I.C.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Quiet-period timers driven by the caller's clock.
//!
//! The core never sleeps or spawns. A [`Debouncer`] only remembers a
//! deadline; the host polls it from its event loop with the current time.

use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use regex::Regex;

static URL_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^:]+://").unwrap());

#[derive(Clone, Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Start the quiet period again from `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Fire on the next poll, whatever the delay.
    pub fn force(&mut self, now: Instant) {
        self.deadline = Some(now);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the deadline passed. Firing clears it.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Submits a URL field once typing in it has paused.
#[derive(Clone, Debug)]
pub struct UrlAutoSubmit {
    timer: Debouncer,
    value: String,
}

impl UrlAutoSubmit {
    pub fn new(delay: Duration) -> Self {
        Self {
            timer: Debouncer::new(delay),
            value: String::new(),
        }
    }

    /// The field changed; wait for another quiet period.
    pub fn change(&mut self, value: impl Into<String>, now: Instant) {
        self.value = value.into();
        self.timer.schedule(now);
    }

    /// The field was submitted explicitly; do not wait.
    pub fn submit(&mut self, value: impl Into<String>, now: Instant) {
        self.value = value.into();
        self.timer.force(now);
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    /// The URL to submit, once the timer fired and the field is not empty.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if self.timer.fire_if_due(now) {
            normalize_url(&self.value)
        } else {
            None
        }
    }
}

/// Give a scheme-less URL an `http://` scheme. Empty input is no URL.
pub fn normalize_url(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else if URL_SCHEME.is_match(value) {
        Some(value.to_owned())
    } else {
        Some(format!("http://{value}"))
    }
}
