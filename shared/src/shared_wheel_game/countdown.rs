use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::COUNTDOWN_TICK_MS;

/// Remaining cooldown split for display, each part zero-padded to two digits.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Countdown {
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.hours, self.minutes, self.seconds)
    }
}

/// Floors `remaining_ms` to whole seconds. Returns `None` once nothing is left.
pub fn format_countdown(remaining_ms: i64) -> Option<Countdown> {
    if remaining_ms <= 0 {
        return None;
    }
    let total_seconds = remaining_ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    Some(Countdown {
        hours: format!("{:02}", hours),
        minutes: format!("{:02}", minutes),
        seconds: format!("{:02}", seconds),
    })
}

/// Tick-driven cooldown display state.
///
/// Only the end instant is stored; every tick recomputes from it, so a late or
/// skipped tick never makes the display drift from the wall clock. Callers
/// tick every [`COUNTDOWN_TICK_MS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CooldownTimer {
    ends_at_ms: Option<i64>,
}

impl CooldownTimer {
    pub fn new(ends_at_ms: Option<i64>) -> Self {
        Self { ends_at_ms }
    }

    pub fn start(&mut self, ends_at_ms: i64) {
        self.ends_at_ms = Some(ends_at_ms);
    }

    /// Called when history is reset elsewhere. Stops the ticking.
    pub fn clear(&mut self) {
        self.ends_at_ms = None;
    }

    pub fn is_active(&self) -> bool {
        self.ends_at_ms.is_some()
    }

    pub fn tick_interval_ms(&self) -> u64 {
        COUNTDOWN_TICK_MS
    }

    pub fn ends_at_ms(&self) -> Option<i64> {
        self.ends_at_ms
    }

    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        self.ends_at_ms.map_or(0, |ends_at| (ends_at - now_ms).max(0))
    }

    /// Returns the countdown to show at `now_ms`. The timer stops itself once
    /// the end instant passes.
    pub fn tick(&mut self, now_ms: i64) -> Option<Countdown> {
        let countdown = format_countdown(self.remaining_ms(now_ms));
        if countdown.is_none() {
            self.ends_at_ms = None;
        }
        countdown
    }
}
