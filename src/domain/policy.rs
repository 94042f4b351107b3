use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};

/// Suppresses repeat "cycle complete" firings inside a cooldown window.
///
/// Starts out never-fired, so the first activation is always accepted.
/// The check and the advance of `last_fired_at` happen under one lock,
/// so racing edges cannot both fire.
#[derive(Debug, Default)]
pub struct DebounceTimer {
    last_fired_at: Mutex<Option<DateTime<Utc>>>,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires (and records `now`) only when `now - last_fired_at > cooldown`.
    pub fn try_fire(&self, now: DateTime<Utc>, cooldown: TimeDelta) -> bool {
        let mut last = self
            .last_fired_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(prev) = *last {
            if now.signed_duration_since(prev) <= cooldown {
                return false;
            }
        }

        *last = Some(now);
        true
    }

    pub fn last_fired_at(&self) -> Option<DateTime<Utc>> {
        *self
            .last_fired_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
