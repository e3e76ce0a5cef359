//! Alarm signal polling discipline.
//!
//! Each channel owns one [`AlarmMonitor`]. It folds every poll result into
//! the last-known alarm state and reports only what changed:
//!
//! - an edge when `monitoring` flips between two successful polls,
//! - a reachability transition when the authority goes away or comes back.
//!
//! A failed poll never changes `alarm_active`; the last known value sticks
//! until the authority answers again. Before the first successful poll the
//! authority counts as unreachable and the alarm as inactive.

use embassy_time::{Duration, Instant};
use serde::Deserialize;

use crate::error::AuthorityError;

/// Snapshot read from the alarm authority.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct AlarmSignal {
    #[serde(default)]
    pub monitoring: bool,
    #[serde(default, alias = "hora_alarma")]
    pub alarm_time: Option<String>,
}

impl AlarmSignal {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn ringing(alarm_time: impl Into<String>) -> Self {
        Self {
            monitoring: true,
            alarm_time: Some(alarm_time.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmEdge {
    Activated,
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    Lost(AuthorityError),
    Restored,
}

/// What one poll changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollReport {
    pub edge: Option<AlarmEdge>,
    pub reachability: Option<Reachability>,
}

impl PollReport {
    pub fn is_quiet(&self) -> bool {
        self.edge.is_none() && self.reachability.is_none()
    }
}

pub struct AlarmMonitor {
    interval: Duration,
    alarm_active: bool,
    alarm_time: Option<String>,
    /// `None` until the first poll completes.
    reachable: Option<bool>,
    last_poll_at: Option<Instant>,
    polls: u64,
}

impl AlarmMonitor {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            alarm_active: false,
            alarm_time: None,
            reachable: None,
            last_poll_at: None,
            polls: 0,
        }
    }

    /// Whether a poll is due at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_poll_at {
            None => true,
            Some(last) => now
                .checked_duration_since(last)
                .is_some_and(|elapsed| elapsed >= self.interval),
        }
    }

    pub fn observe(
        &mut self,
        now: Instant,
        result: Result<AlarmSignal, AuthorityError>,
    ) -> PollReport {
        self.last_poll_at = Some(now);
        self.polls = self.polls.wrapping_add(1);

        match result {
            Ok(signal) => {
                let reachability = (self.reachable != Some(true)).then_some(Reachability::Restored);
                self.reachable = Some(true);

                let edge = match (self.alarm_active, signal.monitoring) {
                    (false, true) => Some(AlarmEdge::Activated),
                    (true, false) => Some(AlarmEdge::Cleared),
                    _ => None,
                };
                self.alarm_active = signal.monitoring;
                self.alarm_time = signal.alarm_time;

                PollReport { edge, reachability }
            }
            Err(e) => {
                let reachability = (self.reachable != Some(false)).then_some(Reachability::Lost(e));
                self.reachable = Some(false);
                PollReport {
                    edge: None,
                    reachability,
                }
            }
        }
    }

    pub fn alarm_active(&self) -> bool {
        self.alarm_active
    }

    pub fn alarm_time(&self) -> Option<&str> {
        self.alarm_time.as_deref()
    }

    pub fn authority_reachable(&self) -> bool {
        self.reachable == Some(true)
    }

    pub fn last_poll_at(&self) -> Option<Instant> {
        self.last_poll_at
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }
}
