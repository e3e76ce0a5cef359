//! Debounced dismiss button.
//!
//! ## Hardware
//!
//! Momentary switch on a GPIO input reading high while pressed. The
//! [`EdgeWatcher`](super::edge_watcher::EdgeWatcher) reports rising edges
//! with their timestamp; this module turns them into logical presses.
//!
//! ## Debounce
//!
//! Two phases, so the settle delay can be awaited by the host without
//! holding any state:
//!
//! | Phase         | Input                     | Result                           |
//! |---------------|---------------------------|----------------------------------|
//! | `on_raw_edge` | edge timestamp            | `Suppressed` or `Confirm(press)` |
//! | `confirm`     | pin level after settle    | `Some(ButtonEvent)` or `None`    |
//!
//! The cooldown window is consumed by `on_raw_edge`. A bounce that fails
//! confirmation still holds the window closed, so the tail of the same
//! bounce train cannot retrigger.

use embassy_time::{Duration, Instant};

use crate::gate::CooldownGate;

/// A confirmed logical press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub observed_at: Instant,
}

/// An edge that passed the cooldown and awaits its confirmation re-read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct PendingPress {
    observed_at: Instant,
}

impl PendingPress {
    pub fn observed_at(&self) -> Instant {
        self.observed_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeVerdict {
    /// Inside the debounce window; dropped.
    Suppressed,
    /// Re-read the pin after [`ButtonDebouncer::settle_delay`].
    Confirm(PendingPress),
}

pub struct ButtonDebouncer {
    gate: CooldownGate,
    settle: Duration,
    edges_seen: u32,
    bounces_rejected: u32,
}

impl ButtonDebouncer {
    pub fn new(window: Duration, settle: Duration) -> Self {
        Self {
            gate: CooldownGate::new(window),
            settle,
            edges_seen: 0,
            bounces_rejected: 0,
        }
    }

    pub fn on_raw_edge(&mut self, now: Instant) -> EdgeVerdict {
        self.edges_seen = self.edges_seen.wrapping_add(1);
        if self.gate.allow(now) {
            EdgeVerdict::Confirm(PendingPress { observed_at: now })
        } else {
            EdgeVerdict::Suppressed
        }
    }

    /// Finish a pending press with the pin level read after the settle delay.
    pub fn confirm(&mut self, pending: PendingPress, still_asserted: bool) -> Option<ButtonEvent> {
        if still_asserted {
            Some(ButtonEvent {
                observed_at: pending.observed_at,
            })
        } else {
            self.bounces_rejected = self.bounces_rejected.wrapping_add(1);
            None
        }
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle
    }

    pub fn edges_seen(&self) -> u32 {
        self.edges_seen
    }

    pub fn bounces_rejected(&self) -> u32 {
        self.bounces_rejected
    }
}
