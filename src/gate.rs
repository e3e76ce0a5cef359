//! Generic cooldown gate.
//!
//! Lets an action through at most once per interval. The first call always
//! passes; afterwards a call passes only when strictly more than `interval`
//! has elapsed since the last accepted one. Rejected calls leave the gate
//! untouched.
//!
//! ```text
//!   t0          t0+100ms     t0+interval    t0+interval+1ms
//!   allowed     rejected     rejected       allowed
//! ```

use embassy_time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CooldownGate {
    interval: Duration,
    last_allowed: Option<Instant>,
}

impl CooldownGate {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_allowed: None,
        }
    }

    /// Returns `true` and records `now` if the gate is open.
    ///
    /// A `now` earlier than the last accepted instant is rejected.
    pub fn allow(&mut self, now: Instant) -> bool {
        let open = match self.last_allowed {
            None => true,
            Some(last) => now
                .checked_duration_since(last)
                .is_some_and(|elapsed| elapsed > self.interval),
        };
        if open {
            self.last_allowed = Some(now);
        }
        open
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_allowed(&self) -> Option<Instant> {
        self.last_allowed
    }
}
