//! Host time adapter.
//!
//! Monotonic time comes from `embassy-time`'s std driver directly. Wall-clock
//! seconds are only used to name snapshot files.

use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch, 0 if the wall clock is before it.
pub fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
