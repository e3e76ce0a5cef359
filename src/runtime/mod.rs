//! Channel hosts: the async control loops that own one channel each.
//!
//! ```text
//!  ┌────────────────────────────────────────────────────────────┐
//!  │  Host thread                                               │
//!  │  ┌──────────────────────────────────────────────────────┐  │
//!  │  │  futures_lite::block_on                              │  │
//!  │  │  ┌──────────────────────────────────────────────────┐│  │
//!  │  │  │  edge_executor::LocalExecutor                    ││  │
//!  │  │  │  ┌──────────────┐     ┌────────────────────────┐ ││  │
//!  │  │  │  │ Ticker ⏱     │────▶│ Control loop (consumer)│ ││  │
//!  │  │  │  └──────────────┘     └────────────────────────┘ ││  │
//!  │  │  └──────────────────────────────────────────────────┘│  │
//!  │  └──────────────────────────────────────────────────────┘  │
//!  │  producer threads: edge watcher / frame reader, signals    │
//!  └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The button and gesture hosts run as separate processes and share
//! nothing but the alarm authority.

pub mod button_host;
pub mod gesture_host;

use core::time::Duration as StdDuration;

use crate::events::{HostEvent, HostQueue};

/// Max spawned tasks per host executor.
const HOST_TASKS: usize = 4;

pub(crate) type HostExecutor<'a> = edge_executor::LocalExecutor<'a, HOST_TASKS>;

pub(crate) fn to_std(d: embassy_time::Duration) -> StdDuration {
    StdDuration::from_micros(d.as_micros())
}

/// Push [`HostEvent::PollTick`] every `period` until shutdown.
pub(crate) async fn ticker(queue: &'static HostQueue, period: StdDuration) {
    while !queue.shutdown_requested() {
        async_io_mini::Timer::after(period).await;
        queue.push(HostEvent::PollTick);
    }
}
