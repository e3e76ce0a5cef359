//! Host event queue.
//!
//! Events are produced by:
//! - the edge watcher thread (raw button edges)
//! - the ticker task (poll deadlines)
//! - the frame reader thread (landmark frames, end of stream)
//! - the signal thread (shutdown)
//!
//! and consumed by the host's control loop, one at a time, in arrival
//! order.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Edge watcher │────▶│              │     │              │
//! │ Ticker       │────▶│  HostQueue   │────▶│ Control loop │
//! │ Frame reader │────▶│  (bounded)   │     │  (consumer)  │
//! │ Signals      │────▶│              │     │              │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! Timing producers (edge watcher, ticker) never block: when the queue is
//! full their event is dropped, with one warning per overflow episode. The
//! frame reader uses [`HostQueue::push_blocking`] instead and waits for
//! room, so a file feed is delivered whole and a live feed backs up into
//! its pipe.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::Instant;
use log::{info, warn};

use crate::gesture::Frame;

/// Maximum number of pending events.
pub const HOST_QUEUE_DEPTH: usize = 16;

/// Retry period of [`HostQueue::push_blocking`].
const BLOCKING_RETRY: std::time::Duration = std::time::Duration::from_millis(5);

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The alarm poll interval elapsed.
    PollTick,
    /// Rising edge on the button input, stamped when it was sampled.
    RawEdge(Instant),
    /// A landmark frame from the vision feed.
    Frame(Frame),
    /// The vision feed ended or failed.
    FrameStreamClosed,
    /// Process shutdown requested.
    Shutdown,
}

pub struct HostQueue {
    channel: Channel<CriticalSectionRawMutex, HostEvent, HOST_QUEUE_DEPTH>,
    shutdown: AtomicBool,
    dropped: AtomicU32,
    overflowing: AtomicBool,
}

impl Default for HostQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl HostQueue {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            shutdown: AtomicBool::new(false),
            dropped: AtomicU32::new(0),
            overflowing: AtomicBool::new(false),
        }
    }

    /// Returns `false` if the queue is full (event dropped).
    pub fn push(&self, event: HostEvent) -> bool {
        match self.channel.try_send(event) {
            Ok(()) => {
                if self.overflowing.swap(false, Ordering::AcqRel) {
                    info!("host queue drained, {} events dropped so far", self.dropped());
                }
                true
            }
            Err(embassy_sync::channel::TrySendError::Full(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                if !self.overflowing.swap(true, Ordering::AcqRel) {
                    warn!("host queue full, dropping events (first: {})", kind(&event));
                }
                false
            }
        }
    }

    /// Wait for room instead of dropping. Returns `false` only if shutdown
    /// was requested before the event could be queued.
    pub fn push_blocking(&self, mut event: HostEvent) -> bool {
        loop {
            match self.channel.try_send(event) {
                Ok(()) => return true,
                Err(embassy_sync::channel::TrySendError::Full(back)) => {
                    if self.shutdown_requested() {
                        return false;
                    }
                    event = back;
                    std::thread::sleep(BLOCKING_RETRY);
                }
            }
        }
    }

    pub async fn next(&self) -> HostEvent {
        self.channel.receive().await
    }

    pub fn try_next(&self) -> Option<HostEvent> {
        self.channel.try_receive().ok()
    }

    /// Raise the shutdown flag and wake the consumer.
    ///
    /// `Shutdown` is retried until it is queued or the consumer is gone,
    /// so a full queue cannot swallow it.
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        for _ in 0..100 {
            if self.channel.try_send(HostEvent::Shutdown).is_ok() {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        warn!("shutdown event not queued, relying on the flag");
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

fn kind(event: &HostEvent) -> &'static str {
    match event {
        HostEvent::PollTick => "PollTick",
        HostEvent::RawEdge(_) => "RawEdge",
        HostEvent::Frame(_) => "Frame",
        HostEvent::FrameStreamClosed => "FrameStreamClosed",
        HostEvent::Shutdown => "Shutdown",
    }
}

/// The process-wide queue the host and its producer threads share.
pub static HOST_QUEUE: HostQueue = HostQueue::new();
