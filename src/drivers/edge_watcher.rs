//! Button edge watcher.
//!
//! Stands in for the rising-edge interrupt: a dedicated thread samples
//! the button input every `sample` period and pushes
//! [`HostEvent::RawEdge`] on each low→high transition. The watcher only
//! produces; debounce and confirmation happen in the control loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use embassy_time::Instant;
use embedded_hal::digital::InputPin;
use log::{debug, warn};

use crate::events::{HostEvent, HostQueue};

pub struct EdgeWatcher {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl EdgeWatcher {
    pub fn spawn<B>(mut pin: B, sample: Duration, queue: &'static HostQueue) -> std::io::Result<Self>
    where
        B: InputPin + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = std::thread::Builder::new()
            .name("edge-watcher".into())
            .spawn(move || {
                let mut last = pin.is_high().unwrap_or(false);
                let mut failing = false;
                while !flag.load(Ordering::Acquire) {
                    match pin.is_high() {
                        Ok(level) => {
                            failing = false;
                            if level && !last {
                                queue.push(HostEvent::RawEdge(Instant::now()));
                            }
                            last = level;
                        }
                        Err(_) if !failing => {
                            warn!("edge watcher: button read failed");
                            failing = true;
                        }
                        Err(_) => {}
                    }
                    std::thread::sleep(sample);
                }
                debug!("edge watcher stopped");
            })?;
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Stop and wait at most `timeout` for the thread to exit.
    pub fn join(mut self, timeout: Duration) -> bool {
        self.stop();
        self.handle
            .take()
            .is_none_or(|handle| join_bounded(handle, timeout))
    }
}

impl Drop for EdgeWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Join `handle` if it finishes within `timeout`; otherwise leave it
/// detached and return `false`.
pub fn join_bounded(handle: JoinHandle<()>, timeout: Duration) -> bool {
    let deadline = std::time::Instant::now() + timeout;
    while !handle.is_finished() {
        if std::time::Instant::now() >= deadline {
            warn!(
                "thread {} did not stop within {:?}",
                handle.thread().name().unwrap_or("?"),
                timeout
            );
            return false;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    if handle.join().is_err() {
        warn!("producer thread panicked");
    }
    true
}
