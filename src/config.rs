//! System configuration parameters
//!
//! All tunable parameters for both channel hosts. Values are loaded from a
//! JSON file (see [`FileConfigStore`](crate::adapters::config_file::FileConfigStore))
//! and every field falls back to its default when absent.

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Alarm authority ---
    /// Base URL of the backend (`http://host[:port]`)
    pub backend_url: String,
    /// Button host poll cadence (milliseconds)
    pub poll_interval_ms: u32,
    /// Gesture host state-file poll cadence (milliseconds)
    pub gesture_poll_interval_ms: u32,

    // --- Debounce / cooldown ---
    /// Button cooldown window (milliseconds)
    pub debounce_ms: u32,
    /// Delay before the confirmation re-read (milliseconds)
    pub settle_ms: u32,
    /// Minimum spacing between gesture dismissals (milliseconds)
    pub gesture_cooldown_ms: u32,

    // --- Gesture ---
    /// Minimum middle-fingertip to wrist vertical span (normalized height)
    pub hand_span_ratio: f64,

    // --- Timeouts ---
    /// GET /api/estado deadline (milliseconds)
    pub status_timeout_ms: u32,
    /// Button dismissal deadline (milliseconds)
    pub button_notify_timeout_ms: u32,
    /// Gesture dismissal deadline (milliseconds)
    pub gesture_notify_timeout_ms: u32,
    /// Upper bound on teardown (milliseconds)
    pub shutdown_timeout_ms: u32,

    // --- Hardware ---
    /// Indicator light output (BCM numbering)
    pub light_gpio: u32,
    /// Dismiss button input (BCM numbering)
    pub button_gpio: u32,
    /// Edge watcher sampling period (milliseconds)
    pub edge_sample_ms: u32,
    /// Use in-memory pins instead of sysfs
    pub simulate_hardware: bool,
    /// sysfs GPIO root
    pub gpio_root: String,

    // --- Gesture host files ---
    /// Shared state surface read by the gesture host
    pub state_file: String,
    /// Directory for evidentiary snapshots
    pub images_dir: String,
    /// Landmark feed: `-` for stdin, otherwise a file or FIFO path
    pub frame_source: String,

    // --- Logging ---
    /// Max log level (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Alarm authority
            backend_url: "http://backend:3000".into(),
            poll_interval_ms: 1000,        // 1 Hz
            gesture_poll_interval_ms: 200, // 5 Hz

            // Debounce / cooldown
            debounce_ms: 300,
            settle_ms: 50,
            gesture_cooldown_ms: 3000,

            // Gesture
            hand_span_ratio: 0.2,

            // Timeouts
            status_timeout_ms: 2000,
            button_notify_timeout_ms: 2000,
            gesture_notify_timeout_ms: 5000,
            shutdown_timeout_ms: 3000,

            // Hardware
            light_gpio: 17,
            button_gpio: 22,
            edge_sample_ms: 5,
            simulate_hardware: false,
            gpio_root: "/sys/class/gpio".into(),

            // Files
            state_file: "data/state.json".into(),
            images_dir: "data/images".into(),
            frame_source: "-".into(),

            log_level: "info".into(),
        }
    }
}

impl SystemConfig {
    pub fn poll_interval(&self) -> Duration {
        millis(self.poll_interval_ms)
    }

    pub fn gesture_poll_interval(&self) -> Duration {
        millis(self.gesture_poll_interval_ms)
    }

    pub fn debounce(&self) -> Duration {
        millis(self.debounce_ms)
    }

    pub fn settle(&self) -> Duration {
        millis(self.settle_ms)
    }

    pub fn gesture_cooldown(&self) -> Duration {
        millis(self.gesture_cooldown_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        millis(self.shutdown_timeout_ms)
    }

    /// Parsed `log_level`; unknown names fall back to `Info`.
    pub fn log_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

fn millis(ms: u32) -> Duration {
    Duration::from_millis(u64::from(ms))
}
