//! Port traits: the hexagonal boundary between the channels and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ButtonChannel / GestureChannel (domain)
//! ```
//!
//! Driven adapters (backend client, state file, pins, frame feed, snapshot
//! store, event sinks, config store) implement these traits. The channels
//! take them as generics at call sites, so the domain core never touches
//! a socket or a pin directly.
//!
//! All port errors are typed. The channels turn every one of them into an
//! outcome; none is allowed to end a polling loop.

use crate::config::SystemConfig;
use crate::error::{AuthorityError, HardwareFault, NotifyError};
use crate::gesture::Frame;
use crate::monitor::AlarmSignal;

// ───────────────────────────────────────────────────────────────
// Alarm authority (driven adapter: backend / state file → domain)
// ───────────────────────────────────────────────────────────────

/// Read side of the alarm authority. One call per poll, bounded by a timeout.
pub trait AlarmSignalPort {
    fn fetch(&mut self) -> Result<AlarmSignal, AuthorityError>;
}

// ───────────────────────────────────────────────────────────────
// Dismissal notifier (driven adapter: domain → backend)
// ───────────────────────────────────────────────────────────────

/// Which physical channel produced a dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissalChannel {
    PhysicalButton,
    HandGesture,
}

impl DismissalChannel {
    pub const fn tag(self) -> &'static str {
        match self {
            Self::PhysicalButton => "physical button",
            Self::HandGesture => "hand gesture",
        }
    }
}

impl core::fmt::Display for DismissalChannel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DismissalRequest {
    pub channel: DismissalChannel,
    /// Evidentiary snapshot for gesture dismissals.
    pub image_path: Option<String>,
}

impl DismissalRequest {
    pub fn button() -> Self {
        Self {
            channel: DismissalChannel::PhysicalButton,
            image_path: None,
        }
    }

    pub fn gesture(image_path: Option<String>) -> Self {
        Self {
            channel: DismissalChannel::HandGesture,
            image_path,
        }
    }
}

/// Backend acknowledgement of a dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    /// `false` when the backend reports the alarm was already dismissed.
    pub applied: bool,
}

/// Sends exactly one request per call. Never retries.
pub trait DismissalPort {
    fn notify(&mut self, request: &DismissalRequest) -> Result<Ack, NotifyError>;
}

// ───────────────────────────────────────────────────────────────
// Hardware (driven adapter: domain ↔ pins)
// ───────────────────────────────────────────────────────────────

pub trait LightPort {
    fn set_light(&mut self, on: bool) -> Result<(), HardwareFault>;

    /// Physical level of the light output.
    fn is_light_on(&mut self) -> bool;
}

pub trait ButtonPort {
    /// Raw level of the button input; `true` while pressed.
    fn is_asserted(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Vision (driven adapters: frame feed → domain, domain → snapshots)
// ───────────────────────────────────────────────────────────────

pub trait FramePort {
    /// Next frame, `Ok(None)` at end of stream.
    fn next_frame(&mut self) -> Result<Option<Frame>, HardwareFault>;
}

/// Fire-and-forget evidentiary snapshot store.
pub trait SnapshotPort {
    /// Persist the frame; returns the stored path, or `None` on failure.
    fn persist(&mut self, frame: &Frame) -> Option<String>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate values before persisting and after
/// loading. Invalid ranges are rejected with
/// [`ConfigError::ValidationFailed`], never clamped.
pub trait ConfigPort {
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

#[derive(Debug)]
pub enum ConfigError {
    /// Stored config could not be parsed.
    Corrupted,
    /// A field failed range validation; the message names it.
    ValidationFailed(&'static str),
    /// Reading or writing the file failed.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
