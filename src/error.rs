//! Typed error enums for the alarm dismissal core.
//!
//! Every port returns one of the typed errors below. The channels convert
//! them into outcomes at the call site, so no failure ever leaves a
//! reconciliation loop. All variants are `Copy` so they can be carried in
//! [`AppEvent`](crate::app::events::AppEvent)s without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Authority errors
// ---------------------------------------------------------------------------

/// Failure to obtain an [`AlarmSignal`](crate::monitor::AlarmSignal).
/// Any of these marks the authority unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorityError {
    /// TCP connect failed or the connection was reset.
    Connect,
    /// The request did not complete before its deadline.
    Timeout,
    /// The authority answered with a non-success HTTP status.
    BadStatus(u16),
    /// The response or state file could not be parsed.
    Malformed,
}

impl fmt::Display for AuthorityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connection failed"),
            Self::Timeout => write!(f, "timed out"),
            Self::BadStatus(code) => write!(f, "HTTP status {code}"),
            Self::Malformed => write!(f, "malformed response"),
        }
    }
}

// ---------------------------------------------------------------------------
// Notify errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyError {
    /// The notifier endpoint could not be reached.
    Unreachable,
    /// The request did not complete before its deadline.
    Timeout,
    /// The backend answered with a non-success HTTP status.
    Rejected(u16),
    /// The response body could not be parsed.
    Malformed,
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => write!(f, "backend unreachable"),
            Self::Timeout => write!(f, "timed out"),
            Self::Rejected(code) => write!(f, "rejected with HTTP status {code}"),
            Self::Malformed => write!(f, "malformed response"),
        }
    }
}

// ---------------------------------------------------------------------------
// Hardware faults
// ---------------------------------------------------------------------------

/// Pin or capture failures. For the button host these degrade service;
/// for the gesture host a capture fault is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareFault {
    /// The pin could not be exported through sysfs.
    GpioExport(u32),
    /// The pin direction could not be configured.
    GpioDirection(u32),
    /// Reading or writing the pin value failed.
    GpioIo(u32),
    /// The landmark feed could not be opened.
    CaptureUnavailable,
    /// The landmark feed failed mid-stream.
    CaptureLost,
}

impl fmt::Display for HardwareFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioExport(pin) => write!(f, "GPIO{pin} export failed"),
            Self::GpioDirection(pin) => write!(f, "GPIO{pin} direction setup failed"),
            Self::GpioIo(pin) => write!(f, "GPIO{pin} I/O failed"),
            Self::CaptureUnavailable => write!(f, "capture device unavailable"),
            Self::CaptureLost => write!(f, "capture device lost"),
        }
    }
}

impl std::error::Error for HardwareFault {}
