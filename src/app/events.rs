//! Outbound application events.
//!
//! The channels emit these through the [`EventSink`](super::ports::EventSink)
//! port. [`LogEventSink`](crate::adapters::log_sink::LogEventSink) renders
//! them as tagged log lines; tests record them.

use log::debug;

use crate::error::{AuthorityError, HardwareFault, NotifyError};
use crate::fsm::StateId;
use crate::monitor::{AlarmEdge, PollReport, Reachability};

use super::ports::{DismissalChannel, EventSink};

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A channel host finished starting.
    Started(DismissalChannel),

    /// `monitoring` flipped to true.
    AlarmActivated { alarm_time: Option<String> },

    /// `monitoring` flipped to false.
    AlarmCleared,

    /// The authority stopped answering. Emitted once per outage.
    AuthorityLost(AuthorityError),

    /// The authority answers again (or for the first time).
    AuthorityRestored,

    /// The light state machine moved.
    LightChanged { from: StateId, to: StateId },

    /// The light read back off while the alarm owns it; driven on again.
    LightReasserted,

    /// Driving the light pin failed.
    LightFault(HardwareFault),

    /// A button press passed debounce and confirmation.
    ButtonPressed,

    /// An edge passed the cooldown but failed its confirmation re-read.
    ButtonBounce,

    /// A frame classified as an open hand while the alarm was active.
    GestureDetected { seq: u64 },

    /// An evidentiary snapshot was stored.
    SnapshotSaved { path: String },

    /// The backend accepted the dismissal. `applied == false` means it was
    /// already dismissed.
    DismissalSent {
        channel: DismissalChannel,
        applied: bool,
    },

    /// The dismissal request failed. Not retried.
    DismissalFailed {
        channel: DismissalChannel,
        error: NotifyError,
    },

    /// A dismissal was due but the authority is unreachable.
    DismissalSuppressed(DismissalChannel),

    /// Shutdown began; the light is being forced off.
    ShuttingDown,
}

/// Emit the events for one poll. Unchanged polls only reach the debug log.
pub(crate) fn emit_poll_report(
    sink: &mut impl EventSink,
    report: &PollReport,
    alarm_active: bool,
    alarm_time: Option<&str>,
) {
    match report.reachability {
        Some(Reachability::Lost(e)) => sink.emit(&AppEvent::AuthorityLost(e)),
        Some(Reachability::Restored) => sink.emit(&AppEvent::AuthorityRestored),
        None => {}
    }
    match report.edge {
        Some(AlarmEdge::Activated) => sink.emit(&AppEvent::AlarmActivated {
            alarm_time: alarm_time.map(str::to_owned),
        }),
        Some(AlarmEdge::Cleared) => sink.emit(&AppEvent::AlarmCleared),
        None => {}
    }
    if report.is_quiet() {
        debug!("poll: unchanged, monitoring={}", alarm_active);
    }
}
