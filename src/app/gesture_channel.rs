//! Gesture channel: reconciliation loop of the gesture host.
//!
//! Ticked once per processed frame. The channel has no light of its own:
//! a successful dismissal shows up as a cleared alarm on the next poll of
//! every host.
//!
//! Per frame:
//!
//! 1. poll the state surface if the polling interval elapsed,
//! 2. classify the frame,
//! 3. on a positive frame with an active alarm, a reachable authority and an
//!    open cooldown: store a snapshot, then notify once.

use embassy_time::Instant;
use log::{debug, info};

use crate::config::SystemConfig;
use crate::gate::CooldownGate;
use crate::gesture::{Frame, GestureClassifier};
use crate::monitor::{AlarmMonitor, PollReport};

use super::events::{AppEvent, emit_poll_report};
use super::ports::{
    AlarmSignalPort, DismissalChannel, DismissalPort, DismissalRequest, EventSink, SnapshotPort,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Not an open hand.
    NoGesture,
    /// Open hand, but no alarm to dismiss.
    Ignored,
    /// Open hand during an alarm, authority unreachable.
    Suppressed,
    /// Open hand inside the cooldown window.
    CoolingDown,
    /// One notification attempted.
    Dismissed { notified: bool },
}

pub struct GestureChannel {
    monitor: AlarmMonitor,
    classifier: GestureClassifier,
    cooldown: CooldownGate,
    /// Set once the current outage has reported a suppressed dismissal.
    suppression_reported: bool,
    frames: u64,
    detections: u32,
}

impl GestureChannel {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            monitor: AlarmMonitor::new(config.gesture_poll_interval()),
            classifier: GestureClassifier::new(config.hand_span_ratio),
            cooldown: CooldownGate::new(config.gesture_cooldown()),
            suppression_reported: false,
            frames: 0,
            detections: 0,
        }
    }

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(DismissalChannel::HandGesture));
        info!(
            "gesture channel started, span > {:.2}, cooldown {} ms",
            self.classifier.min_hand_span(),
            self.cooldown.interval().as_millis()
        );
    }

    pub fn poll(
        &mut self,
        now: Instant,
        authority: &mut impl AlarmSignalPort,
        sink: &mut impl EventSink,
    ) -> PollReport {
        let report = self.monitor.observe(now, authority.fetch());
        emit_poll_report(
            sink,
            &report,
            self.monitor.alarm_active(),
            self.monitor.alarm_time(),
        );
        if self.monitor.authority_reachable() {
            self.suppression_reported = false;
        }
        report
    }

    /// Poll only if the interval elapsed since the last poll.
    pub fn poll_if_due(
        &mut self,
        now: Instant,
        authority: &mut impl AlarmSignalPort,
        sink: &mut impl EventSink,
    ) -> Option<PollReport> {
        self.monitor
            .is_due(now)
            .then(|| self.poll(now, authority, sink))
    }

    pub fn process_frame(
        &mut self,
        now: Instant,
        frame: &Frame,
        authority: &mut impl AlarmSignalPort,
        notifier: &mut impl DismissalPort,
        snapshots: &mut impl SnapshotPort,
        sink: &mut impl EventSink,
    ) -> FrameOutcome {
        self.frames = self.frames.wrapping_add(1);
        self.poll_if_due(now, authority, sink);

        if !self.classifier.classify(&frame.observation) {
            return FrameOutcome::NoGesture;
        }
        if !self.monitor.alarm_active() {
            debug!("frame {}: open hand, no active alarm", frame.seq);
            return FrameOutcome::Ignored;
        }
        if !self.monitor.authority_reachable() {
            // One report per outage; the camera keeps seeing the hand.
            if self.suppression_reported {
                debug!("frame {}: open hand, authority unreachable", frame.seq);
            } else {
                sink.emit(&AppEvent::DismissalSuppressed(DismissalChannel::HandGesture));
                self.suppression_reported = true;
            }
            return FrameOutcome::Suppressed;
        }
        if !self.cooldown.allow(now) {
            debug!("frame {}: open hand inside cooldown", frame.seq);
            return FrameOutcome::CoolingDown;
        }

        self.detections = self.detections.wrapping_add(1);
        sink.emit(&AppEvent::GestureDetected { seq: frame.seq });

        let image_path = snapshots.persist(frame);
        if let Some(path) = &image_path {
            sink.emit(&AppEvent::SnapshotSaved { path: path.clone() });
        }

        let request = DismissalRequest::gesture(image_path);
        let notified = match notifier.notify(&request) {
            Ok(ack) => {
                sink.emit(&AppEvent::DismissalSent {
                    channel: request.channel,
                    applied: ack.applied,
                });
                true
            }
            Err(error) => {
                sink.emit(&AppEvent::DismissalFailed {
                    channel: request.channel,
                    error,
                });
                false
            }
        };
        FrameOutcome::Dismissed { notified }
    }

    pub fn alarm_active(&self) -> bool {
        self.monitor.alarm_active()
    }

    pub fn authority_reachable(&self) -> bool {
        self.monitor.authority_reachable()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn detections(&self) -> u32 {
        self.detections
    }
}
