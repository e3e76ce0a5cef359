//! Button channel: reconciliation loop of the button host.
//!
//! [`ButtonChannel`] owns this host's alarm monitor, debouncer and light
//! state machine. Ports are injected per call, so the whole pipeline runs
//! against mocks in tests.
//!
//! ```text
//!  AlarmSignalPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!   DismissalPort ◀─── │      ButtonChannel       │
//!                      │ Monitor · Debounce · FSM │
//!  LightPort+Button ◀─▶└──────────────────────────┘
//! ```
//!
//! Every entry point runs to completion before the host takes the next
//! event, which keeps state mutation single-writer.

use embassy_time::{Duration, Instant};
use log::info;

use crate::config::SystemConfig;
use crate::drivers::button::{ButtonDebouncer, ButtonEvent, EdgeVerdict, PendingPress};
use crate::fsm::StateId;
use crate::monitor::{AlarmMonitor, PollReport};

use super::events::{AppEvent, emit_poll_report};
use super::light::LightStateMachine;
use super::ports::{
    AlarmSignalPort, ButtonPort, DismissalChannel, DismissalPort, DismissalRequest, EventSink,
    LightPort,
};
use super::state::SystemState;

/// Result of one confirmed press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// Light turned off and one notification attempted.
    Dismissed { notified: bool },
    /// Alarm active but the authority is unreachable; nothing changed.
    DismissalSuppressed,
    ManualOn,
    ManualOff,
}

pub struct ButtonChannel {
    monitor: AlarmMonitor,
    debouncer: ButtonDebouncer,
    light: LightStateMachine,
    last_button_event_at: Option<Instant>,
    presses: u32,
}

impl ButtonChannel {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            monitor: AlarmMonitor::new(config.poll_interval()),
            debouncer: ButtonDebouncer::new(config.debounce(), config.settle()),
            light: LightStateMachine::new(),
            last_button_event_at: None,
            presses: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, hw: &mut impl LightPort, sink: &mut impl EventSink) {
        self.light.start(hw, sink);
        sink.emit(&AppEvent::Started(DismissalChannel::PhysicalButton));
        info!("button channel started, light {:?}", self.light.state());
    }

    /// Force the light off. Called on every exit path of the host.
    pub fn shutdown(&mut self, hw: &mut impl LightPort, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::ShuttingDown);
        self.light.force_off(hw);
    }

    // ── Poll tick ─────────────────────────────────────────────

    /// Fetch the alarm signal and reconcile the light, edge or not.
    pub fn poll(
        &mut self,
        now: Instant,
        authority: &mut impl AlarmSignalPort,
        hw: &mut impl LightPort,
        sink: &mut impl EventSink,
    ) -> PollReport {
        let report = self.monitor.observe(now, authority.fetch());
        emit_poll_report(
            sink,
            &report,
            self.monitor.alarm_active(),
            self.monitor.alarm_time(),
        );
        self.light.observe_alarm(self.monitor.alarm_active(), report.edge);
        self.light.reconcile(hw, sink);
        report
    }

    // ── Button path ───────────────────────────────────────────

    pub fn on_raw_edge(&mut self, now: Instant) -> EdgeVerdict {
        self.debouncer.on_raw_edge(now)
    }

    pub fn settle_delay(&self) -> Duration {
        self.debouncer.settle_delay()
    }

    /// Re-read the pin for a pending press and act on it if still asserted.
    pub fn confirm_press(
        &mut self,
        pending: PendingPress,
        hw: &mut (impl LightPort + ButtonPort),
        notifier: &mut impl DismissalPort,
        sink: &mut impl EventSink,
    ) -> Option<PressOutcome> {
        let asserted = hw.is_asserted();
        match self.debouncer.confirm(pending, asserted) {
            Some(event) => Some(self.handle_press(event, hw, notifier, sink)),
            None => {
                sink.emit(&AppEvent::ButtonBounce);
                None
            }
        }
    }

    pub fn handle_press(
        &mut self,
        event: ButtonEvent,
        hw: &mut impl LightPort,
        notifier: &mut impl DismissalPort,
        sink: &mut impl EventSink,
    ) -> PressOutcome {
        self.last_button_event_at = Some(event.observed_at);
        self.presses = self.presses.wrapping_add(1);
        sink.emit(&AppEvent::ButtonPressed);

        if !self.monitor.alarm_active() {
            self.light.request_toggle();
            self.light.reconcile(hw, sink);
            return if self.light.manual_override() {
                PressOutcome::ManualOn
            } else {
                PressOutcome::ManualOff
            };
        }

        if !self.monitor.authority_reachable() {
            sink.emit(&AppEvent::DismissalSuppressed(
                DismissalChannel::PhysicalButton,
            ));
            return PressOutcome::DismissalSuppressed;
        }

        // Local feedback first; the notifier result never rolls it back.
        self.light.dismiss(hw, sink);

        let request = DismissalRequest::button();
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
        PressOutcome::Dismissed { notified }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> SystemState {
        SystemState {
            light: self.light.state(),
            light_on: self.light.light_on(),
            alarm_active: self.monitor.alarm_active(),
            manual_override: self.light.manual_override(),
            last_button_event_at: self.last_button_event_at,
            authority_reachable: self.monitor.authority_reachable(),
            last_poll_at: self.monitor.last_poll_at(),
        }
    }

    pub fn light_state(&self) -> StateId {
        self.light.state()
    }

    pub fn presses(&self) -> u32 {
        self.presses
    }

    pub fn bounces_rejected(&self) -> u32 {
        self.debouncer.bounces_rejected()
    }
}
