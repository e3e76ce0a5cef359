//! End-to-end scenarios across both channels.
//!
//! Each host keeps its own state; the only thing they share is the alarm
//! authority, modelled here by scripting the same answers into both mocks.

use embassy_time::Instant;

use crate::gesture_channel_tests::Rig;
use crate::mock_hw::{MockBackend, MockHardware, RecordingSink};

use despertador::app::button_channel::{ButtonChannel, PressOutcome};
use despertador::app::events::AppEvent;
use despertador::app::gesture_channel::FrameOutcome;
use despertador::app::ports::{Ack, DismissalChannel};
use despertador::config::SystemConfig;
use despertador::drivers::button::EdgeVerdict;
use despertador::error::{AuthorityError, NotifyError};
use despertador::fsm::StateId;
use despertador::monitor::AlarmSignal;

fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

struct ButtonRig {
    channel: ButtonChannel,
    hw: MockHardware,
    backend: MockBackend,
    sink: RecordingSink,
}

impl ButtonRig {
    fn new() -> Self {
        let mut channel = ButtonChannel::new(&SystemConfig::default());
        let mut hw = MockHardware::new();
        let mut sink = RecordingSink::new();
        channel.start(&mut hw, &mut sink);
        Self {
            channel,
            hw,
            backend: MockBackend::new(),
            sink,
        }
    }

    fn poll(&mut self, ms: u64) {
        self.channel
            .poll(at(ms), &mut self.backend, &mut self.hw, &mut self.sink);
    }

    fn press(&mut self, ms: u64) -> Option<PressOutcome> {
        let EdgeVerdict::Confirm(pending) = self.channel.on_raw_edge(at(ms)) else {
            return None;
        };
        self.hw.button = true;
        self.channel
            .confirm_press(pending, &mut self.hw, &mut self.backend, &mut self.sink)
    }
}

// ── Scenario 1: alarm false → true ────────────────────────────

#[test]
fn scenario_alarm_activation_turns_light_on_within_one_poll() {
    let mut rig = ButtonRig::new();
    rig.poll(0);
    rig.press(200); // manual on
    assert!(rig.channel.state().manual_override);

    rig.backend.set(Ok(AlarmSignal::ringing("07:00")));
    rig.poll(1_000);

    let state = rig.channel.state();
    assert!(rig.hw.light);
    assert_eq!(state.light, StateId::OnAuto);
    assert!(!state.manual_override);
    assert!(state.alarm_active);
    assert_eq!(state.last_poll_at, Some(at(1_000)));
}

// ── Scenario 2: button dismissal independent of network ──────

#[test]
fn scenario_button_dismissal_turns_light_off_regardless_of_notifier() {
    for notify_result in [Ok(Ack { applied: true }), Err(NotifyError::Timeout)] {
        let mut rig = ButtonRig::new();
        rig.backend.set(Ok(AlarmSignal::ringing("07:00")));
        rig.backend.notify_result = notify_result;
        rig.poll(0);
        assert!(rig.hw.light);

        let outcome = rig.press(500);
        assert!(matches!(outcome, Some(PressOutcome::Dismissed { .. })));
        assert!(!rig.hw.light, "light off for {:?}", notify_result);
        assert_eq!(rig.backend.notified.len(), 1);
        assert_eq!(rig.backend.notified[0].channel.tag(), "physical button");
        assert_eq!(rig.channel.state().last_button_event_at, Some(at(500)));
    }
}

// ── Scenario 3: gesture cooldown ──────────────────────────────

#[test]
fn scenario_gesture_cooldown_prevents_renotify_on_next_frame() {
    let mut rig = Rig::ringing();
    assert_eq!(rig.hand(10_000, 100), FrameOutcome::Dismissed { notified: true });
    assert_eq!(rig.hand(10_033, 101), FrameOutcome::CoolingDown);
    assert_eq!(rig.backend.notified.len(), 1);
}

// ── Scenario 4: authority unreachable ─────────────────────────

#[test]
fn scenario_unreachable_authority_blocks_dismissal_and_keeps_light() {
    let mut rig = ButtonRig::new();
    rig.backend.set(Ok(AlarmSignal::ringing("07:00")));
    rig.poll(0);
    assert!(rig.hw.light);

    rig.backend.set(Err(AuthorityError::Connect));
    for tick in 1..=10 {
        rig.poll(tick * 1_000);
    }
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::AuthorityLost(_))),
        1,
        "outage logged once, not per poll"
    );

    let outcome = rig.press(10_500);
    assert_eq!(outcome, Some(PressOutcome::DismissalSuppressed));
    assert!(rig.backend.notified.is_empty());
    assert!(rig.hw.light, "light keeps its last known state");
    assert!(!rig.channel.state().authority_reachable);

    rig.backend.set(Ok(AlarmSignal::ringing("07:00")));
    rig.poll(11_000);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::AuthorityRestored), 2);
}

// ── Cross-channel idempotence ─────────────────────────────────

#[test]
fn both_channels_dismiss_and_light_goes_off_once() {
    let mut button = ButtonRig::new();
    let mut gesture = Rig::ringing();
    button.backend.set(Ok(AlarmSignal::ringing("07:00")));
    // Second dismissal finds nothing to do: applied=false, still success.
    button.backend.notify_result = Ok(Ack { applied: false });

    button.poll(0);
    assert_eq!(gesture.hand(100, 1), FrameOutcome::Dismissed { notified: true });
    assert_eq!(button.press(120), Some(PressOutcome::Dismissed { notified: true }));

    assert!(button.sink.events.contains(&AppEvent::DismissalSent {
        channel: DismissalChannel::PhysicalButton,
        applied: false,
    }));

    let off_transitions = |sink: &RecordingSink| {
        sink.count(|e| {
            matches!(
                e,
                AppEvent::LightChanged {
                    to: StateId::Off,
                    ..
                }
            )
        })
    };
    assert_eq!(off_transitions(&button.sink), 1);

    // Backend clears the alarm; nothing moves again.
    button.backend.set(Ok(AlarmSignal::idle()));
    button.poll(1_000);
    button.poll(2_000);
    assert_eq!(off_transitions(&button.sink), 1);
    assert!(!button.hw.light);
}
