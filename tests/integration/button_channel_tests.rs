//! Integration tests for the ButtonChannel → light FSM → notifier pipeline.
//!
//! Edges, confirmation re-reads and polls are driven by hand with
//! synthetic instants, so every timing boundary is exact.

use embassy_time::Instant;

use crate::mock_hw::{LightCall, MockBackend, MockHardware, RecordingSink};

use despertador::app::button_channel::{ButtonChannel, PressOutcome};
use despertador::app::events::AppEvent;
use despertador::app::ports::DismissalChannel;
use despertador::config::SystemConfig;
use despertador::drivers::button::EdgeVerdict;
use despertador::error::{AuthorityError, HardwareFault, NotifyError};
use despertador::fsm::StateId;
use despertador::monitor::AlarmSignal;

fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

fn make_channel() -> (ButtonChannel, MockHardware, MockBackend, RecordingSink) {
    let mut channel = ButtonChannel::new(&SystemConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    channel.start(&mut hw, &mut sink);
    (channel, hw, MockBackend::new(), sink)
}

/// Raw edge at `ms`, confirmed with the button still held.
fn press(
    channel: &mut ButtonChannel,
    ms: u64,
    hw: &mut MockHardware,
    backend: &mut MockBackend,
    sink: &mut RecordingSink,
) -> Option<PressOutcome> {
    match channel.on_raw_edge(at(ms)) {
        EdgeVerdict::Confirm(pending) => {
            hw.button = true;
            channel.confirm_press(pending, hw, backend, sink)
        }
        EdgeVerdict::Suppressed => None,
    }
}

#[test]
fn start_emits_started_and_keeps_light_off() {
    let (channel, hw, _backend, sink) = make_channel();
    assert_eq!(channel.light_state(), StateId::Off);
    assert!(!hw.light);
    assert!(sink
        .events
        .contains(&AppEvent::Started(DismissalChannel::PhysicalButton)));
}

// ── Manual toggle ─────────────────────────────────────────────

#[test]
fn toggle_without_alarm_turns_light_on_then_off() {
    let (mut channel, mut hw, mut backend, mut sink) = make_channel();
    channel.poll(at(0), &mut backend, &mut hw, &mut sink);

    let first = press(&mut channel, 1_000, &mut hw, &mut backend, &mut sink);
    assert_eq!(first, Some(PressOutcome::ManualOn));
    assert!(hw.light);
    assert!(channel.state().manual_override);

    let second = press(&mut channel, 2_000, &mut hw, &mut backend, &mut sink);
    assert_eq!(second, Some(PressOutcome::ManualOff));
    assert!(!hw.light);
    assert!(!channel.state().manual_override);
    assert!(backend.notified.is_empty(), "toggles never notify");
}

#[test]
fn toggle_allowed_while_authority_unreachable_without_alarm() {
    let (mut channel, mut hw, mut backend, mut sink) = make_channel();
    backend.set(Err(AuthorityError::Connect));
    channel.poll(at(0), &mut backend, &mut hw, &mut sink);

    let outcome = press(&mut channel, 500, &mut hw, &mut backend, &mut sink);
    assert_eq!(outcome, Some(PressOutcome::ManualOn));
    assert!(hw.light);
}

// ── Debounce ──────────────────────────────────────────────────

#[test]
fn bounce_train_yields_one_press() {
    let (mut channel, mut hw, mut backend, mut sink) = make_channel();
    let mut outcomes = Vec::new();
    for ms in [1_000, 1_010, 1_040, 1_200, 1_300] {
        if let Some(o) = press(&mut channel, ms, &mut hw, &mut backend, &mut sink) {
            outcomes.push(o);
        }
    }
    assert_eq!(outcomes, vec![PressOutcome::ManualOn]);
    assert_eq!(channel.presses(), 1);

    // Strictly past the 300 ms window the next edge counts.
    let next = press(&mut channel, 1_301, &mut hw, &mut backend, &mut sink);
    assert_eq!(next, Some(PressOutcome::ManualOff));
}

#[test]
fn released_on_reread_is_a_bounce_and_consumes_window() {
    let (mut channel, mut hw, mut backend, mut sink) = make_channel();

    let EdgeVerdict::Confirm(pending) = channel.on_raw_edge(at(1_000)) else {
        panic!("first edge must pass the gate");
    };
    hw.button = false;
    assert_eq!(
        channel.confirm_press(pending, &mut hw, &mut backend, &mut sink),
        None
    );
    assert_eq!(channel.bounces_rejected(), 1);
    assert!(sink.events.contains(&AppEvent::ButtonBounce));

    // The window is still closed for the rest of the train.
    assert_eq!(channel.on_raw_edge(at(1_200)), EdgeVerdict::Suppressed);
    assert!(!hw.light);
    assert_eq!(channel.presses(), 0);
}

// ── Alarm ─────────────────────────────────────────────────────

#[test]
fn alarm_edge_turns_light_on_and_clears_override() {
    let (mut channel, mut hw, mut backend, mut sink) = make_channel();
    channel.poll(at(0), &mut backend, &mut hw, &mut sink);
    press(&mut channel, 100, &mut hw, &mut backend, &mut sink);
    assert!(channel.state().manual_override);

    backend.set(Ok(AlarmSignal::ringing("06:45")));
    channel.poll(at(1_000), &mut backend, &mut hw, &mut sink);

    let state = channel.state();
    assert_eq!(state.light, StateId::OnAuto);
    assert!(state.light_on && hw.light);
    assert!(!state.manual_override);
    assert!(sink.events.contains(&AppEvent::AlarmActivated {
        alarm_time: Some("06:45".into())
    }));
}

#[test]
fn press_during_alarm_dismisses_once() {
    let (mut channel, mut hw, mut backend, mut sink) = make_channel();
    backend.set(Ok(AlarmSignal::ringing("07:00")));
    channel.poll(at(0), &mut backend, &mut hw, &mut sink);
    assert!(hw.light);

    let outcome = press(&mut channel, 500, &mut hw, &mut backend, &mut sink);
    assert_eq!(outcome, Some(PressOutcome::Dismissed { notified: true }));
    assert!(!hw.light);
    assert_eq!(backend.notified.len(), 1);
    assert_eq!(backend.notified[0].channel, DismissalChannel::PhysicalButton);
    assert_eq!(backend.notified[0].channel.tag(), "physical button");
}

#[test]
fn light_stays_off_after_dismissal_while_backend_lags() {
    let (mut channel, mut hw, mut backend, mut sink) = make_channel();
    backend.set(Ok(AlarmSignal::ringing("07:00")));
    channel.poll(at(0), &mut backend, &mut hw, &mut sink);
    press(&mut channel, 500, &mut hw, &mut backend, &mut sink);

    // Backend still reports monitoring for a few polls.
    for tick in 1..=3 {
        channel.poll(at(tick * 1_000), &mut backend, &mut hw, &mut sink);
        assert!(!hw.light, "light must stay off at poll {}", tick);
    }

    // Cleared, then a new alarm: light comes back.
    backend.set(Ok(AlarmSignal::idle()));
    channel.poll(at(5_000), &mut backend, &mut hw, &mut sink);
    backend.set(Ok(AlarmSignal::ringing("07:10")));
    channel.poll(at(6_000), &mut backend, &mut hw, &mut sink);
    assert!(hw.light);
    assert_eq!(channel.light_state(), StateId::OnAuto);
}

#[test]
fn notifier_failure_keeps_light_off() {
    let (mut channel, mut hw, mut backend, mut sink) = make_channel();
    backend.set(Ok(AlarmSignal::ringing("07:00")));
    backend.notify_result = Err(NotifyError::Timeout);
    channel.poll(at(0), &mut backend, &mut hw, &mut sink);

    let outcome = press(&mut channel, 500, &mut hw, &mut backend, &mut sink);
    assert_eq!(outcome, Some(PressOutcome::Dismissed { notified: false }));
    assert!(!hw.light);
    assert!(sink.events.contains(&AppEvent::DismissalFailed {
        channel: DismissalChannel::PhysicalButton,
        error: NotifyError::Timeout,
    }));

    // A later press re-attempts the dismissal.
    backend.notify_result = Ok(despertador::app::ports::Ack { applied: true });
    let again = press(&mut channel, 1_000, &mut hw, &mut backend, &mut sink);
    assert_eq!(again, Some(PressOutcome::Dismissed { notified: true }));
    assert_eq!(backend.notified.len(), 2);
}

#[test]
fn light_reasserted_when_found_off_during_alarm() {
    let (mut channel, mut hw, mut backend, mut sink) = make_channel();
    backend.set(Ok(AlarmSignal::ringing("07:00")));
    channel.poll(at(0), &mut backend, &mut hw, &mut sink);

    hw.light = false; // something else pulled the pin low
    channel.poll(at(1_000), &mut backend, &mut hw, &mut sink);
    assert!(hw.light);
    assert!(sink.events.contains(&AppEvent::LightReasserted));
}

#[test]
fn light_fault_is_reported_not_fatal() {
    let (mut channel, mut hw, mut backend, mut sink) = make_channel();
    hw.fail_with = Some(HardwareFault::GpioIo(17));
    backend.set(Ok(AlarmSignal::ringing("07:00")));
    channel.poll(at(0), &mut backend, &mut hw, &mut sink);

    assert!(sink
        .events
        .contains(&AppEvent::LightFault(HardwareFault::GpioIo(17))));
    assert_eq!(channel.light_state(), StateId::OnAuto);
    assert!(!channel.state().light_on);
}

#[test]
fn shutdown_forces_light_off() {
    let (mut channel, mut hw, mut backend, mut sink) = make_channel();
    backend.set(Ok(AlarmSignal::ringing("07:00")));
    channel.poll(at(0), &mut backend, &mut hw, &mut sink);
    assert!(hw.light);

    channel.shutdown(&mut hw, &mut sink);
    assert!(!hw.light);
    assert_eq!(hw.calls.last(), Some(&LightCall::Set(false)));
    assert!(sink.events.contains(&AppEvent::ShuttingDown));
}
