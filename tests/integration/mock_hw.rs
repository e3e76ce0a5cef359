//! Mock adapters for integration tests.
//!
//! Record every port call so tests can assert on the full history without
//! touching GPIO, the network, or the filesystem.

use std::collections::VecDeque;

use despertador::app::events::AppEvent;
use despertador::app::ports::{
    Ack, AlarmSignalPort, ButtonPort, DismissalPort, DismissalRequest, EventSink, LightPort,
    SnapshotPort,
};
use despertador::error::{AuthorityError, HardwareFault, NotifyError};
use despertador::gesture::Frame;
use despertador::monitor::AlarmSignal;

// ── MockHardware ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightCall {
    Set(bool),
}

pub struct MockHardware {
    pub calls: Vec<LightCall>,
    /// Physical light level.
    pub light: bool,
    /// Button level returned by the confirmation re-read.
    pub button: bool,
    /// When set, every `set_light` fails with this fault.
    pub fail_with: Option<HardwareFault>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            light: false,
            button: false,
            fail_with: None,
        }
    }

    pub fn light_writes(&self) -> usize {
        self.calls.len()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl LightPort for MockHardware {
    fn set_light(&mut self, on: bool) -> Result<(), HardwareFault> {
        if let Some(fault) = self.fail_with {
            return Err(fault);
        }
        self.calls.push(LightCall::Set(on));
        self.light = on;
        Ok(())
    }

    fn is_light_on(&mut self) -> bool {
        self.light
    }
}

impl ButtonPort for MockHardware {
    fn is_asserted(&mut self) -> bool {
        self.button
    }
}

// ── MockBackend ───────────────────────────────────────────────

/// Scripted alarm authority and notifier.
///
/// `fetch` pops from `signals`, repeating the last scripted answer once
/// the script runs out. `notify` answers with `notify_result`.
pub struct MockBackend {
    pub signals: VecDeque<Result<AlarmSignal, AuthorityError>>,
    last: Result<AlarmSignal, AuthorityError>,
    pub notify_result: Result<Ack, NotifyError>,
    pub fetches: u32,
    pub notified: Vec<DismissalRequest>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn new() -> Self {
        Self {
            signals: VecDeque::new(),
            last: Ok(AlarmSignal::idle()),
            notify_result: Ok(Ack { applied: true }),
            fetches: 0,
            notified: Vec::new(),
        }
    }

    pub fn ringing() -> Self {
        let mut b = Self::new();
        b.set(Ok(AlarmSignal::ringing("07:00")));
        b
    }

    /// Answer every following fetch with `result`.
    pub fn set(&mut self, result: Result<AlarmSignal, AuthorityError>) {
        self.signals.clear();
        self.last = result;
    }

    pub fn script(&mut self, results: impl IntoIterator<Item = Result<AlarmSignal, AuthorityError>>) {
        self.signals.extend(results);
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmSignalPort for MockBackend {
    fn fetch(&mut self) -> Result<AlarmSignal, AuthorityError> {
        self.fetches += 1;
        if let Some(next) = self.signals.pop_front() {
            self.last = next;
        }
        self.last.clone()
    }
}

impl DismissalPort for MockBackend {
    fn notify(&mut self, request: &DismissalRequest) -> Result<Ack, NotifyError> {
        self.notified.push(request.clone());
        self.notify_result
    }
}

// ── MockSnapshots ─────────────────────────────────────────────

pub struct MockSnapshots {
    pub persisted: Vec<u64>,
    pub fail: bool,
}

#[allow(dead_code)]
impl MockSnapshots {
    pub fn new() -> Self {
        Self {
            persisted: Vec::new(),
            fail: false,
        }
    }
}

impl Default for MockSnapshots {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotPort for MockSnapshots {
    fn persist(&mut self, frame: &Frame) -> Option<String> {
        if self.fail {
            return None;
        }
        self.persisted.push(frame.seq);
        Some(format!("data/images/hand_0_{}.json", frame.seq))
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
