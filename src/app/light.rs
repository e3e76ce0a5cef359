//! Indicator light state machine.
//!
//! Wraps the function-pointer [`Fsm`] with the inputs it reacts to and the
//! pin it drives. Every reconcile reads the light back and re-drives it when
//! the physical level disagrees with the commanded one, so external
//! interference is healed on the next tick rather than on the next edge.

use log::{debug, warn};

use crate::fsm::context::LightContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::monitor::AlarmEdge;

use super::events::AppEvent;
use super::ports::{EventSink, LightPort};

pub struct LightStateMachine {
    fsm: Fsm,
    ctx: LightContext,
    /// Mirrors the last successful light command.
    light_on: bool,
    reasserts: u32,
}

impl LightStateMachine {
    pub fn new() -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), StateId::Off),
            ctx: LightContext::new(),
            light_on: false,
            reasserts: 0,
        }
    }

    pub fn start(&mut self, light: &mut impl LightPort, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        self.apply(light, sink, true);
    }

    /// Feed a poll result. Any edge releases the dismissal latch.
    pub fn observe_alarm(&mut self, alarm_active: bool, edge: Option<AlarmEdge>) {
        if edge.is_some() {
            self.ctx.acknowledged = false;
        }
        self.ctx.alarm_active = alarm_active;
    }

    pub fn request_toggle(&mut self) {
        self.ctx.toggle_requested = true;
    }

    /// Tick the state machine and drive the pin.
    pub fn reconcile(&mut self, light: &mut impl LightPort, sink: &mut impl EventSink) {
        let left = self.fsm.tick(&mut self.ctx);
        if let Some(from) = left {
            sink.emit(&AppEvent::LightChanged {
                from,
                to: self.fsm.current_state(),
            });
        }
        self.apply(light, sink, left.is_some());
    }

    /// Accepted dismissal: light off now, held off until the next alarm edge.
    pub fn dismiss(&mut self, light: &mut impl LightPort, sink: &mut impl EventSink) {
        self.ctx.acknowledged = true;
        let from = self.fsm.current_state();
        let moved = self.fsm.force_transition(StateId::Off, &mut self.ctx);
        if moved {
            sink.emit(&AppEvent::LightChanged {
                from,
                to: StateId::Off,
            });
        }
        self.apply(light, sink, moved);
    }

    /// Best-effort light off for shutdown.
    pub fn force_off(&mut self, light: &mut impl LightPort) {
        match light.set_light(false) {
            Ok(()) => self.light_on = false,
            Err(e) => warn!("light off on shutdown failed: {}", e),
        }
    }

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn light_on(&self) -> bool {
        self.light_on
    }

    pub fn manual_override(&self) -> bool {
        self.ctx.manual_override
    }

    pub fn acknowledged(&self) -> bool {
        self.ctx.acknowledged
    }

    pub fn reasserts(&self) -> u32 {
        self.reasserts
    }

    fn apply(&mut self, light: &mut impl LightPort, sink: &mut impl EventSink, transitioned: bool) {
        let want = self.ctx.light_command;
        let physical = light.is_light_on();
        if physical == want {
            self.light_on = physical;
            return;
        }

        match light.set_light(want) {
            Ok(()) => {
                self.light_on = want;
                if transitioned {
                    return;
                }
                if want {
                    self.reasserts = self.reasserts.wrapping_add(1);
                    sink.emit(&AppEvent::LightReasserted);
                } else {
                    debug!("light read back on unexpectedly, driven off");
                }
            }
            Err(e) => {
                self.light_on = physical;
                sink.emit(&AppEvent::LightFault(e));
            }
        }
    }
}

impl Default for LightStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
