//! Concrete state handler functions and table builder.
//!
//! ```text
//!   OFF ◀─────[toggle]───── ON_MANUAL
//!    │  ──────[toggle]─────▶    │
//! [alarm]                    [alarm]
//!    ▼                          │
//!  ON_AUTO ◀────────────────────┘
//!    │
//!    └──[alarm cleared]──▶ OFF
//!
//!  Dismissal: forced OFF, held there until the next alarm edge.
//! ```
//!
//! Manual intent is always subordinate: toggles are dropped while the
//! alarm owns the light.

use super::context::LightContext;
use super::{StateDescriptor, StateId};
use log::debug;

/// Build the static state table.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        StateDescriptor {
            id: StateId::Off,
            name: "Off",
            on_enter: Some(off_enter),
            on_exit: None,
            on_update: off_update,
        },
        StateDescriptor {
            id: StateId::OnAuto,
            name: "OnAuto",
            on_enter: Some(on_auto_enter),
            on_exit: None,
            on_update: on_auto_update,
        },
        StateDescriptor {
            id: StateId::OnManual,
            name: "OnManual",
            on_enter: Some(on_manual_enter),
            on_exit: Some(on_manual_exit),
            on_update: on_manual_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFF
// ═══════════════════════════════════════════════════════════════════════════

fn off_enter(ctx: &mut LightContext) {
    ctx.light_command = false;
    ctx.manual_override = false;
}

fn off_update(ctx: &mut LightContext) -> Option<StateId> {
    if ctx.alarm_demands_light() {
        ctx.toggle_requested = false;
        return Some(StateId::OnAuto);
    }
    if ctx.take_toggle() {
        if ctx.alarm_active {
            debug!("OFF: toggle dropped, dismissed alarm still reported");
            return None;
        }
        return Some(StateId::OnManual);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ON_AUTO
// ═══════════════════════════════════════════════════════════════════════════

fn on_auto_enter(ctx: &mut LightContext) {
    ctx.light_command = true;
    ctx.manual_override = false;
}

fn on_auto_update(ctx: &mut LightContext) -> Option<StateId> {
    if ctx.take_toggle() {
        debug!("ON_AUTO: manual toggle ignored while alarm active");
    }
    if !ctx.alarm_active {
        return Some(StateId::Off);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ON_MANUAL
// ═══════════════════════════════════════════════════════════════════════════

fn on_manual_enter(ctx: &mut LightContext) {
    ctx.light_command = true;
    ctx.manual_override = true;
}

fn on_manual_exit(ctx: &mut LightContext) {
    ctx.manual_override = false;
}

fn on_manual_update(ctx: &mut LightContext) -> Option<StateId> {
    if ctx.alarm_demands_light() {
        ctx.toggle_requested = false;
        return Some(StateId::OnAuto);
    }
    if ctx.take_toggle() {
        return Some(StateId::Off);
    }
    None
}
