//! Per-host state snapshot.

use embassy_time::Instant;

use crate::fsm::StateId;

/// Point-in-time view of one channel host's reconciliation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemState {
    pub light: StateId,
    pub light_on: bool,
    pub alarm_active: bool,
    pub manual_override: bool,
    pub last_button_event_at: Option<Instant>,
    pub authority_reachable: bool,
    pub last_poll_at: Option<Instant>,
}
