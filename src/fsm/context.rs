//! Shared context threaded through every light FSM handler.
//!
//! The channel writes the inputs before each tick; handlers write the
//! outputs. Nothing here touches a pin.

#[derive(Debug, Clone, Default)]
pub struct LightContext {
    // -- Timing --
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,
    /// Monotonic total tick count.
    pub total_ticks: u64,

    // -- Inputs --
    /// Last known alarm signal.
    pub alarm_active: bool,
    /// A local toggle is pending. Consumed by the next tick.
    pub toggle_requested: bool,
    /// An accepted dismissal holds the light off until the next alarm edge.
    pub acknowledged: bool,

    // -- Outputs --
    /// Level the light should be driven to.
    pub light_command: bool,
    /// The light is on because of a local toggle.
    pub manual_override: bool,
}

impl LightContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and clear the pending toggle.
    pub fn take_toggle(&mut self) -> bool {
        core::mem::take(&mut self.toggle_requested)
    }

    /// An active alarm that no local dismissal has answered yet.
    pub fn alarm_demands_light(&self) -> bool {
        self.alarm_active && !self.acknowledged
    }
}
