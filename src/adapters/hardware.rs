//! Hardware adapter: bridges the pins to the domain port traits.
//!
//! Combines the [`StatusLight`] and the button input behind
//! [`LightPort`] and [`ButtonPort`]. The button is optional: when its pin
//! could not be opened the host keeps running with light and alarm logic
//! only, and the button reads as released.

use embedded_hal::digital::{InputPin, OutputPin, StatefulOutputPin};
use log::warn;

use crate::app::ports::{ButtonPort, LightPort};
use crate::drivers::status_light::StatusLight;
use crate::error::HardwareFault;

/// Concrete adapter over any `embedded-hal` pin pair.
pub struct HardwareAdapter<L, B>
where
    L: OutputPin + StatefulOutputPin,
    B: InputPin,
{
    light: StatusLight<L>,
    button: Option<B>,
    button_read_failed: bool,
}

impl<L, B> HardwareAdapter<L, B>
where
    L: OutputPin + StatefulOutputPin,
    B: InputPin,
{
    pub fn new(light: StatusLight<L>, button: Option<B>) -> Self {
        Self {
            light,
            button,
            button_read_failed: false,
        }
    }

    pub fn has_button(&self) -> bool {
        self.button.is_some()
    }
}

// ── LightPort implementation ──────────────────────────────────

impl<L, B> LightPort for HardwareAdapter<L, B>
where
    L: OutputPin + StatefulOutputPin,
    B: InputPin,
{
    fn set_light(&mut self, on: bool) -> Result<(), HardwareFault> {
        self.light.set(on)
    }

    fn is_light_on(&mut self) -> bool {
        self.light.is_on()
    }
}

// ── ButtonPort implementation ─────────────────────────────────

impl<L, B> ButtonPort for HardwareAdapter<L, B>
where
    L: OutputPin + StatefulOutputPin,
    B: InputPin,
{
    fn is_asserted(&mut self) -> bool {
        let Some(pin) = self.button.as_mut() else {
            return false;
        };
        match pin.is_high() {
            Ok(level) => {
                self.button_read_failed = false;
                level
            }
            Err(_) => {
                // Log the first failure of a run only.
                if !self.button_read_failed {
                    warn!("button read failed, treating as released");
                    self.button_read_failed = true;
                }
                false
            }
        }
    }
}
