//! Alarm indicator light driver.
//!
//! Owns the output pin and remembers the last commanded level. Dropping
//! the driver drives the pin low, so the light goes off on every exit
//! path, unwinding included.

use embedded_hal::digital::{OutputPin, StatefulOutputPin};
use log::{error, info};

use crate::error::HardwareFault;

pub struct StatusLight<P: OutputPin + StatefulOutputPin> {
    pin: P,
    pin_number: u32,
    commanded: bool,
}

impl<P: OutputPin + StatefulOutputPin> StatusLight<P> {
    /// Takes ownership of `pin` and drives it low.
    pub fn new(mut pin: P, pin_number: u32) -> Result<Self, HardwareFault> {
        pin.set_low().map_err(|_| HardwareFault::GpioIo(pin_number))?;
        Ok(Self {
            pin,
            pin_number,
            commanded: false,
        })
    }

    pub fn set(&mut self, on: bool) -> Result<(), HardwareFault> {
        let result = if on { self.pin.set_high() } else { self.pin.set_low() };
        result.map_err(|_| HardwareFault::GpioIo(self.pin_number))?;
        self.commanded = on;
        Ok(())
    }

    pub fn off(&mut self) -> Result<(), HardwareFault> {
        self.set(false)
    }

    /// Level read back from the pin. Falls back to the commanded level
    /// when the readback fails.
    pub fn is_on(&mut self) -> bool {
        self.pin.is_set_high().unwrap_or(self.commanded)
    }

    pub fn commanded(&self) -> bool {
        self.commanded
    }

    pub fn pin_number(&self) -> u32 {
        self.pin_number
    }
}

impl<P: OutputPin + StatefulOutputPin> Drop for StatusLight<P> {
    fn drop(&mut self) {
        match self.pin.set_low() {
            Ok(()) => info!("light GPIO{} released (off)", self.pin_number),
            Err(_) => error!("light GPIO{} could not be forced off", self.pin_number),
        }
    }
}
