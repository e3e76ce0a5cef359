//! GPIO pins behind the `embedded-hal` digital traits.
//!
//! ## Dual-backend design
//!
//! - **sysfs**: `/sys/class/gpio/gpioN/value`, exported on open and
//!   unexported when the owning handle drops.
//! - **sim**: a shared `AtomicBool`, for `simulate_hardware` and tests.
//!
//! Input pins can be cloned into extra read handles, so the edge watcher
//! thread and the confirmation re-read each own one.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin, StatefulOutputPin};
use log::{debug, warn};

use crate::error::HardwareFault;

/// Error type for both pin backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioError(pub HardwareFault);

impl embedded_hal::digital::Error for GpioError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl From<GpioError> for HardwareFault {
    fn from(e: GpioError) -> Self {
        e.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    fn as_sysfs(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "low",
        }
    }
}

// ───────────────────────────────────────────────────────────────
// sysfs backend
// ───────────────────────────────────────────────────────────────

pub struct SysfsPin {
    number: u32,
    root: PathBuf,
    value: PathBuf,
    /// Only the handle that exported the pin unexports it.
    owner: bool,
}

impl SysfsPin {
    pub fn open(root: &Path, number: u32, direction: Direction) -> Result<Self, HardwareFault> {
        let pin_dir = root.join(format!("gpio{number}"));
        if !pin_dir.exists() {
            std::fs::write(root.join("export"), number.to_string())
                .map_err(|_| HardwareFault::GpioExport(number))?;
            // udev needs a moment to fix permissions on the new node
            for _ in 0..20 {
                if pin_dir.join("direction").exists() {
                    break;
                }
                std::thread::sleep(Duration::from_millis(10));
            }
        }
        // "low" configures an output already driven low.
        std::fs::write(pin_dir.join("direction"), direction.as_sysfs())
            .map_err(|_| HardwareFault::GpioDirection(number))?;
        if direction == Direction::In {
            let _ = std::fs::write(pin_dir.join("edge"), "none");
        }
        debug!("GPIO{} opened as {:?}", number, direction);
        Ok(Self {
            number,
            root: root.to_path_buf(),
            value: pin_dir.join("value"),
            owner: true,
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Extra read handle on the same pin.
    pub fn reader(&self) -> Self {
        Self {
            number: self.number,
            root: self.root.clone(),
            value: self.value.clone(),
            owner: false,
        }
    }

    fn read_level(&self) -> Result<bool, GpioError> {
        let raw = std::fs::read(&self.value).map_err(|_| GpioError(HardwareFault::GpioIo(self.number)))?;
        match raw.first() {
            Some(b'1') => Ok(true),
            Some(b'0') => Ok(false),
            _ => Err(GpioError(HardwareFault::GpioIo(self.number))),
        }
    }

    fn write_level(&self, high: bool) -> Result<(), GpioError> {
        std::fs::write(&self.value, if high { "1" } else { "0" })
            .map_err(|_| GpioError(HardwareFault::GpioIo(self.number)))
    }
}

impl Drop for SysfsPin {
    fn drop(&mut self) {
        if self.owner
            && std::fs::write(self.root.join("unexport"), self.number.to_string()).is_err()
        {
            warn!("GPIO{} unexport failed", self.number);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Simulated backend
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct SimPin {
    level: Arc<AtomicBool>,
}

impl SimPin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive the level from outside (simulated button, tests).
    pub fn set_level(&self, high: bool) {
        self.level.store(high, Ordering::Release);
    }

    pub fn level(&self) -> bool {
        self.level.load(Ordering::Acquire)
    }
}

// ───────────────────────────────────────────────────────────────
// GpioPin: either backend
// ───────────────────────────────────────────────────────────────

pub enum GpioPin {
    Sysfs(SysfsPin),
    Sim(SimPin),
}

impl GpioPin {
    /// Open a pin on sysfs, or an in-memory pin when `simulate` is set.
    pub fn open(
        root: &Path,
        number: u32,
        direction: Direction,
        simulate: bool,
    ) -> Result<Self, HardwareFault> {
        if simulate {
            return Ok(Self::Sim(SimPin::new()));
        }
        SysfsPin::open(root, number, direction).map(Self::Sysfs)
    }

    pub fn reader(&self) -> Self {
        match self {
            Self::Sysfs(pin) => Self::Sysfs(pin.reader()),
            Self::Sim(pin) => Self::Sim(pin.clone()),
        }
    }

    /// The simulated level handle, if this is a sim pin.
    pub fn sim(&self) -> Option<&SimPin> {
        match self {
            Self::Sim(pin) => Some(pin),
            Self::Sysfs(_) => None,
        }
    }

    fn read_level(&self) -> Result<bool, GpioError> {
        match self {
            Self::Sysfs(pin) => pin.read_level(),
            Self::Sim(pin) => Ok(pin.level()),
        }
    }

    fn write_level(&self, high: bool) -> Result<(), GpioError> {
        match self {
            Self::Sysfs(pin) => pin.write_level(high),
            Self::Sim(pin) => {
                pin.set_level(high);
                Ok(())
            }
        }
    }
}

impl ErrorType for GpioPin {
    type Error = GpioError;
}

impl InputPin for GpioPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.read_level()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.read_level().map(|high| !high)
    }
}

impl OutputPin for GpioPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write_level(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write_level(true)
    }
}

impl StatefulOutputPin for GpioPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        self.read_level()
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        self.read_level().map(|high| !high)
    }
}
