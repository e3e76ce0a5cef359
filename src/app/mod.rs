//! Application core: domain logic, zero I/O.
//!
//! The two reconciliation loops (button and gesture) and the light state
//! machine they drive. All interaction with pins, the backend and the
//! vision feed happens through the **port traits** in [`ports`].

pub mod button_channel;
pub mod events;
pub mod gesture_channel;
pub mod light;
pub mod ports;
pub mod state;
