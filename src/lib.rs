//! Despertador alarm dismissal core.
//!
//! Two independent dismissal channels for a wake-up alarm:
//! a debounced physical button that also drives the alarm light, and an
//! open-hand gesture detector fed by an external vision process. Both
//! poll a backend for the alarm state and notify it on dismissal.
//!
//! Pure logic (`gate`, `gesture`, `monitor`, `fsm`, `app`) is exposed for
//! integration testing; `adapters`, `drivers` and `runtime` hold the host
//! side.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod fsm;
pub mod gate;
pub mod gesture;
pub mod monitor;

pub mod adapters;
pub mod drivers;
pub mod runtime;
