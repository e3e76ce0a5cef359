//! Pin drivers and input conditioning.

pub mod button;
pub mod edge_watcher;
pub mod gpio;
pub mod status_light;
