//! Integration test driver for `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises one subsystem against
//! mock adapters or a loopback backend. No GPIO, camera or real backend
//! is required.

mod backend_tests;
mod button_channel_tests;
mod mock_hw;
mod scenario_tests;
