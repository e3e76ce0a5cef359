//! Panic diagnostics.
//!
//! A custom panic hook logs the reason, location and thread through the
//! `log` facade so it lands next to the host's own log lines. Unwinding
//! then drops the [`StatusLight`](crate::drivers::status_light::StatusLight),
//! which drives the light off.

use std::any::Any;

/// Best-effort text of a panic payload.
pub fn panic_reason(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}

pub fn install_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        let reason = panic_reason(info.payload());
        let thread = std::thread::current();
        let name = thread.name().unwrap_or("unnamed");
        match info.location() {
            Some(loc) => log::error!(
                "PANIC in thread '{}' at {}:{}: {}",
                name,
                loc.file(),
                loc.line(),
                reason
            ),
            None => log::error!("PANIC in thread '{}': {}", name, reason),
        }
    }));
}
