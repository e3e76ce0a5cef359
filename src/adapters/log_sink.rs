//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by rendering application events as tagged
//! one-liners through the `log` facade. Outages and failed dismissals go
//! out at `warn`, everything else at `info`.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Default)]
pub struct LogEventSink {
    emitted: u64,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.emitted += 1;
        match event {
            AppEvent::Started(channel) => {
                info!("START | channel={}", channel);
            }
            AppEvent::AlarmActivated { alarm_time } => {
                info!(
                    "ALARM | active, alarm_time={}",
                    alarm_time.as_deref().unwrap_or("?")
                );
            }
            AppEvent::AlarmCleared => {
                info!("ALARM | cleared");
            }
            AppEvent::AuthorityLost(e) => {
                warn!("AUTH | unreachable: {}, keeping last known alarm state", e);
            }
            AppEvent::AuthorityRestored => {
                info!("AUTH | reachable");
            }
            AppEvent::LightChanged { from, to } => {
                info!("LIGHT | {:?} -> {:?}", from, to);
            }
            AppEvent::LightReasserted => {
                warn!("LIGHT | found off while alarm active, driven on again");
            }
            AppEvent::LightFault(fault) => {
                error!("LIGHT | {}", fault);
            }
            AppEvent::ButtonPressed => {
                info!("BUTTON | press confirmed");
            }
            AppEvent::ButtonBounce => {
                info!("BUTTON | bounce rejected");
            }
            AppEvent::GestureDetected { seq } => {
                info!("GESTURE | open hand in frame {}", seq);
            }
            AppEvent::SnapshotSaved { path } => {
                info!("GESTURE | snapshot {}", path);
            }
            AppEvent::DismissalSent { channel, applied } => {
                if *applied {
                    info!("DISMISS | {} accepted", channel);
                } else {
                    info!("DISMISS | {} accepted, alarm was already off", channel);
                }
            }
            AppEvent::DismissalFailed { channel, error } => {
                warn!("DISMISS | {} failed: {}", channel, error);
            }
            AppEvent::DismissalSuppressed(channel) => {
                warn!("DISMISS | {} suppressed, authority unreachable", channel);
            }
            AppEvent::ShuttingDown => {
                info!("STOP | forcing light off");
            }
        }
    }
}
