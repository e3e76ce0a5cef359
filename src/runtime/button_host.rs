//! Button host: light output, dismiss button, backend polling.
//!
//! Producers: the ticker task (poll deadlines), the edge watcher thread
//! (raw button edges) and the signal thread. The control loop is the only
//! consumer and the only writer of channel state. The settle delay of a
//! press is awaited inside the loop, so a press completes before the next
//! event is taken.
//!
//! Failure policy: a light pin that cannot be opened is fatal; a button
//! pin that cannot be opened leaves the host running on light and alarm
//! logic alone.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use embassy_time::Instant;
use log::{info, warn};

use crate::adapters::backend::BackendClient;
use crate::adapters::hardware::HardwareAdapter;
use crate::adapters::log_sink::LogEventSink;
use crate::app::button_channel::ButtonChannel;
use crate::app::ports::{AlarmSignalPort, ButtonPort, DismissalPort, EventSink, LightPort};
use crate::config::SystemConfig;
use crate::drivers::button::EdgeVerdict;
use crate::drivers::edge_watcher::EdgeWatcher;
use crate::drivers::gpio::{Direction, GpioPin};
use crate::drivers::status_light::StatusLight;
use crate::events::{HostEvent, HostQueue};

use super::{HostExecutor, ticker, to_std};

pub fn run(config: &SystemConfig, queue: &'static HostQueue) -> Result<()> {
    let root = Path::new(&config.gpio_root);
    let simulate = config.simulate_hardware;
    if simulate {
        info!("simulated GPIO, no pins touched");
    }

    // ── Pins ──────────────────────────────────────────────────
    let light_pin = GpioPin::open(root, config.light_gpio, Direction::Out, simulate)
        .with_context(|| format!("light GPIO{}", config.light_gpio))?;
    let light = StatusLight::new(light_pin, config.light_gpio)
        .with_context(|| format!("light GPIO{} initial write", config.light_gpio))?;

    let button = match GpioPin::open(root, config.button_gpio, Direction::In, simulate) {
        Ok(pin) => Some(pin),
        Err(fault) => {
            warn!("button unavailable ({}), running without dismiss button", fault);
            None
        }
    };

    let watcher = match &button {
        Some(pin) => match EdgeWatcher::spawn(
            pin.reader(),
            std::time::Duration::from_millis(u64::from(config.edge_sample_ms)),
            queue,
        ) {
            Ok(w) => Some(w),
            Err(e) => {
                warn!("edge watcher not started: {}", e);
                None
            }
        },
        None => None,
    };

    let mut hw = HardwareAdapter::new(light, button);

    // ── Backend + channel ─────────────────────────────────────
    let mut backend = BackendClient::new(config)
        .ok_or_else(|| anyhow!("backend_url {:?} is not http://host[:port]", config.backend_url))?;
    info!("backend at {}", backend.endpoint());

    let mut sink = LogEventSink::new();
    let mut channel = ButtonChannel::new(config);
    channel.start(&mut hw, &mut sink);

    // Startup reachability check; the host runs whether or not it succeeds.
    channel.poll(Instant::now(), &mut backend, &mut hw, &mut sink);

    // ── Event loop ────────────────────────────────────────────
    let executor: HostExecutor<'_> = HostExecutor::new();
    executor
        .spawn(ticker(queue, to_std(config.poll_interval())))
        .detach();

    info!("button host ready, button {}", if hw.has_button() { "armed" } else { "absent" });
    futures_lite::future::block_on(executor.run(control_loop(
        &mut channel,
        &mut hw,
        &mut backend,
        &mut sink,
        queue,
    )));

    // ── Teardown ──────────────────────────────────────────────
    channel.shutdown(&mut hw, &mut sink);
    if let Some(watcher) = watcher {
        watcher.join(to_std(config.shutdown_timeout()));
    }
    info!(
        "button host stopped after {} presses, {} bounces",
        channel.presses(),
        channel.bounces_rejected()
    );
    Ok(())
}

/// Single consumer of `queue`. Returns on shutdown.
pub async fn control_loop<H, B, S>(
    channel: &mut ButtonChannel,
    hw: &mut H,
    backend: &mut B,
    sink: &mut S,
    queue: &'static HostQueue,
) where
    H: LightPort + ButtonPort,
    B: AlarmSignalPort + DismissalPort,
    S: EventSink,
{
    while !queue.shutdown_requested() {
        match queue.next().await {
            HostEvent::PollTick => {
                channel.poll(Instant::now(), backend, hw, sink);
            }
            HostEvent::RawEdge(at) => {
                if let EdgeVerdict::Confirm(pending) = channel.on_raw_edge(at) {
                    let due = pending.observed_at() + channel.settle_delay();
                    let wait = due.saturating_duration_since(Instant::now());
                    async_io_mini::Timer::after(to_std(wait)).await;
                    channel.confirm_press(pending, hw, backend, sink);
                }
            }
            HostEvent::Shutdown => break,
            HostEvent::Frame(_) | HostEvent::FrameStreamClosed => {}
        }
    }
}
