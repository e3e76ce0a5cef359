//! Gesture host: landmark feed, state file, gesture dismissals.
//!
//! A reader thread pulls frames from the feed and queues them; the ticker
//! keeps the state-file poll going between frames. The control loop runs
//! [`GestureChannel::process_frame`] per frame, in arrival order.
//!
//! Without a working feed there is no channel left, so a feed that cannot
//! be opened, fails, or ends is fatal for this host.

use std::thread::JoinHandle;

use anyhow::{Context, Result, anyhow, bail};
use embassy_time::Instant;
use log::{info, warn};

use crate::adapters::backend::BackendClient;
use crate::adapters::frames::BoxedFeed;
use crate::adapters::log_sink::LogEventSink;
use crate::adapters::snapshot::SnapshotStore;
use crate::adapters::state_file::StateFileSource;
use crate::app::gesture_channel::GestureChannel;
use crate::app::ports::{AlarmSignalPort, DismissalPort, EventSink, FramePort, SnapshotPort};
use crate::config::SystemConfig;
use crate::drivers::edge_watcher::join_bounded;
use crate::events::{HostEvent, HostQueue};

use super::{HostExecutor, ticker, to_std};

/// Why the control loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Shutdown,
    FeedClosed,
}

pub fn run(config: &SystemConfig, queue: &'static HostQueue) -> Result<()> {
    let feed = BoxedFeed::open(&config.frame_source)
        .with_context(|| format!("frame source {:?}", config.frame_source))?;
    let reader = spawn_reader(feed, queue).context("frame reader thread")?;

    let mut state = StateFileSource::new(&config.state_file);
    let mut backend = BackendClient::new(config)
        .ok_or_else(|| anyhow!("backend_url {:?} is not http://host[:port]", config.backend_url))?;
    let mut snapshots = SnapshotStore::new(&config.images_dir);
    let mut sink = LogEventSink::new();

    let mut channel = GestureChannel::new(config);
    channel.start(&mut sink);
    channel.poll(Instant::now(), &mut state, &mut sink);

    let executor: HostExecutor<'_> = HostExecutor::new();
    executor
        .spawn(ticker(queue, to_std(config.gesture_poll_interval())))
        .detach();

    info!(
        "gesture host ready, state {}, snapshots in {}",
        state.path().display(),
        snapshots.dir().display()
    );
    let exit = futures_lite::future::block_on(executor.run(control_loop(
        &mut channel,
        &mut state,
        &mut backend,
        &mut snapshots,
        &mut sink,
        queue,
    )));

    info!(
        "gesture host stopped after {} frames, {} detections",
        channel.frames(),
        channel.detections()
    );
    // A reader blocked on stdin cannot be interrupted; it is left detached.
    join_bounded(reader, to_std(config.shutdown_timeout()));

    if exit == LoopExit::FeedClosed {
        bail!("frame feed ended");
    }
    Ok(())
}

/// Reader thread. Frames wait for queue room rather than being dropped.
pub fn spawn_reader(mut feed: BoxedFeed, queue: &'static HostQueue) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("frame-reader".into())
        .spawn(move || {
            while !queue.shutdown_requested() {
                match feed.next_frame() {
                    Ok(Some(frame)) => {
                        if !queue.push_blocking(HostEvent::Frame(frame)) {
                            return;
                        }
                    }
                    Ok(None) => {
                        info!("frame feed reached end of stream");
                        break;
                    }
                    Err(fault) => {
                        warn!("frame feed: {}", fault);
                        break;
                    }
                }
            }
            queue.push_blocking(HostEvent::FrameStreamClosed);
        })
}

/// Single consumer of `queue`.
pub async fn control_loop<A, N, P, S>(
    channel: &mut GestureChannel,
    state: &mut A,
    notifier: &mut N,
    snapshots: &mut P,
    sink: &mut S,
    queue: &'static HostQueue,
) -> LoopExit
where
    A: AlarmSignalPort,
    N: DismissalPort,
    P: SnapshotPort,
    S: EventSink,
{
    while !queue.shutdown_requested() {
        match queue.next().await {
            HostEvent::PollTick => {
                channel.poll_if_due(Instant::now(), state, sink);
            }
            HostEvent::Frame(frame) => {
                channel.process_frame(Instant::now(), &frame, state, notifier, snapshots, sink);
            }
            HostEvent::FrameStreamClosed => return LoopExit::FeedClosed,
            HostEvent::Shutdown => break,
            HostEvent::RawEdge(_) => {}
        }
    }
    LoopExit::Shutdown
}
