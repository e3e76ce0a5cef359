//! OS shutdown signals.
//!
//! A small current-thread tokio runtime on its own thread waits for
//! SIGINT or SIGTERM, then flags the host queue for shutdown. The control
//! loop does the actual teardown.

use std::thread::JoinHandle;

use log::{info, warn};

use crate::events::HostQueue;

/// Spawn the listener. It runs until the first signal or process exit.
pub fn spawn_listener(queue: &'static HostQueue) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("signals".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    warn!("signal runtime unavailable: {}", e);
                    return;
                }
            };
            runtime.block_on(async {
                let name = wait_for_signal().await;
                info!("{} received, shutting down", name);
                queue.request_shutdown();
            });
        })
}

#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{SignalKind, signal};

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = &mut ctrl_c => "SIGINT",
                _ = term.recv() => "SIGTERM",
            }
        }
        Err(e) => {
            warn!("SIGTERM handler not installed: {}", e);
            let _ = ctrl_c.await;
            "SIGINT"
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    let _ = tokio::signal::ctrl_c().await;
    "Ctrl+C"
}
