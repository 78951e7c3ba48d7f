// url_migrator/src/shutdown.rs
// Cooperative cancellation shared between the signal listener and the loop.

use tokio::sync::watch;
use tracing::{info, warn};

/// Sending half, held by whoever decides the service should stop.
#[derive(Debug, Clone,)]
pub struct ShutdownTrigger {
    tx: std::sync::Arc<watch::Sender<bool,>,>,
}

/// Receiving half, polled by the loop between ticks and between documents.
#[derive(Debug, Clone,)]
pub struct Shutdown {
    rx: watch::Receiver<bool,>,
}

pub fn channel() -> (ShutdownTrigger, Shutdown,) {
    let (tx, rx,) = watch::channel(false,);
    (
        ShutdownTrigger {
            tx: std::sync::Arc::new(tx,),
        },
        Shutdown { rx, },
    )
}

impl ShutdownTrigger {
    pub fn trigger(&self,) {
        // send_replace never fails, even with every receiver gone.
        self.tx.send_replace(true,);
    }
}

impl Shutdown {
    pub fn is_triggered(&self,) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown has been requested.
    pub async fn triggered(&mut self,) {
        if self.is_triggered() {
            return;
        }
        // The trigger lives as long as the process; a closed channel means stop too.
        let _ = self.rx.wait_for(|stop| *stop,).await;
    }
}

/// Waits for Ctrl-C (or SIGTERM on unix) and fires `trigger`.
///
/// If no handler can be installed the service keeps running and must be
/// stopped externally.
pub async fn listen_for_signals(trigger: ShutdownTrigger,) {
    if !wait_for_signal().await {
        return;
    }
    info!("Shutting down service...");
    trigger.trigger();
}

#[cfg(unix)]
async fn wait_for_signal() -> bool {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate(),) {
        Ok(sigterm,) => sigterm,
        Err(e,) => {
            warn!("Failed to install SIGTERM handler: {}", e);
            return wait_for_ctrl_c().await;
        },
    };

    tokio::select! {
        received = wait_for_ctrl_c() => received,
        _ = sigterm.recv() => true,
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> bool {
    wait_for_ctrl_c().await
}

async fn wait_for_ctrl_c() -> bool {
    match tokio::signal::ctrl_c().await {
        Ok((),) => true,
        Err(e,) => {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
            false
        },
    }
}
