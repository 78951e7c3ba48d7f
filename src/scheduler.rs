// url_migrator/src/scheduler.rs
// Cancellable fixed-interval scheduler.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::shutdown::Shutdown;

/// Work performed on every tick.
#[async_trait]
pub trait TickHook: Send {
    /// Runs one tick. `shutdown` can be polled to stop early between units of work.
    async fn on_tick(&mut self, tick: u64, shutdown: &Shutdown,);
}

#[derive(Debug, Clone, Copy,)]
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration,) -> Self {
        Self { interval, }
    }

    pub fn interval(&self,) -> Duration {
        self.interval
    }

    /// Sleeps for the interval, then runs the hook, until shutdown is requested.
    ///
    /// Shutdown interrupts the sleep but never a tick in progress. Returns the
    /// number of completed ticks.
    pub async fn run<H: TickHook,>(&self, hook: &mut H, mut shutdown: Shutdown,) -> u64 {
        let mut ticks = 0;
        loop {
            tokio::select! {
                biased;
                _ = shutdown.triggered() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }

            ticks += 1;
            debug!("Running check cycle {}...", ticks);
            hook.on_tick(ticks, &shutdown,).await;

            if shutdown.is_triggered() {
                break;
            }
        }
        ticks
    }
}
