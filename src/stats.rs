// url_migrator/src/stats.rs
// Run statistics accumulated by the migration loop.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use mongodb::bson::DateTime;
use tracing::info;

/// Result of a single pass over one collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq,)]
pub struct PassOutcome {
    pub scanned: u64,
    pub updated: u64,
    pub failed:  u64,
}

#[derive(Debug, Clone,)]
pub struct RunStats {
    pub scanned:    u64,
    /// Updated documents keyed by collection label.
    pub updated:    BTreeMap<String, u64,>,
    pub errors:     u64,
    pub ticks:      u64,
    pub last_check: Option<DateTime,>,
    started:        Instant,
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            scanned:    0,
            updated:    BTreeMap::new(),
            errors:     0,
            ticks:      0,
            last_check: None,
            started:    Instant::now(),
        }
    }

    /// Registers a collection so it is reported even when nothing was updated.
    pub fn track(&mut self, label: &str,) {
        self.updated.entry(label.to_string(),).or_insert(0,);
    }

    pub fn absorb(&mut self, label: &str, outcome: PassOutcome,) {
        self.scanned += outcome.scanned;
        self.errors += outcome.failed;
        *self.updated.entry(label.to_string(),).or_insert(0,) += outcome.updated;
    }

    pub fn record_error(&mut self,) {
        self.errors += 1;
    }

    pub fn record_tick(&mut self,) {
        self.ticks += 1;
        self.last_check = Some(DateTime::now(),);
    }

    pub fn updated_for(&self, label: &str,) -> u64 {
        self.updated.get(label,).copied().unwrap_or(0,)
    }

    pub fn total_updated(&self,) -> u64 {
        self.updated.values().sum()
    }

    pub fn elapsed(&self,) -> Duration {
        self.started.elapsed()
    }

    pub fn log_summary(&self,) {
        let last_check = self
            .last_check
            .and_then(|at| at.try_to_rfc3339_string().ok(),)
            .unwrap_or_else(|| "never".to_string(),);

        info!("{}", "=".repeat(60));
        info!("Service Statistics:");
        info!("  Documents scanned: {}", self.scanned);
        for (label, count,) in &self.updated {
            info!("  {} documents updated: {}", label, count);
        }
        info!("  Total errors: {}", self.errors);
        info!("  Ticks: {}", self.ticks);
        info!("  Last check: {}", last_check);
        info!("  Elapsed: {:.1}s", self.elapsed().as_secs_f64());
        info!("{}", "=".repeat(60));
    }
}
