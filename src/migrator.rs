// url_migrator/src/migrator.rs
// The migration loop: per-collection passes, ticks and error containment.

use async_trait::async_trait;
use mongodb::bson::{Bson, DateTime};
use tracing::{debug, error, info, warn};

use crate::config::{CollectionSpec, MigrationConfig};
use crate::error::Result;
use crate::rewrite::UrlRewrite;
use crate::scheduler::{Scheduler, TickHook};
use crate::shutdown::Shutdown;
use crate::stats::{PassOutcome, RunStats};
use crate::store::DocumentStore;

/// Owns the store and the run statistics for the lifetime of the service.
pub struct Migrator<S: DocumentStore,> {
    store:              S,
    config:             MigrationConfig,
    rewrite:            UrlRewrite,
    stats:              RunStats,
    needs_health_check: bool,
}

impl<S: DocumentStore,> Migrator<S,> {
    pub fn new(store: S, config: MigrationConfig,) -> Self {
        let rewrite = UrlRewrite::new(config.old_url.clone(), config.new_url.clone(),);
        let mut stats = RunStats::new();
        for spec in config.collections() {
            stats.track(&spec.label,);
        }
        Self {
            store,
            config,
            rewrite,
            stats,
            needs_health_check: false,
        }
    }

    pub fn stats(&self,) -> &RunStats {
        &self.stats
    }

    /// Scans one collection and rewrites every matching document.
    ///
    /// A failed write is logged and counted in the outcome; only a failed
    /// query aborts the pass.
    pub async fn run_pass(&self, spec: &CollectionSpec, shutdown: &Shutdown,) -> Result<PassOutcome,> {
        let documents = self
            .store
            .find_candidates(&spec.name, &spec.fields, self.rewrite.old(),)
            .await?;

        let mut outcome = PassOutcome {
            scanned: documents.len() as u64,
            ..PassOutcome::default()
        };

        for doc in documents {
            if shutdown.is_triggered() {
                info!("{}: shutdown requested, stopping pass early", spec.label);
                break;
            }

            let Some(id,) = doc.get("_id",).cloned() else {
                warn!("{}: skipping document without _id", spec.label);
                outcome.failed += 1;
                continue;
            };

            let mut changes = self.rewrite.compute_update(&doc, &spec.fields,);
            if changes.is_empty() {
                continue;
            }
            if spec.stamp_updated_at {
                changes.insert(crate::UPDATED_AT_FIELD, Bson::DateTime(DateTime::now(),),);
            }

            match self.store.update_fields(&spec.name, &id, changes,).await {
                Ok((),) => {
                    outcome.updated += 1;
                    info!("Updated {} document: {}", spec.label, id);
                },
                Err(e,) => {
                    outcome.failed += 1;
                    error!("Failed to update {} document {}: {}", spec.label, id, e);
                },
            }
        }

        if outcome.updated > 0 {
            info!("{}: Updated {} documents", spec.label, outcome.updated);
        } else {
            debug!("{}: Updated 0 of {} candidates", spec.label, outcome.scanned);
        }
        Ok(outcome,)
    }

    /// Runs both passes in order. Errors never escape a tick.
    pub async fn run_tick(&mut self, shutdown: &Shutdown,) {
        if self.needs_health_check {
            self.check_health().await;
        }

        let specs = [self.config.groundtruth.clone(), self.config.user_clothes.clone(),];
        let mut summary = Vec::with_capacity(specs.len(),);

        for spec in &specs {
            if shutdown.is_triggered() {
                break;
            }
            match self.run_pass(spec, shutdown,).await {
                Ok(outcome,) => {
                    self.stats.absorb(&spec.label, outcome,);
                    summary.push(format!("{}: {}", spec.label, outcome.updated),);
                },
                Err(e,) => {
                    error!("Error processing {} collection '{}': {}", spec.label, spec.name, e);
                    self.stats.record_error();
                    if e.is_transient() {
                        self.needs_health_check = true;
                    }
                    summary.push(format!("{}: failed", spec.label),);
                },
            }
        }

        self.stats.record_tick();
        if summary.iter().any(|s| !s.ends_with(": 0",),) {
            info!("Check complete - {}", summary.join(", "));
        }
    }

    async fn check_health(&mut self,) {
        self.needs_health_check = false;
        if self.store.is_healthy().await {
            return;
        }

        warn!("Database connection unhealthy, reconnecting");
        if let Err(e,) = self.store.reconnect().await {
            error!("Reconnect failed, retrying next tick: {}", e);
            self.stats.record_error();
            self.needs_health_check = true;
        }
    }

    /// Ticks until shutdown, then logs the final statistics and closes the store.
    pub async fn run(mut self, shutdown: Shutdown,) -> RunStats {
        let scheduler = Scheduler::new(self.config.poll_interval,);
        info!("Polling interval: {} second(s)", scheduler.interval().as_secs());
        info!("Service running. Press Ctrl+C to stop.");

        scheduler.run(&mut self, shutdown,).await;

        self.stats.log_summary();
        let Migrator { store, stats, .. } = self;
        store.close().await;
        stats
    }
}

#[async_trait]
impl<S: DocumentStore,> TickHook for Migrator<S,> {
    async fn on_tick(&mut self, _tick: u64, shutdown: &Shutdown,) {
        self.run_tick(shutdown,).await;
    }
}
