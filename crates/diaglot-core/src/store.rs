//! Published catalog shared between one rebuilder and many readers.
//!
//! A rebuild derives a complete catalog off to the side and then replaces the
//! published `Arc` under the write lock. Readers clone the `Arc` under the
//! read lock, so they see either the previous generation or the new one,
//! never a mix.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use tracing::info;

use crate::catalog::Catalog;
use crate::derive::build_catalog;
use crate::metric::MetricName;
use crate::model::{DiagnosticData, ReplSetStatus, ServerStatus, SystemMetrics};
use crate::series::TimeSeries;

pub struct TimeSeriesStore {
    published: RwLock<Arc<Catalog>>,
    generation: AtomicU64,
}

impl Default for TimeSeriesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSeriesStore {
    /// A store publishing an initialized, empty catalog (generation 0).
    pub fn new() -> Self {
        Self {
            published: RwLock::new(Arc::new(Catalog::initialize())),
            generation: AtomicU64::new(0),
        }
    }

    /// Derives a new catalog from the given readings and publishes it.
    pub fn rebuild(
        &self,
        server_status: &[ServerStatus],
        system_metrics: &[SystemMetrics],
        repl_set_status: &[ReplSetStatus],
    ) {
        self.rebuild_inner(server_status, system_metrics, repl_set_status, None);
    }

    /// Like [`rebuild`](Self::rebuild), also carrying the batch's server info.
    pub fn rebuild_from(&self, data: &DiagnosticData) {
        self.rebuild_inner(
            &data.server_status,
            &data.system_metrics,
            &data.repl_set_status,
            data.server_info.clone(),
        );
    }

    fn rebuild_inner(
        &self,
        server_status: &[ServerStatus],
        system_metrics: &[SystemMetrics],
        repl_set_status: &[ReplSetStatus],
        server_info: Option<serde_json::Value>,
    ) {
        let start = Instant::now();
        let catalog = Arc::new(build_catalog(
            server_status,
            system_metrics,
            repl_set_status,
            server_info,
        ));
        let (series, points) = (catalog.len(), catalog.point_count());

        let generation = {
            let mut slot = self.published.write().unwrap_or_else(PoisonError::into_inner);
            *slot = catalog;
            self.generation.fetch_add(1, Ordering::AcqRel) + 1
        };

        info!(
            generation,
            server_status = server_status.len(),
            system_metrics = system_metrics.len(),
            repl_set_status = repl_set_status.len(),
            series,
            points,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "catalog rebuilt"
        );
    }

    /// The currently published catalog. Holding the `Arc` gives a consistent
    /// view across several lookups.
    pub fn catalog(&self) -> Arc<Catalog> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The published catalog together with the generation that published it.
    pub fn versioned(&self) -> (u64, Arc<Catalog>) {
        let slot = self.published.read().unwrap_or_else(PoisonError::into_inner);
        (self.generation.load(Ordering::Acquire), Arc::clone(&slot))
    }

    pub fn get(&self, name: &MetricName) -> Option<TimeSeries> {
        self.catalog().get(name).cloned()
    }

    pub fn get_by_name(&self, name: &str) -> Option<TimeSeries> {
        self.catalog().get_by_name(name).cloned()
    }

    /// Number of completed publications.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}
