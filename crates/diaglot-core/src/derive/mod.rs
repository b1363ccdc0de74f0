//! Derivers turn raw reading sequences into time series.
//!
//! Each deriver is a pure fold over readings in chronological order. Anomalies
//! (restarts, regressed counters, missing primaries, impossible utilization)
//! drop points and are reported at `debug` level; derivation never fails.

mod replication;
mod server_status;
mod system_metrics;

pub use replication::{ReplicationSeries, derive_replication_lags, short_member_name};
pub use server_status::{derive_server_status, server_status_metrics};
pub use system_metrics::{SystemSeries, derive_system_metrics, disk_utilization};

use crate::catalog::Catalog;
use crate::model::{ReplSetStatus, ServerStatus, SystemMetrics};

/// Runs every deriver and assembles a fresh catalog.
pub fn build_catalog(
    server_status: &[ServerStatus],
    system_metrics: &[SystemMetrics],
    repl_set_status: &[ReplSetStatus],
    server_info: Option<serde_json::Value>,
) -> Catalog {
    let mut catalog = Catalog::initialize();
    catalog.merge_fixed(derive_server_status(server_status));
    catalog.merge_system(derive_system_metrics(system_metrics));
    catalog.merge_replication(derive_replication_lags(repl_set_status));
    catalog.set_server_info(server_info);
    catalog
}
