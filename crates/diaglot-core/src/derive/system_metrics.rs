//! CPU breakdown and per-disk utilization/IOPS from system metrics readings.
//!
//! Every consecutive pair of readings contributes at most one point per
//! series, timestamped with the later reading.

use std::collections::BTreeMap;

use tracing::debug;

use crate::catalog::{FixedSeries, fixed_series, push_fixed};
use crate::metric::FixedMetric;
use crate::model::{CpuCounters, DiskCounters, SystemMetrics};
use crate::rates::{counter_rate, delta, elapsed_secs, epoch_ms, percent, safe_ratio};
use crate::series::DiskStat;

/// Output of [`derive_system_metrics`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SystemSeries {
    /// One series per CPU state.
    pub cpu: FixedSeries,
    /// Per-device series keyed by device label.
    pub disks: BTreeMap<String, DiskStat>,
}

const CPU_STATES: [(FixedMetric, fn(&CpuCounters) -> u64); 7] = [
    (FixedMetric::CpuIdle, |c| c.idle_ms),
    (FixedMetric::CpuIowait, |c| c.iowait_ms),
    (FixedMetric::CpuNice, |c| c.nice_ms),
    (FixedMetric::CpuSoftirq, |c| c.softirq_ms),
    (FixedMetric::CpuSteal, |c| c.steal_ms),
    (FixedMetric::CpuSystem, |c| c.system_ms),
    (FixedMetric::CpuUser, |c| c.user_ms),
];

/// Busy percentage of a device between two readings.
///
/// `None` when no read/write time elapsed, when a counter regressed, or when
/// the result is outside 0..=100.
pub fn disk_utilization(curr: &DiskCounters, prev: &DiskCounters) -> Option<f64> {
    let total_ms = delta(curr.rw_time_ms(), prev.rw_time_ms())?;
    let io_ms = delta(curr.io_time_ms, prev.io_time_ms)?;
    let util = percent(io_ms, total_ms)?;
    (util <= 100.0).then_some(util)
}

/// Builds CPU and disk series from readings in chronological order.
pub fn derive_system_metrics(snapshots: &[SystemMetrics]) -> SystemSeries {
    let mut out = SystemSeries {
        cpu: fixed_series(CPU_STATES.iter().map(|(m, _)| *m)),
        disks: BTreeMap::new(),
    };

    if let Some(first) = snapshots.first() {
        for device in first.disks.keys() {
            out.disks.insert(device.clone(), DiskStat::new(device));
        }
    }

    for (i, pair) in snapshots.windows(2).enumerate() {
        let (prev, curr) = (&pair[0], &pair[1]);
        let t = epoch_ms(&curr.start);
        let secs = elapsed_secs(&prev.start, &curr.start);

        for (device, counters) in &curr.disks {
            let Some(prev_counters) = prev.disks.get(device) else {
                continue;
            };
            let stat = out
                .disks
                .entry(device.clone())
                .or_insert_with(|| DiskStat::new(device));

            match disk_utilization(counters, prev_counters) {
                Some(util) => stat.utilization.push(util, t),
                None => debug!(
                    snapshot_idx = i + 1,
                    device = %device,
                    "system metrics: no utilization for this interval"
                ),
            }
            match counter_rate(counters.io_count(), prev_counters.io_count(), secs) {
                Some(iops) => stat.iops.push(iops, t),
                None => debug!(
                    snapshot_idx = i + 1,
                    device = %device,
                    "system metrics: io counter regressed"
                ),
            }
        }

        let Some(d_total) = delta(curr.cpu.total_ms(), prev.cpu.total_ms()) else {
            debug!(snapshot_idx = i + 1, "system metrics: cpu counters regressed");
            continue;
        };
        if d_total == 0 {
            debug!(snapshot_idx = i + 1, "system metrics: no cpu time elapsed");
            continue;
        }
        for (metric, state) in CPU_STATES {
            let pct = delta(state(&curr.cpu), state(&prev.cpu))
                .and_then(|d| safe_ratio(100.0 * d as f64, d_total as f64));
            if let Some(pct) = pct {
                push_fixed(&mut out.cpu, metric, pct, t);
            }
        }
    }

    out
}
