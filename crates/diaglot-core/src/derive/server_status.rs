//! Gauge and rate series from consecutive server status readings.
//!
//! The first reading seeds the chain. Every later reading whose uptime grew
//! compared to the reading right before it emits gauges and per-minute rates
//! against the last accepted reading. A reading whose uptime did not grow is a
//! restart: it emits nothing and is not used as a rate baseline. The first
//! accepted reading after a restart emits gauges only and becomes the new
//! rate baseline.

use tracing::debug;

use crate::catalog::{FixedSeries, fixed_series, push_fixed};
use crate::metric::FixedMetric;
use crate::model::{LatencyInfo, ServerStatus};
use crate::rates::{
    BYTES_PER_GIB, MIB_PER_GIB, MICROS_PER_MILLI, counter_rate, elapsed_minutes, epoch_ms,
    ratio_or_zero,
};

type Gauge = (FixedMetric, fn(&ServerStatus) -> f64);
type Counter = (FixedMetric, fn(&ServerStatus) -> u64);

/// Instantaneous values, recorded as-is (after unit scaling).
const GAUGES: [Gauge; 16] = [
    (FixedMetric::MemResident, |s| s.mem.resident as f64 / MIB_PER_GIB),
    (FixedMetric::MemVirtual, |s| s.mem.virtual_mb as f64 / MIB_PER_GIB),
    (FixedMetric::ConnsAvailable, |s| s.connections.available as f64),
    (FixedMetric::ConnsCurrent, |s| s.connections.current as f64),
    (FixedMetric::QActiveRead, |s| s.global_lock.active_clients.readers as f64),
    (FixedMetric::QActiveWrite, |s| s.global_lock.active_clients.writers as f64),
    (FixedMetric::QQueuedRead, |s| s.global_lock.current_queue.readers as f64),
    (FixedMetric::QQueuedWrite, |s| s.global_lock.current_queue.writers as f64),
    (FixedMetric::LatencyRead, |s| average_latency_ms(&s.op_latencies.reads)),
    (FixedMetric::LatencyWrite, |s| average_latency_ms(&s.op_latencies.writes)),
    (FixedMetric::LatencyCommand, |s| average_latency_ms(&s.op_latencies.commands)),
    (FixedMetric::WtCacheMax, |s| {
        s.wired_tiger.cache.max_bytes_configured as f64 / BYTES_PER_GIB
    }),
    (FixedMetric::WtCacheUsed, |s| {
        s.wired_tiger.cache.currently_in_cache as f64 / BYTES_PER_GIB
    }),
    (FixedMetric::WtCacheDirty, |s| {
        s.wired_tiger.cache.tracked_dirty_bytes as f64 / BYTES_PER_GIB
    }),
    (FixedMetric::TicketAvailRead, |s| {
        s.wired_tiger.concurrent_transactions.read.available as f64
    }),
    (FixedMetric::TicketAvailWrite, |s| {
        s.wired_tiger.concurrent_transactions.write.available as f64
    }),
];

/// Cumulative counters, recorded as per-minute rates.
const COUNTERS: [Counter; 15] = [
    (FixedMetric::MemPageFaults, |s| s.extra_info.page_faults),
    (FixedMetric::ConnsCreatedPerMinute, |s| s.connections.total_created),
    (FixedMetric::OpsQuery, |s| s.op_counters.query),
    (FixedMetric::OpsInsert, |s| s.op_counters.insert),
    (FixedMetric::OpsUpdate, |s| s.op_counters.update),
    (FixedMetric::OpsDelete, |s| s.op_counters.delete),
    (FixedMetric::OpsGetmore, |s| s.op_counters.getmore),
    (FixedMetric::OpsCommand, |s| s.op_counters.command),
    (FixedMetric::ScanKeys, |s| s.metrics.query_executor.scanned),
    (FixedMetric::ScanObjects, |s| s.metrics.query_executor.scanned_objects),
    (FixedMetric::ScanSort, |s| s.metrics.operation.scan_and_order),
    (FixedMetric::WtModifiedEvicted, |s| s.wired_tiger.cache.modified_pages_evicted),
    (FixedMetric::WtUnmodifiedEvicted, |s| s.wired_tiger.cache.unmodified_pages_evicted),
    (FixedMetric::WtReadInCache, |s| s.wired_tiger.cache.pages_read_into_cache),
    (FixedMetric::WtWrittenFromCache, |s| s.wired_tiger.cache.pages_written_from_cache),
];

/// Fixed metrics this deriver fills.
pub fn server_status_metrics() -> impl Iterator<Item = FixedMetric> {
    GAUGES
        .iter()
        .map(|(m, _)| *m)
        .chain(COUNTERS.iter().map(|(m, _)| *m))
}

/// Average latency in milliseconds; 0 when no operations were recorded.
fn average_latency_ms(l: &LatencyInfo) -> f64 {
    ratio_or_zero(l.latency as f64, l.ops as f64) / MICROS_PER_MILLI
}

/// Builds the server status series from readings in chronological order.
pub fn derive_server_status(snapshots: &[ServerStatus]) -> FixedSeries {
    let mut out = fixed_series(server_status_metrics());

    let Some((first, rest)) = snapshots.split_first() else {
        return out;
    };

    let mut prev_uptime = first.uptime;
    let mut baseline = first;
    // Set between a restart and the next accepted reading.
    let mut restarted = false;

    for (i, stat) in rest.iter().enumerate() {
        if stat.uptime <= prev_uptime {
            debug!(
                snapshot_idx = i + 1,
                uptime = stat.uptime,
                prev_uptime,
                "server status: restart detected, sample skipped"
            );
            prev_uptime = stat.uptime;
            restarted = true;
            continue;
        }
        prev_uptime = stat.uptime;

        let t = epoch_ms(&stat.local_time);
        for (metric, gauge) in GAUGES {
            push_fixed(&mut out, metric, gauge(stat), t);
        }

        if restarted {
            debug!(
                snapshot_idx = i + 1,
                "server status: first reading after restart, rates skipped"
            );
            restarted = false;
            baseline = stat;
            continue;
        }

        let minutes = elapsed_minutes(&baseline.local_time, &stat.local_time);
        for (metric, counter) in COUNTERS {
            match counter_rate(counter(stat), counter(baseline), minutes) {
                Some(rate) => push_fixed(&mut out, metric, rate, t),
                None => debug!(
                    snapshot_idx = i + 1,
                    metric = %metric,
                    "server status: counter regressed, rate skipped"
                ),
            }
        }

        baseline = stat;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    const T0: i64 = 1_714_557_600;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(T0 + secs, 0).unwrap()
    }

    fn ss(uptime: u64, secs: i64, inserts: u64) -> ServerStatus {
        let mut s = ServerStatus {
            uptime,
            local_time: at(secs),
            ..Default::default()
        };
        s.op_counters.insert = inserts;
        s
    }

    fn values(out: &FixedSeries, m: FixedMetric) -> Vec<f64> {
        out[&m].datapoints.iter().map(|dp| dp.value).collect()
    }

    #[test]
    fn every_server_metric_present_for_empty_input() {
        let out = derive_server_status(&[]);
        assert_eq!(out.len(), GAUGES.len() + COUNTERS.len());
        assert!(out.values().all(|ts| ts.is_empty()));
    }

    #[test]
    fn single_reading_emits_nothing() {
        let out = derive_server_status(&[ss(10, 0, 100)]);
        assert!(out.values().all(|ts| ts.is_empty()));
    }

    #[test]
    fn insert_rate_over_one_minute() {
        let out = derive_server_status(&[ss(10, 0, 100), ss(70, 60, 160)]);
        let ins = &out[&FixedMetric::OpsInsert];
        assert_eq!(ins.len(), 1);
        assert!((ins.datapoints[0].value - 60.0).abs() < 1e-9);
        assert_eq!(ins.datapoints[0].timestamp_ms, (T0 + 60) * 1000);
    }

    #[test]
    fn rates_are_per_minute() {
        let out = derive_server_status(&[ss(10, 0, 100), ss(130, 120, 160)]);
        assert!((values(&out, FixedMetric::OpsInsert)[0] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn zero_elapsed_time_gives_zero_rate() {
        let out = derive_server_status(&[ss(10, 0, 100), ss(11, 0, 160)]);
        assert_eq!(values(&out, FixedMetric::OpsInsert), vec![0.0]);
    }

    #[test]
    fn gauges_are_scaled() {
        let mut b = ss(70, 60, 0);
        b.mem.resident = 2048;
        b.mem.virtual_mb = 512;
        b.wired_tiger.cache.max_bytes_configured = 3 << 30;
        b.wired_tiger.cache.tracked_dirty_bytes = 1 << 29;
        b.connections.current = 12;
        b.global_lock.current_queue.writers = 4;
        b.wired_tiger.concurrent_transactions.read.available = 127;

        let out = derive_server_status(&[ss(10, 0, 0), b]);
        assert_eq!(values(&out, FixedMetric::MemResident), vec![2.0]);
        assert_eq!(values(&out, FixedMetric::MemVirtual), vec![0.5]);
        assert_eq!(values(&out, FixedMetric::WtCacheMax), vec![3.0]);
        assert_eq!(values(&out, FixedMetric::WtCacheDirty), vec![0.5]);
        assert_eq!(values(&out, FixedMetric::ConnsCurrent), vec![12.0]);
        assert_eq!(values(&out, FixedMetric::QQueuedWrite), vec![4.0]);
        assert_eq!(values(&out, FixedMetric::TicketAvailRead), vec![127.0]);
    }

    #[test]
    fn latency_average_and_zero_ops() {
        let mut b = ss(70, 60, 0);
        b.op_latencies.reads = LatencyInfo {
            latency: 50_000,
            ops: 10,
        };
        b.op_latencies.writes = LatencyInfo {
            latency: 999,
            ops: 0,
        };
        let out = derive_server_status(&[ss(10, 0, 0), b]);
        assert_eq!(values(&out, FixedMetric::LatencyRead), vec![5.0]);
        assert_eq!(values(&out, FixedMetric::LatencyWrite), vec![0.0]);
        assert_eq!(values(&out, FixedMetric::LatencyCommand), vec![0.0]);
    }

    #[test]
    fn restart_is_skipped_and_not_a_baseline() {
        let seq = [
            ss(10, 0, 100),
            ss(70, 60, 160),
            // restart: uptime dropped, counters reset
            ss(5, 120, 10),
            ss(65, 180, 70),
            ss(125, 240, 130),
        ];
        let out = derive_server_status(&seq);

        let conns = &out[&FixedMetric::ConnsCurrent];
        let ts: Vec<i64> = conns.datapoints.iter().map(|dp| dp.timestamp_ms).collect();
        assert_eq!(ts, vec![(T0 + 60) * 1000, (T0 + 180) * 1000, (T0 + 240) * 1000]);

        // 180 is the first reading after the restart: gauges only.
        let ins = &out[&FixedMetric::OpsInsert];
        let ts: Vec<i64> = ins.datapoints.iter().map(|dp| dp.timestamp_ms).collect();
        assert_eq!(ts, vec![(T0 + 60) * 1000, (T0 + 240) * 1000]);
        assert_eq!(values(&out, FixedMetric::OpsInsert), vec![60.0, 60.0]);
    }

    #[test]
    fn no_rate_across_restart_even_when_counter_grew() {
        let seq = [
            ss(10, 0, 100),
            ss(70, 60, 160),
            ss(5, 120, 10),
            // counter already past its pre-restart value
            ss(65, 180, 200),
            ss(125, 240, 260),
        ];
        let out = derive_server_status(&seq);
        let ins = &out[&FixedMetric::OpsInsert];
        let ts: Vec<i64> = ins.datapoints.iter().map(|dp| dp.timestamp_ms).collect();
        assert_eq!(ts, vec![(T0 + 60) * 1000, (T0 + 240) * 1000]);
        assert_eq!(values(&out, FixedMetric::OpsInsert), vec![60.0, 60.0]);
        assert_eq!(out[&FixedMetric::ConnsCurrent].len(), 3);
    }

    #[test]
    fn unchanged_uptime_is_a_restart() {
        let out = derive_server_status(&[ss(10, 0, 100), ss(10, 60, 160)]);
        assert!(out[&FixedMetric::OpsInsert].is_empty());
        assert!(out[&FixedMetric::MemResident].is_empty());
    }

    #[test]
    fn point_count_bounded_by_pairs() {
        let seq: Vec<ServerStatus> = (0..10)
            .map(|i| ss(10 + 60 * i as u64, 60 * i, 100 * i as u64))
            .collect();
        let out = derive_server_status(&seq);
        for ts in out.values() {
            assert!(ts.len() <= seq.len() - 1, "{} has {} points", ts.target, ts.len());
        }
        assert_eq!(out[&FixedMetric::OpsInsert].len(), 9);
    }

    #[test]
    fn cache_eviction_rates() {
        let mut a = ss(10, 0, 0);
        a.wired_tiger.cache.pages_read_into_cache = 1000;
        let mut b = ss(130, 120, 0);
        b.wired_tiger.cache.pages_read_into_cache = 1600;
        b.connections.total_created = 20;
        let out = derive_server_status(&[a, b]);
        assert_eq!(values(&out, FixedMetric::WtReadInCache), vec![300.0]);
        assert_eq!(values(&out, FixedMetric::ConnsCreatedPerMinute), vec![10.0]);
    }
}
