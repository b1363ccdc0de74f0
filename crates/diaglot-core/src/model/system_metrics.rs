//! Host system metrics readings.
//!
//! These structures carry the cumulative CPU and block device counters the
//! database samples from the host. All counters only grow while the host is
//! up; rates and percentages are derived from deltas between readings.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One `systemMetrics` reading.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct SystemMetrics {
    /// Time the reading was taken.
    pub start: DateTime<Utc>,

    pub cpu: CpuCounters,

    /// Per-device counters keyed by device label (sda, nvme0n1, ...).
    /// Ordered map so iteration is deterministic across rebuilds.
    pub disks: BTreeMap<String, DiskCounters>,
}

/// Cumulative CPU time per state, summed over all cores (milliseconds).
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct CpuCounters {
    pub idle_ms: u64,
    pub iowait_ms: u64,
    pub nice_ms: u64,
    pub softirq_ms: u64,
    pub steal_ms: u64,
    pub system_ms: u64,
    pub user_ms: u64,
}

impl CpuCounters {
    /// Sum of all seven state counters, saturating at `u64::MAX`.
    pub fn total_ms(&self) -> u64 {
        [
            self.iowait_ms,
            self.nice_ms,
            self.softirq_ms,
            self.steal_ms,
            self.system_ms,
            self.user_ms,
        ]
        .into_iter()
        .fold(self.idle_ms, u64::saturating_add)
    }
}

/// Cumulative I/O counters for one block device.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct DiskCounters {
    /// Read operations completed.
    pub reads: u64,

    /// Write operations completed.
    pub writes: u64,

    /// Time spent reading (milliseconds).
    pub read_time_ms: u64,

    /// Time spent writing (milliseconds).
    pub write_time_ms: u64,

    /// Time the device had I/O in flight (milliseconds).
    pub io_time_ms: u64,
}

impl DiskCounters {
    /// Completed operations, reads plus writes.
    pub fn io_count(&self) -> u64 {
        self.reads.saturating_add(self.writes)
    }

    /// Time spent servicing reads and writes (milliseconds).
    pub fn rw_time_ms(&self) -> u64 {
        self.read_time_ms.saturating_add(self.write_time_ms)
    }
}
