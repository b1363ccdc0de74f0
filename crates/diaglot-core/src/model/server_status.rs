//! Server status readings.
//!
//! Each structure mirrors a sub-document of the `serverStatus` command output.
//! Field names follow the database's own keys, so a collector can hand the raw
//! JSON over without reshaping it. Sub-documents that a server does not report
//! deserialize to zeroed defaults.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One `serverStatus` reading.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerStatus {
    /// Process uptime in seconds. Drops when the process restarts.
    pub uptime: u64,

    /// Wall-clock time on the server when the reading was taken.
    pub local_time: DateTime<Utc>,

    pub mem: MemInfo,

    pub connections: ConnectionsInfo,

    pub global_lock: GlobalLockInfo,

    pub op_latencies: OpLatenciesInfo,

    pub wired_tiger: WiredTigerInfo,

    /// Cumulative operation counters since process start.
    #[serde(rename = "opcounters")]
    pub op_counters: OpCountersInfo,

    pub metrics: MetricsInfo,

    #[serde(rename = "extra_info")]
    pub extra_info: ExtraInfo,
}

/// Process memory usage.
///
/// Source: `serverStatus.mem`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct MemInfo {
    /// Resident set size (MiB).
    pub resident: u64,

    /// Virtual memory size (MiB).
    #[serde(rename = "virtual")]
    pub virtual_mb: u64,
}

/// Connection counters.
///
/// Source: `serverStatus.connections`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectionsInfo {
    /// Currently open incoming connections.
    pub current: u64,

    /// Remaining connection slots.
    pub available: u64,

    /// Cumulative number of connections created since process start.
    pub total_created: u64,
}

/// Readers/writers pair used by the global lock statistics.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct ReadersWriters {
    pub readers: u64,
    pub writers: u64,
}

/// Global lock queue depths.
///
/// Source: `serverStatus.globalLock`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalLockInfo {
    /// Clients currently performing reads/writes.
    pub active_clients: ReadersWriters,

    /// Clients waiting for the lock.
    pub current_queue: ReadersWriters,
}

/// Cumulative latency histogram totals for one operation class.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct LatencyInfo {
    /// Total latency (microseconds).
    pub latency: u64,

    /// Number of operations the latency total covers.
    pub ops: u64,
}

/// Source: `serverStatus.opLatencies`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct OpLatenciesInfo {
    pub reads: LatencyInfo,
    pub writes: LatencyInfo,
    pub commands: LatencyInfo,
}

/// Storage engine cache statistics.
///
/// Source: `serverStatus.wiredTiger.cache`. The engine reports these
/// under human-readable keys containing spaces.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct CacheInfo {
    /// Configured cache size (bytes).
    #[serde(rename = "maximum bytes configured")]
    pub max_bytes_configured: u64,

    /// Bytes currently held in the cache.
    #[serde(rename = "bytes currently in the cache")]
    pub currently_in_cache: u64,

    /// Dirty bytes tracked in the cache.
    #[serde(rename = "tracked dirty bytes in the cache")]
    pub tracked_dirty_bytes: u64,

    /// Cumulative count of modified pages evicted.
    #[serde(rename = "modified pages evicted")]
    pub modified_pages_evicted: u64,

    /// Cumulative count of unmodified pages evicted.
    #[serde(rename = "unmodified pages evicted")]
    pub unmodified_pages_evicted: u64,

    /// Cumulative count of pages read into the cache.
    #[serde(rename = "pages read into cache")]
    pub pages_read_into_cache: u64,

    /// Cumulative count of pages written from the cache.
    #[serde(rename = "pages written from cache")]
    pub pages_written_from_cache: u64,
}

/// Available tickets for one ticket pool.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct TicketInfo {
    pub out: u64,
    pub available: u64,
    #[serde(rename = "totalTickets")]
    pub total_tickets: u64,
}

/// Source: `serverStatus.wiredTiger.concurrentTransactions`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct ConcurrentTransactionsInfo {
    pub read: TicketInfo,
    pub write: TicketInfo,
}

/// Source: `serverStatus.wiredTiger`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct WiredTigerInfo {
    pub cache: CacheInfo,
    pub concurrent_transactions: ConcurrentTransactionsInfo,
}

/// Cumulative operation counters.
///
/// Source: `serverStatus.opcounters`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct OpCountersInfo {
    pub query: u64,
    pub insert: u64,
    pub update: u64,
    pub delete: u64,
    pub getmore: u64,
    pub command: u64,
}

/// Source: `serverStatus.metrics.queryExecutor`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryExecutorInfo {
    /// Cumulative index keys scanned.
    pub scanned: u64,

    /// Cumulative documents scanned.
    pub scanned_objects: u64,
}

/// Source: `serverStatus.metrics.operation`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct OperationInfo {
    /// Cumulative queries that could not use an index for sorting.
    pub scan_and_order: u64,
}

/// Source: `serverStatus.metrics`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct MetricsInfo {
    pub query_executor: QueryExecutorInfo,
    pub operation: OperationInfo,
}

/// Source: `serverStatus.extra_info`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct ExtraInfo {
    /// Cumulative page faults since process start.
    pub page_faults: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_database_keys() {
        let json = r#"{
            "uptime": 3600,
            "localTime": "2024-05-01T10:00:00Z",
            "mem": {"resident": 2048, "virtual": 4096},
            "connections": {"current": 12, "available": 800, "totalCreated": 340},
            "globalLock": {
                "activeClients": {"readers": 1, "writers": 2},
                "currentQueue": {"readers": 3, "writers": 4}
            },
            "opLatencies": {"reads": {"latency": 5000, "ops": 10}},
            "wiredTiger": {
                "cache": {
                    "maximum bytes configured": 1073741824,
                    "modified pages evicted": 7
                },
                "concurrentTransactions": {"read": {"available": 127}}
            },
            "opcounters": {"insert": 42},
            "metrics": {
                "queryExecutor": {"scanned": 9, "scannedObjects": 8},
                "operation": {"scanAndOrder": 1}
            },
            "extra_info": {"page_faults": 5}
        }"#;

        let ss: ServerStatus = serde_json::from_str(json).unwrap();
        assert_eq!(ss.uptime, 3600);
        assert_eq!(ss.mem.virtual_mb, 4096);
        assert_eq!(ss.connections.total_created, 340);
        assert_eq!(ss.global_lock.current_queue.writers, 4);
        assert_eq!(ss.op_latencies.reads.ops, 10);
        assert_eq!(ss.op_latencies.commands, LatencyInfo::default());
        assert_eq!(ss.wired_tiger.cache.max_bytes_configured, 1 << 30);
        assert_eq!(ss.wired_tiger.cache.modified_pages_evicted, 7);
        assert_eq!(ss.wired_tiger.concurrent_transactions.read.available, 127);
        assert_eq!(ss.op_counters.insert, 42);
        assert_eq!(ss.metrics.query_executor.scanned_objects, 8);
        assert_eq!(ss.metrics.operation.scan_and_order, 1);
        assert_eq!(ss.extra_info.page_faults, 5);
    }

    #[test]
    fn missing_sections_default_to_zero() {
        let ss: ServerStatus =
            serde_json::from_str(r#"{"uptime": 1, "localTime": "2024-05-01T10:00:00Z"}"#).unwrap();
        assert_eq!(ss.connections, ConnectionsInfo::default());
        assert_eq!(ss.wired_tiger, WiredTigerInfo::default());
    }
}
