//! Snapshot models for the three diagnostic sources.
//!
//! - [`server_status`]: database server counters and gauges (`serverStatus`)
//! - [`system_metrics`]: host CPU and block device counters (`systemMetrics`)
//! - [`replication`]: replica set member states and optimes (`replSetGetStatus`)
//! - [`diagnostic`]: one batch bundling all three sequences
//!
//! Snapshots are owned by the caller. Derivers only borrow them for the
//! duration of one rebuild.

mod diagnostic;
mod replication;
mod server_status;
mod system_metrics;

pub use diagnostic::DiagnosticData;
pub use replication::{MemberState, MemberStatus, OpTime, ReplSetStatus, Timestamp};
pub use server_status::{
    CacheInfo, ConcurrentTransactionsInfo, ConnectionsInfo, ExtraInfo, GlobalLockInfo,
    LatencyInfo, MemInfo, MetricsInfo, OpCountersInfo, OpLatenciesInfo, OperationInfo,
    QueryExecutorInfo, ReadersWriters, ServerStatus, TicketInfo, WiredTigerInfo,
};
pub use system_metrics::{CpuCounters, DiskCounters, SystemMetrics};
