//! Metric identity.
//!
//! A metric is either one of the fixed chart legends or a dynamic series
//! derived from an identity field of the input (a disk device label or a
//! replica set member). Keeping the identity as a tagged union means a member
//! called `cpu_idle` can never overwrite the `cpu_idle` chart; the rendered
//! string form only exists at the query boundary.

use std::fmt;

/// The closed vocabulary of fixed chart legends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FixedMetric {
    MemResident,
    MemVirtual,
    MemPageFaults,
    ConnsAvailable,
    ConnsCurrent,
    ConnsCreatedPerMinute,
    OpsQuery,
    OpsInsert,
    OpsUpdate,
    OpsDelete,
    OpsGetmore,
    OpsCommand,
    QActiveRead,
    QActiveWrite,
    QQueuedRead,
    QQueuedWrite,
    LatencyRead,
    LatencyWrite,
    LatencyCommand,
    ScanKeys,
    ScanObjects,
    ScanSort,
    WtCacheMax,
    WtCacheUsed,
    WtCacheDirty,
    WtModifiedEvicted,
    WtUnmodifiedEvicted,
    WtReadInCache,
    WtWrittenFromCache,
    TicketAvailRead,
    TicketAvailWrite,
    CpuIdle,
    CpuIowait,
    CpuNice,
    CpuSoftirq,
    CpuSteal,
    CpuSystem,
    CpuUser,
    /// Group target: expands to every per-disk utilization series.
    DisksUtils,
    /// Group target: expands to every per-disk IOPS series.
    DisksIops,
    /// Group target: expands to every per-member lag series.
    ReplicationLags,
}

impl FixedMetric {
    /// Every fixed metric, in chart legend order.
    pub const ALL: [FixedMetric; 41] = [
        Self::MemResident,
        Self::MemVirtual,
        Self::MemPageFaults,
        Self::ConnsAvailable,
        Self::ConnsCurrent,
        Self::ConnsCreatedPerMinute,
        Self::OpsQuery,
        Self::OpsInsert,
        Self::OpsUpdate,
        Self::OpsDelete,
        Self::OpsGetmore,
        Self::OpsCommand,
        Self::QActiveRead,
        Self::QActiveWrite,
        Self::QQueuedRead,
        Self::QQueuedWrite,
        Self::LatencyRead,
        Self::LatencyWrite,
        Self::LatencyCommand,
        Self::ScanKeys,
        Self::ScanObjects,
        Self::ScanSort,
        Self::WtCacheMax,
        Self::WtCacheUsed,
        Self::WtCacheDirty,
        Self::WtModifiedEvicted,
        Self::WtUnmodifiedEvicted,
        Self::WtReadInCache,
        Self::WtWrittenFromCache,
        Self::TicketAvailRead,
        Self::TicketAvailWrite,
        Self::CpuIdle,
        Self::CpuIowait,
        Self::CpuNice,
        Self::CpuSoftirq,
        Self::CpuSteal,
        Self::CpuSystem,
        Self::CpuUser,
        Self::DisksUtils,
        Self::DisksIops,
        Self::ReplicationLags,
    ];

    /// Chart legend, also the series name exposed to the query layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MemResident => "mem_resident",
            Self::MemVirtual => "mem_virtual",
            Self::MemPageFaults => "mem_page_faults",
            Self::ConnsAvailable => "conns_available",
            Self::ConnsCurrent => "conns_current",
            Self::ConnsCreatedPerMinute => "conns_created_per_minute",
            Self::OpsQuery => "ops_query",
            Self::OpsInsert => "ops_insert",
            Self::OpsUpdate => "ops_update",
            Self::OpsDelete => "ops_delete",
            Self::OpsGetmore => "ops_getmore",
            Self::OpsCommand => "ops_command",
            Self::QActiveRead => "q_active_read",
            Self::QActiveWrite => "q_active_write",
            Self::QQueuedRead => "q_queued_read",
            Self::QQueuedWrite => "q_queued_write",
            Self::LatencyRead => "latency_read",
            Self::LatencyWrite => "latency_write",
            Self::LatencyCommand => "latency_command",
            Self::ScanKeys => "scan_keys",
            Self::ScanObjects => "scan_objects",
            Self::ScanSort => "scan_sort",
            Self::WtCacheMax => "wt_cache_max",
            Self::WtCacheUsed => "wt_cache_used",
            Self::WtCacheDirty => "wt_cache_dirty",
            Self::WtModifiedEvicted => "wt_modified_evicted",
            Self::WtUnmodifiedEvicted => "wt_unmodified_evicted",
            Self::WtReadInCache => "wt_read_in_cache",
            Self::WtWrittenFromCache => "wt_written_from_cache",
            Self::TicketAvailRead => "ticket_avail_read",
            Self::TicketAvailWrite => "ticket_avail_write",
            Self::CpuIdle => "cpu_idle",
            Self::CpuIowait => "cpu_iowait",
            Self::CpuNice => "cpu_nice",
            Self::CpuSoftirq => "cpu_softirq",
            Self::CpuSteal => "cpu_steal",
            Self::CpuSystem => "cpu_system",
            Self::CpuUser => "cpu_user",
            Self::DisksUtils => "disks_utils",
            Self::DisksIops => "disks_iops",
            Self::ReplicationLags => "replication_lags",
        }
    }

    /// Looks up a fixed metric by its legend.
    pub fn from_legend(legend: &str) -> Option<FixedMetric> {
        Self::ALL.into_iter().find(|m| m.as_str() == legend)
    }

    /// Group targets hold no points themselves; they stand for a family of
    /// dynamic series.
    pub fn is_group(&self) -> bool {
        matches!(self, Self::DisksUtils | Self::DisksIops | Self::ReplicationLags)
    }
}

impl fmt::Display for FixedMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a per-disk series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiskMetric {
    /// Busy percentage (0..=100).
    Utilization,
    /// Completed operations per second.
    Iops,
}

impl DiskMetric {
    /// The group target this family belongs to; also the rendered name prefix.
    pub fn group(&self) -> FixedMetric {
        match self {
            Self::Utilization => FixedMetric::DisksUtils,
            Self::Iops => FixedMetric::DisksIops,
        }
    }
}

/// Key of a per-member replication lag series.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MemberKey {
    /// Short host identity (`db1:27017`).
    Host(String),
    /// Position in the name-sorted member list of the first reading.
    Position(usize),
}

const POSITION_PREFIX: &str = "repl_";

/// Identity of one series in a catalog.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricName {
    Fixed(FixedMetric),
    Disk { device: String, kind: DiskMetric },
    ReplicationLag(MemberKey),
}

impl MetricName {
    pub fn disk(device: impl Into<String>, kind: DiskMetric) -> Self {
        Self::Disk {
            device: device.into(),
            kind,
        }
    }

    pub fn member(host: impl Into<String>) -> Self {
        Self::ReplicationLag(MemberKey::Host(host.into()))
    }

    pub fn position(n: usize) -> Self {
        Self::ReplicationLag(MemberKey::Position(n))
    }

    /// Parses a rendered series name.
    ///
    /// Fixed legends win, then `repl_<n>`, then `disks_utils/<dev>` and
    /// `disks_iops/<dev>`; anything else names a member host. Returns `None`
    /// for an empty name.
    pub fn parse(name: &str) -> Option<Self> {
        if name.is_empty() {
            return None;
        }
        if let Some(fixed) = FixedMetric::from_legend(name) {
            return Some(Self::Fixed(fixed));
        }
        if let Some(n) = name
            .strip_prefix(POSITION_PREFIX)
            .and_then(|rest| rest.parse::<usize>().ok())
        {
            return Some(Self::position(n));
        }
        for kind in [DiskMetric::Utilization, DiskMetric::Iops] {
            if let Some(device) = name
                .strip_prefix(kind.group().as_str())
                .and_then(|rest| rest.strip_prefix('/'))
                .filter(|d| !d.is_empty())
            {
                return Some(Self::disk(device, kind));
            }
        }
        Some(Self::member(name))
    }
}

impl From<FixedMetric> for MetricName {
    fn from(m: FixedMetric) -> Self {
        Self::Fixed(m)
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(m) => f.write_str(m.as_str()),
            Self::Disk { device, kind } => write!(f, "{}/{}", kind.group(), device),
            Self::ReplicationLag(MemberKey::Host(host)) => f.write_str(host),
            Self::ReplicationLag(MemberKey::Position(n)) => write!(f, "{POSITION_PREFIX}{n}"),
        }
    }
}
