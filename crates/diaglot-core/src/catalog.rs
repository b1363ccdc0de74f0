//! The metric catalog of one rebuild generation.
//!
//! A catalog starts with one empty series per fixed legend
//! ([`Catalog::initialize`]); derivers then contribute fixed series and the
//! dynamic per-disk and per-member families. Dynamic families live in their
//! own maps, so they can never shadow a fixed legend.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::derive::{ReplicationSeries, SystemSeries};
use crate::metric::{DiskMetric, FixedMetric, MemberKey, MetricName};
use crate::series::{DiskStat, TimeSeries};

/// Fixed series keyed by legend, iterated in legend order.
pub type FixedSeries = BTreeMap<FixedMetric, TimeSeries>;

/// Empty series for each of `metrics`.
pub fn fixed_series(metrics: impl IntoIterator<Item = FixedMetric>) -> FixedSeries {
    metrics
        .into_iter()
        .map(|m| (m, TimeSeries::empty(&m.into())))
        .collect()
}

/// Appends a sample to a fixed series, creating it if needed.
pub(crate) fn push_fixed(series: &mut FixedSeries, metric: FixedMetric, value: f64, ts_ms: i64) {
    series
        .entry(metric)
        .or_insert_with(|| TimeSeries::empty(&metric.into()))
        .push(value, ts_ms);
}

/// All series of one rebuild generation.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Catalog {
    fixed: FixedSeries,
    disks: BTreeMap<String, DiskStat>,
    members: BTreeMap<String, TimeSeries>,
    positions: Vec<TimeSeries>,
    server_info: Option<serde_json::Value>,
}

impl Catalog {
    /// A catalog holding one empty series per fixed legend and nothing else.
    pub fn initialize() -> Self {
        Self {
            fixed: fixed_series(FixedMetric::ALL),
            ..Default::default()
        }
    }

    pub(crate) fn merge_fixed(&mut self, series: FixedSeries) {
        self.fixed.extend(series);
    }

    pub(crate) fn merge_system(&mut self, system: SystemSeries) {
        self.merge_fixed(system.cpu);
        self.disks.extend(system.disks);
    }

    pub(crate) fn merge_replication(&mut self, replication: ReplicationSeries) {
        self.members.extend(replication.members);
        self.positions = replication.positions;
    }

    pub(crate) fn set_server_info(&mut self, info: Option<serde_json::Value>) {
        self.server_info = info;
    }

    /// Looks up a series by identity.
    pub fn get(&self, name: &MetricName) -> Option<&TimeSeries> {
        match name {
            MetricName::Fixed(m) => self.fixed.get(m),
            MetricName::Disk { device, kind } => self.disks.get(device).map(|d| d.series(*kind)),
            MetricName::ReplicationLag(MemberKey::Host(host)) => self.members.get(host),
            MetricName::ReplicationLag(MemberKey::Position(n)) => self.positions.get(*n),
        }
    }

    /// Looks up a series by its rendered name.
    pub fn get_by_name(&self, name: &str) -> Option<&TimeSeries> {
        MetricName::parse(name).and_then(|n| self.get(&n))
    }

    /// Resolves a query target to the series it stands for.
    ///
    /// Group targets expand to their whole family; other names resolve to at
    /// most one series. Unknown targets resolve to nothing.
    pub fn expand(&self, target: &str) -> Vec<&TimeSeries> {
        match FixedMetric::from_legend(target) {
            Some(FixedMetric::DisksUtils) => self.disk_family(DiskMetric::Utilization),
            Some(FixedMetric::DisksIops) => self.disk_family(DiskMetric::Iops),
            Some(FixedMetric::ReplicationLags) => self.members.values().collect(),
            _ => self.get_by_name(target).into_iter().collect(),
        }
    }

    fn disk_family(&self, kind: DiskMetric) -> Vec<&TimeSeries> {
        self.disks.values().map(|d| d.series(kind)).collect()
    }

    pub fn disk(&self, device: &str) -> Option<&DiskStat> {
        self.disks.get(device)
    }

    /// Device labels in sorted order.
    pub fn devices(&self) -> impl Iterator<Item = &str> {
        self.disks.keys().map(String::as_str)
    }

    /// Short member identities in sorted order.
    pub fn member_hosts(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn server_info(&self) -> Option<&serde_json::Value> {
        self.server_info.as_ref()
    }

    /// Every series: fixed legends, then disks, members and positions.
    pub fn iter(&self) -> impl Iterator<Item = &TimeSeries> {
        self.fixed
            .values()
            .chain(self.disks.values().flat_map(|d| [&d.utilization, &d.iops]))
            .chain(self.members.values())
            .chain(self.positions.iter())
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.fixed.len() + 2 * self.disks.len() + self.members.len() + self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of samples across all series.
    pub fn point_count(&self) -> usize {
        self.iter().map(TimeSeries::len).sum()
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for series in self.iter() {
            map.serialize_entry(&series.target, series)?;
        }
        map.end()
    }
}
