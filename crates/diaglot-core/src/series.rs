//! Time-series records in the shape dashboards consume.
//!
//! A series serializes as `{"target": <name>, "datapoints": [[value, ts_ms], ...]}`.

use serde::{Deserialize, Serialize};

use crate::metric::{DiskMetric, MetricName};

/// One sample: a value at an epoch-millisecond timestamp.
///
/// Serialized as the two-element array `[value, timestamp_ms]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, i64)", into = "(f64, i64)")]
pub struct DataPoint {
    pub value: f64,
    pub timestamp_ms: i64,
}

impl DataPoint {
    pub fn new(value: f64, timestamp_ms: i64) -> Self {
        Self {
            value,
            timestamp_ms,
        }
    }
}

impl From<(f64, i64)> for DataPoint {
    fn from((value, timestamp_ms): (f64, i64)) -> Self {
        Self::new(value, timestamp_ms)
    }
}

impl From<DataPoint> for (f64, i64) {
    fn from(dp: DataPoint) -> Self {
        (dp.value, dp.timestamp_ms)
    }
}

/// A named, chronologically ordered sequence of samples.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Rendered metric name.
    pub target: String,
    pub datapoints: Vec<DataPoint>,
}

impl TimeSeries {
    /// Empty series for a metric.
    pub fn empty(name: &MetricName) -> Self {
        Self {
            target: name.to_string(),
            datapoints: Vec::new(),
        }
    }

    /// Appends a sample. Callers feed readings in chronological order.
    pub fn push(&mut self, value: f64, timestamp_ms: i64) {
        self.datapoints.push(DataPoint::new(value, timestamp_ms));
    }

    pub fn len(&self) -> usize {
        self.datapoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datapoints.is_empty()
    }

    pub fn last(&self) -> Option<&DataPoint> {
        self.datapoints.last()
    }
}

/// Utilization and IOPS series of one block device.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiskStat {
    pub utilization: TimeSeries,
    pub iops: TimeSeries,
}

impl DiskStat {
    pub fn new(device: &str) -> Self {
        Self {
            utilization: TimeSeries::empty(&MetricName::disk(device, DiskMetric::Utilization)),
            iops: TimeSeries::empty(&MetricName::disk(device, DiskMetric::Iops)),
        }
    }

    pub fn series(&self, kind: DiskMetric) -> &TimeSeries {
        match kind {
            DiskMetric::Utilization => &self.utilization,
            DiskMetric::Iops => &self.iops,
        }
    }
}
