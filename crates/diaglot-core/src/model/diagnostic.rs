//! A batch of diagnostic readings as handed over by the collector.

use serde::{Deserialize, Serialize};

use super::replication::ReplSetStatus;
use super::server_status::ServerStatus;
use super::system_metrics::SystemMetrics;

/// All readings of one diagnostic batch, each source in chronological order.
///
/// The three sequences are sampled independently and at different cadences;
/// nothing relates the n-th element of one to the n-th element of another.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct DiagnosticData {
    /// Opaque build/host description, passed through to the query layer.
    #[serde(rename = "serverInfo", skip_serializing_if = "Option::is_none")]
    pub server_info: Option<serde_json::Value>,

    #[serde(rename = "serverStatus")]
    pub server_status: Vec<ServerStatus>,

    #[serde(rename = "systemMetrics")]
    pub system_metrics: Vec<SystemMetrics>,

    #[serde(rename = "replSetGetStatus")]
    pub repl_set_status: Vec<ReplSetStatus>,
}

impl DiagnosticData {
    /// Total number of readings across all three sources.
    pub fn len(&self) -> usize {
        self.server_status.len() + self.system_metrics.len() + self.repl_set_status.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
