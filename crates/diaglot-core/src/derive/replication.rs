//! Replication lag per replica set member.
//!
//! The first reading fixes the member roster: members sorted by name, each
//! with a short host identity and a position. Later readings are matched to
//! the roster by member name.

use std::collections::{BTreeMap, HashMap};
use std::net::IpAddr;

use tracing::debug;

use crate::metric::MetricName;
use crate::model::{MemberState, ReplSetStatus};
use crate::rates::epoch_ms;
use crate::series::TimeSeries;

/// Output of [`derive_replication_lags`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplicationSeries {
    /// Lag series keyed by short host identity.
    pub members: BTreeMap<String, TimeSeries>,
    /// Lag series by roster position (`repl_<n>`).
    pub positions: Vec<TimeSeries>,
}

/// Short identity of a member: host up to the first `.` plus the `:port`
/// suffix (`db1.example.net:27017` → `db1:27017`).
///
/// Names without both a `.` in the host and a `:port` are kept whole. Unlike
/// plain cut-at-first-dot, IP-address hosts (`10.0.0.5:27017`) and hosts
/// starting with `.` are also kept whole instead of becoming `10:27017` or
/// `:1`.
pub fn short_member_name(name: &str) -> String {
    let Some(colon) = name.rfind(':') else {
        return name.to_string();
    };
    let (host, port) = name.split_at(colon);
    if host.parse::<IpAddr>().is_ok() {
        return name.to_string();
    }
    match host.find('.') {
        Some(dot) if dot > 0 => format!("{}{}", &host[..dot], port),
        _ => name.to_string(),
    }
}

struct RosterEntry {
    host: String,
    position: usize,
}

/// Picks the rendered identity of a member that does not collide with a
/// fixed legend, a disk name, a positional name or another member.
fn unique_identity(full: &str, position: usize, taken: &BTreeMap<String, TimeSeries>) -> String {
    let short = short_member_name(full);
    [short, full.to_string(), format!("{full}#{position}")]
        .into_iter()
        .find(|c| {
            !taken.contains_key(c) && MetricName::parse(c) == Some(MetricName::member(c.as_str()))
        })
        .unwrap_or_else(|| format!("member#{position}"))
}

/// Builds per-member lag series from readings in chronological order.
pub fn derive_replication_lags(snapshots: &[ReplSetStatus]) -> ReplicationSeries {
    let mut out = ReplicationSeries::default();

    let Some((first, rest)) = snapshots.split_first() else {
        return out;
    };

    let mut names: Vec<&str> = first.members.iter().map(|m| m.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();

    let mut roster: HashMap<&str, RosterEntry> = HashMap::with_capacity(names.len());
    for (position, name) in names.into_iter().enumerate() {
        let host = unique_identity(name, position, &out.members);
        out.members
            .insert(host.clone(), TimeSeries::empty(&MetricName::member(host.as_str())));
        out.positions.push(TimeSeries::empty(&MetricName::position(position)));
        roster.insert(name, RosterEntry { host, position });
    }

    for (i, status) in rest.iter().enumerate() {
        let Some(primary) = status.primary() else {
            debug!(snapshot_idx = i + 1, "replication: no primary, sample skipped");
            continue;
        };
        let t = epoch_ms(&status.date);

        for member in &status.members {
            let lag = match member.state {
                MemberState::Primary => 0.0,
                MemberState::Secondary => {
                    // Clamped: a secondary ahead of the primary reports 0, not a negative lag.
                    primary.optime.ts.seconds_since(&member.optime.ts).max(0) as f64
                }
                _ => continue,
            };
            let Some(entry) = roster.get(member.name.as_str()) else {
                debug!(
                    snapshot_idx = i + 1,
                    member = %member.name,
                    "replication: member not in roster"
                );
                continue;
            };
            if let Some(series) = out.members.get_mut(&entry.host) {
                series.push(lag, t);
            }
            if let Some(series) = out.positions.get_mut(entry.position) {
                series.push(lag, t);
            }
        }
    }

    out
}
