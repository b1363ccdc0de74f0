//! Replica set status readings.
//!
//! Mirrors the parts of `replSetGetStatus` needed to compute replication lag:
//! the reading time and, per member, its name, state and last applied optime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One `replSetGetStatus` reading.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct ReplSetStatus {
    /// Time the reading was taken.
    pub date: DateTime<Utc>,

    pub members: Vec<MemberStatus>,
}

impl ReplSetStatus {
    /// The member currently in PRIMARY state, if any.
    pub fn primary(&self) -> Option<&MemberStatus> {
        self.members.iter().find(|m| m.state == MemberState::Primary)
    }
}

/// State of one replica set member.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct MemberStatus {
    /// `host:port` the member is configured with.
    pub name: String,

    #[serde(rename = "stateStr")]
    pub state: MemberState,

    pub optime: OpTime,
}

/// Member state as reported by `stateStr`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberState {
    Primary,
    Secondary,
    Recovering,
    Startup,
    Startup2,
    Arbiter,
    Down,
    Rollback,
    Removed,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Position of the last operation a member applied.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(default)]
pub struct OpTime {
    #[serde(with = "extended_timestamp")]
    pub ts: Timestamp,

    /// Election term the operation was written in.
    pub t: i64,
}

/// BSON timestamp: seconds since epoch plus an ordinal within that second.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timestamp {
    pub t: u32,
    pub i: u32,
}

impl Timestamp {
    /// Whole seconds between `self` and an earlier timestamp (negative if later).
    pub fn seconds_since(&self, earlier: &Timestamp) -> i64 {
        i64::from(self.t) - i64::from(earlier.t)
    }
}

/// Extended JSON form `{"$timestamp": {"t": .., "i": ..}}`.
mod extended_timestamp {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        #[serde(rename = "$timestamp")]
        ts: Timestamp,
    }

    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        Wrapper { ts: *ts }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        Wrapper::deserialize(deserializer).map(|w| w.ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_members() {
        let json = r#"{
            "date": "2024-05-01T10:00:00Z",
            "members": [
                {"name": "db1.example.net:27017", "stateStr": "PRIMARY",
                 "optime": {"ts": {"$timestamp": {"t": 1714557600, "i": 3}}, "t": 7}},
                {"name": "db2.example.net:27017", "stateStr": "SECONDARY",
                 "optime": {"ts": {"$timestamp": {"t": 1714557590, "i": 1}}, "t": 7}},
                {"name": "db3.example.net:27017", "stateStr": "(not reachable/healthy)"}
            ]
        }"#;
        let rs: ReplSetStatus = serde_json::from_str(json).unwrap();
        assert_eq!(rs.members.len(), 3);
        assert_eq!(rs.members[2].state, MemberState::Unknown);
        assert_eq!(rs.members[2].optime, OpTime::default());

        let primary = rs.primary().unwrap();
        assert_eq!(primary.name, "db1.example.net:27017");
        assert_eq!(primary.optime.ts.seconds_since(&rs.members[1].optime.ts), 10);
    }

    #[test]
    fn state_names() {
        let s: MemberState = serde_json::from_str(r#""STARTUP2""#).unwrap();
        assert_eq!(s, MemberState::Startup2);
        let s: MemberState = serde_json::from_str(r#""ARBITER""#).unwrap();
        assert_eq!(s, MemberState::Arbiter);
    }

    #[test]
    fn no_primary() {
        let rs = ReplSetStatus {
            members: vec![MemberStatus {
                name: "a".into(),
                state: MemberState::Secondary,
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(rs.primary().is_none());
    }
}
