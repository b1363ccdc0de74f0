//! diaglot-core — metric derivation for database diagnostic data.
//!
//! Provides:
//! - `model` — raw readings (server status, system metrics, replica set status)
//! - `metric` — metric identities and their rendered names
//! - `series` — time series in `{target, datapoints}` form
//! - `rates` — guarded delta/ratio arithmetic shared by the derivers
//! - `derive` — readings → series (gauges, rates, utilization, lag)
//! - `catalog` — all series of one rebuild generation
//! - `store` — published catalog with concurrent readers
//! - `provider` — diagnostic batch sources (JSON, zstd-compressed JSON)

pub mod catalog;
pub mod derive;
pub mod metric;
pub mod model;
pub mod provider;
pub mod rates;
pub mod series;
pub mod store;
