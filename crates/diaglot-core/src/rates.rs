//! Shared delta and ratio helpers for all derivers.
//!
//! Counter deltas, zero-denominator handling and unit scaling. Derivers do not
//! divide inline.
//!
//! Policy:
//! - a counter that went backwards has no delta ([`delta`] returns `None`);
//! - a zero (or non-finite) denominator has no ratio ([`safe_ratio`] returns
//!   `None`); callers decide whether that means "skip the point" or "0".

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Unit scaling
// ---------------------------------------------------------------------------

/// MiB → GiB (server memory is reported in MiB).
pub const MIB_PER_GIB: f64 = 1024.0;

/// Bytes → GiB (cache sizes are reported in bytes).
pub const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// µs → ms (latency totals are reported in microseconds).
pub const MICROS_PER_MILLI: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Delta helpers
// ---------------------------------------------------------------------------

/// Compute u64 delta, returning `None` on counter regression (restart or reset).
pub fn delta(curr: u64, prev: u64) -> Option<u64> {
    curr.checked_sub(prev)
}

/// `numerator / denominator`, or `None` when the denominator is zero or the
/// result is not finite.
pub fn safe_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let r = numerator / denominator;
    r.is_finite().then_some(r)
}

/// Like [`safe_ratio`] but a missing ratio counts as 0.
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    safe_ratio(numerator, denominator).unwrap_or(0.0)
}

/// `100 * part / whole`, or `None` when `whole` is zero.
pub fn percent(part: u64, whole: u64) -> Option<f64> {
    safe_ratio(100.0 * part as f64, whole as f64)
}

// ---------------------------------------------------------------------------
// Time helpers
// ---------------------------------------------------------------------------

/// Epoch milliseconds of a reading time.
pub fn epoch_ms(t: &DateTime<Utc>) -> i64 {
    t.timestamp_millis()
}

/// Wall-clock seconds from `prev` to `curr`; zero when time did not advance.
pub fn elapsed_secs(prev: &DateTime<Utc>, curr: &DateTime<Utc>) -> f64 {
    let ms = (*curr - *prev).num_milliseconds();
    if ms <= 0 { 0.0 } else { ms as f64 / 1000.0 }
}

/// Wall-clock minutes from `prev` to `curr`; zero when time did not advance.
pub fn elapsed_minutes(prev: &DateTime<Utc>, curr: &DateTime<Utc>) -> f64 {
    elapsed_secs(prev, curr) / 60.0
}

/// Per-interval rate of a cumulative counter.
///
/// `None` when the counter regressed. A zero-length interval yields 0.
pub fn counter_rate(curr: u64, prev: u64, interval: f64) -> Option<f64> {
    delta(curr, prev).map(|d| ratio_or_zero(d as f64, interval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn delta_regression_is_none() {
        assert_eq!(delta(10, 4), Some(6));
        assert_eq!(delta(4, 4), Some(0));
        assert_eq!(delta(3, 4), None);
    }

    #[test]
    fn safe_ratio_zero_denominator() {
        assert_eq!(safe_ratio(5.0, 0.0), None);
        assert_eq!(safe_ratio(0.0, 0.0), None);
        assert_eq!(ratio_or_zero(5.0, 0.0), 0.0);
        assert!((safe_ratio(5.0, 2.0).unwrap() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn safe_ratio_rejects_non_finite() {
        assert_eq!(safe_ratio(f64::INFINITY, 1.0), None);
        assert_eq!(safe_ratio(f64::NAN, 1.0), None);
    }

    #[test]
    fn percent_of_zero_whole() {
        assert_eq!(percent(5, 0), None);
        assert!((percent(25, 200).unwrap() - 12.5).abs() < 1e-9);
    }

    #[test]
    fn elapsed_never_negative() {
        assert!((elapsed_secs(&at(100), &at(110)) - 10.0).abs() < 1e-9);
        assert!((elapsed_minutes(&at(100), &at(220)) - 2.0).abs() < 1e-9);
        assert_eq!(elapsed_secs(&at(110), &at(100)), 0.0);
        assert_eq!(elapsed_minutes(&at(100), &at(100)), 0.0);
    }

    #[test]
    fn counter_rate_guards() {
        assert!((counter_rate(160, 100, 1.0).unwrap() - 60.0).abs() < 1e-9);
        assert!((counter_rate(160, 100, 2.0).unwrap() - 30.0).abs() < 1e-9);
        assert_eq!(counter_rate(160, 100, 0.0), Some(0.0));
        assert_eq!(counter_rate(90, 100, 1.0), None);
    }

    #[test]
    fn epoch_ms_of_reading() {
        assert_eq!(epoch_ms(&at(1_714_557_600)), 1_714_557_600_000);
    }
}
