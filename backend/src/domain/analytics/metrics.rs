//! Pure metric formulas.
//!
//! Every rate is a percentage in `[0, 100]` rounded to two decimals.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::AnalyticsPolicy;

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `100 · present / total`, or `0` when there are no rows.
///
/// # Examples
/// ```
/// use attendance::domain::analytics::attendance_rate;
///
/// assert_eq!(attendance_rate(3, 4), 75.0);
/// assert_eq!(attendance_rate(0, 0), 0.0);
/// ```
pub fn attendance_rate(present: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let present = present.clamp(0, total);
    round2(100.0 * present as f64 / total as f64)
}

/// `max(0, 100 − 100 · late / total)`, or `0` when there are no rows.
pub fn punctuality_score(late: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    round2((100.0 - 100.0 * late as f64 / total as f64).max(0.0))
}

/// Weighted blend of attendance and punctuality.
pub fn engagement_score(rate: f64, punctuality: f64, policy: &AnalyticsPolicy) -> f64 {
    round2(policy.attendance_weight * rate + policy.punctuality_weight * punctuality)
}

/// Whether `rate` falls strictly below the at-risk threshold.
pub fn is_at_risk(rate: f64, policy: &AnalyticsPolicy) -> bool {
    rate < policy.at_risk_threshold
}

/// Length of the run of consecutive present days ending on `today`.
///
/// `dates` may arrive in any order and contain duplicates.
///
/// # Examples
/// ```
/// use attendance::domain::analytics::attendance_streak;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2025, 11, 27).unwrap();
/// let yesterday = today.pred_opt().unwrap();
/// assert_eq!(attendance_streak(&[today, yesterday], today), 2);
/// assert_eq!(attendance_streak(&[yesterday], today), 0);
/// ```
pub fn attendance_streak(dates: &[NaiveDate], today: NaiveDate) -> i64 {
    let mut days: Vec<NaiveDate> = dates.iter().copied().filter(|d| *d <= today).collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    let mut expected = today;
    let mut streak = 0;
    for day in days {
        if day != expected {
            break;
        }
        streak += 1;
        expected = day - Duration::days(1);
    }
    streak
}

/// Arithmetic mean, `0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, `0` for an empty slice.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let centre = mean(values);
    let variance =
        values.iter().map(|v| (v - centre).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Position of an entity relative to its peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerStanding {
    /// Strictly above the peer mean.
    Above,
    /// Exactly on the peer mean.
    Average,
    /// Strictly below the peer mean.
    Below,
}

/// Classify `value` against `peer_mean` by strict inequality.
pub fn peer_standing(value: f64, peer_mean: f64) -> PeerStanding {
    if value > peer_mean {
        PeerStanding::Above
    } else if value < peer_mean {
        PeerStanding::Below
    } else {
        PeerStanding::Average
    }
}

/// `100 · value / peer_mean`.
///
/// A non-positive peer mean yields `100` for a positive value and `0`
/// otherwise.
pub fn percentile_rank(value: f64, peer_mean: f64) -> f64 {
    if peer_mean <= 0.0 {
        return if value > 0.0 { 100.0 } else { 0.0 };
    }
    round2(100.0 * value / peer_mean)
}

/// Direction of change between two periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Current exceeds previous.
    Up,
    /// Current below previous.
    Down,
    /// No change.
    Stable,
}

/// Relative change in percent and its direction.
///
/// A zero baseline reports no relative change.
pub fn period_change(current: f64, previous: f64) -> (f64, TrendDirection) {
    let direction = if current > previous {
        TrendDirection::Up
    } else if current < previous {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };
    let change = if previous > 0.0 {
        round2(100.0 * (current - previous) / previous)
    } else {
        0.0
    };
    (change, direction)
}

/// Per-student rate histogram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceDistribution {
    /// Rates in `[0, 20]`.
    #[serde(rename = "0-20")]
    pub range_0_to_20: i64,
    /// Rates in `(20, 40]`.
    #[serde(rename = "21-40")]
    pub range_21_to_40: i64,
    /// Rates in `(40, 60]`.
    #[serde(rename = "41-60")]
    pub range_41_to_60: i64,
    /// Rates in `(60, 80]`.
    #[serde(rename = "61-80")]
    pub range_61_to_80: i64,
    /// Rates in `(80, 100]`.
    #[serde(rename = "81-100")]
    pub range_81_to_100: i64,
}

impl AttendanceDistribution {
    /// Bucket each rate.
    pub fn from_rates(rates: impl IntoIterator<Item = f64>) -> Self {
        let mut buckets = Self::default();
        for rate in rates {
            match rate {
                r if r <= 20.0 => buckets.range_0_to_20 += 1,
                r if r <= 40.0 => buckets.range_21_to_40 += 1,
                r if r <= 60.0 => buckets.range_41_to_60 += 1,
                r if r <= 80.0 => buckets.range_61_to_80 += 1,
                _ => buckets.range_81_to_100 += 1,
            }
        }
        buckets
    }
}
