//! Tunable constants shared by every analytics derivation.

use chrono::Duration;

/// Thresholds, weights and windows used by the analytics engine.
///
/// # Examples
/// ```
/// use attendance::domain::AnalyticsPolicy;
///
/// let policy = AnalyticsPolicy::default();
/// assert_eq!(policy.at_risk_threshold, 75.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticsPolicy {
    /// Check-ins later than this after the window opens count as late.
    pub late_after: Duration,
    /// Weight of the attendance rate in the engagement score.
    pub attendance_weight: f64,
    /// Weight of the punctuality score in the engagement score.
    pub punctuality_weight: f64,
    /// Rates strictly below this are at risk.
    pub at_risk_threshold: f64,
    /// Rates strictly below this are critical in predictions.
    pub critical_threshold: f64,
    /// Window the naive forecast looks back over.
    pub prediction_window: Duration,
    /// Fixed confidence reported by the naive forecast.
    pub prediction_confidence: f64,
    /// Trend window for student metrics and charts.
    pub student_trend_window: Duration,
    /// Trend window for the lecturer summary.
    pub lecturer_trend_window: Duration,
    /// Window used by department deep dives.
    pub department_trend_window: Duration,
    /// Historical comparison period for benchmarks.
    pub comparison_period: Duration,
    /// Two rows for the same pair closer than this are duplicates.
    pub duplicate_window: Duration,
    /// Late check-ins above this count trigger a punctuality insight.
    pub frequent_late_count: i64,
    /// Default temporal analytics window when no dates are given.
    pub temporal_default_window: Duration,
}

impl Default for AnalyticsPolicy {
    fn default() -> Self {
        Self {
            late_after: Duration::minutes(5),
            attendance_weight: 0.7,
            punctuality_weight: 0.3,
            at_risk_threshold: 75.0,
            critical_threshold: 50.0,
            prediction_window: Duration::weeks(4),
            prediction_confidence: 65.0,
            student_trend_window: Duration::days(90),
            lecturer_trend_window: Duration::weeks(8),
            department_trend_window: Duration::days(90),
            comparison_period: Duration::days(30),
            duplicate_window: Duration::seconds(60),
            frequent_late_count: 3,
            temporal_default_window: Duration::days(30),
        }
    }
}

impl AnalyticsPolicy {
    /// Late threshold in seconds, as bound into aggregate queries.
    pub fn late_after_seconds(&self) -> f64 {
        self.late_after.num_seconds() as f64
    }
}
