//! Serialisable analytics reports.
//!
//! Field names are the JSON keys emitted under the success envelope's
//! `data` member.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::metrics::{AttendanceDistribution, PeerStanding, TrendDirection};

/// Identifier of the entity a report describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntityId {
    /// Numeric principal id.
    Numeric(i64),
    /// Course code.
    Code(String),
}

/// One trend period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub period: String,
    pub attendance_rate: f64,
    pub sessions_attended: i64,
    pub total_sessions: i64,
    pub average_checkin_delay_minutes: i64,
}

/// Attendance rate of one course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseRate {
    pub course_code: String,
    pub course_name: String,
    pub department: String,
    pub attendance_rate: f64,
    pub sessions_attended: i64,
    pub total_sessions: i64,
}

/// Student metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentMetricsReport {
    pub student_id: i64,
    pub student_name: String,
    pub matric_number: String,
    pub overall_attendance_rate: f64,
    pub total_sessions: i64,
    pub total_present: i64,
    pub total_absent: i64,
    pub total_late: i64,
    pub attendance_streak: i64,
    pub late_checkin_frequency: i64,
    pub class_average_comparison: f64,
    pub at_risk_status: bool,
    pub engagement_score: f64,
    pub per_course_rates: Vec<CourseRate>,
    pub attendance_trend: Vec<TrendPoint>,
    pub generated_at: DateTime<Utc>,
}

/// Trend statement attached to an insight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendExplanation {
    pub trend: String,
    pub explanation: String,
    pub timeframe: String,
}

/// Recommended action attached to an insight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub action: String,
    pub priority: String,
    pub expected_impact: String,
    pub timeframe: String,
}

/// Templated prose insight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightReport {
    pub entity_type: String,
    pub entity_id: EntityId,
    pub entity_name: String,
    pub summary: String,
    pub key_takeaways: Vec<String>,
    pub trends: Vec<TrendExplanation>,
    pub recommendations: Vec<Recommendation>,
    pub generated_at: DateTime<Utc>,
}

/// One event owned by a lecturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LecturerEventSummary {
    pub event_id: i64,
    pub course_name: String,
    pub course_code: String,
    pub department: String,
    pub venue: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// `active` until the window closes, then `expired`.
    pub status: String,
    pub total_attendance: i64,
    pub created_at: DateTime<Utc>,
}

/// Course with the best mean per-event rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MostAttendedCourse {
    pub course_code: String,
    pub course_name: String,
    pub avg_attendance: f64,
}

/// Per-course rollup of a lecturer's events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseMetrics {
    pub course_code: String,
    pub course_name: String,
    pub attendance_average: f64,
    pub session_count: i64,
    pub student_count: i64,
}

/// A lecturer's own metrics with their event list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LecturerCoursesReport {
    pub lecturer_id: i64,
    pub lecturer_name: String,
    pub department: String,
    pub total_events: i64,
    pub total_students_reached: i64,
    pub average_attendance_rate: f64,
    pub most_attended_course: Option<MostAttendedCourse>,
    pub course_metrics: Vec<CourseMetrics>,
    pub attendance_trend: Vec<TrendPoint>,
    pub events: Vec<LecturerEventSummary>,
    pub generated_at: DateTime<Utc>,
}

/// Lecturer dashboard summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LecturerSummaryReport {
    pub lecturer_id: i64,
    pub lecturer_name: String,
    pub total_events_created: i64,
    pub total_students_reached: i64,
    pub average_attendance_rate: f64,
    pub sessions_this_week: i64,
    pub sessions_today: i64,
    pub most_attended_course: Option<MostAttendedCourse>,
    pub attendance_trend: Vec<TrendPoint>,
    pub insights: InsightReport,
    pub generated_at: DateTime<Utc>,
}

/// Detailed performance of one course taught by a lecturer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoursePerformanceReport {
    pub course_code: String,
    pub course_name: String,
    pub lecturer_name: String,
    pub department: String,
    pub session_count: i64,
    pub student_count: i64,
    pub overall_attendance_rate: f64,
    pub attendance_distribution: AttendanceDistribution,
    pub students_at_risk: i64,
    pub average_checkin_delay_minutes: i64,
    pub late_arrivals_count: i64,
    pub generated_at: DateTime<Utc>,
}

/// Liveness summary embedded in the admin overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemHealth {
    pub database_status: String,
    pub last_check_in: Option<DateTime<Utc>>,
    pub uptime_hours: f64,
}

/// Institution-wide overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminOverviewReport {
    pub overall_attendance_rate: f64,
    pub total_active_sessions: i64,
    pub total_students: i64,
    pub total_lecturers: i64,
    pub total_departments: i64,
    pub total_events: i64,
    pub events_created_today: i64,
    pub total_checkins_today: i64,
    pub system_health: SystemHealth,
    pub generated_at: DateTime<Utc>,
}

/// One department row of the department breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentStat {
    pub department: String,
    pub total_students: i64,
    pub total_lecturers: i64,
    pub total_events: i64,
    pub total_courses: i64,
    pub average_attendance_rate: f64,
    pub total_check_ins: i64,
}

/// Per-department breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentsReport {
    pub departments: Vec<DepartmentStat>,
    pub generated_at: DateTime<Utc>,
}

/// Enrolment against attendance for one course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseEnrollment {
    pub course_code: String,
    pub course_name: String,
    pub enrolled: i64,
    pub actual_attended: i64,
    pub attendance_rate: f64,
}

/// Sessions and mean turnout for one venue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueUtilization {
    pub venue: String,
    pub sessions_held: i64,
    pub average_attendance: i64,
}

/// Department deep dive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentDeepDiveReport {
    pub department_name: String,
    pub overall_attendance_rate: f64,
    pub student_count: i64,
    pub lecturer_count: i64,
    pub course_count: i64,
    pub event_count: i64,
    pub attendance_trend: Vec<TrendPoint>,
    pub course_enrollment_vs_attendance: Vec<CourseEnrollment>,
    pub venue_utilization: Vec<VenueUtilization>,
    pub generated_at: DateTime<Utc>,
}

/// Session open right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OngoingSession {
    pub event_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub lecturer: String,
    pub venue: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub checkins_count: i64,
}

/// Daily usage counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SystemUsageStats {
    pub qr_codes_generated_today: i64,
    pub checkins_processed_today: i64,
}

/// Real-time dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealtimeReport {
    pub active_sessions_now: i64,
    pub total_checkins_today: i64,
    pub average_attendance_today: f64,
    pub ongoing_sessions: Vec<OngoingSession>,
    pub system_usage_stats: SystemUsageStats,
    pub generated_at: DateTime<Utc>,
}

/// One heatmap cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub day_of_week: String,
    pub time_slot: String,
    pub attendance_rate: f64,
    pub session_count: i64,
    pub avg_checkin_time_minutes: i64,
}

/// One hour slot within a weekday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSlotMetrics {
    pub time_slot: String,
    pub attendance_rate: f64,
    pub session_count: i64,
}

/// One weekday rollup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayOfWeekMetrics {
    pub day_of_week: String,
    pub attendance_rate: f64,
    pub session_count: i64,
    pub average_present: i64,
    pub time_slots: Vec<TimeSlotMetrics>,
}

/// Attendance around a named break in the calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HolidayImpact {
    pub period_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub attendance_rate: f64,
    pub before_period_rate: f64,
    pub impact_percent: f64,
}

/// Time-based analytics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalReport {
    pub granularity: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub attendance_heatmap: Vec<HeatmapCell>,
    pub seasonal_trends: Vec<TrendPoint>,
    pub day_of_week_analysis: Vec<DayOfWeekMetrics>,
    pub holiday_impact: Vec<HolidayImpact>,
    pub generated_at: DateTime<Utc>,
}

/// A detected anomaly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anomaly {
    pub id: String,
    #[serde(rename = "type")]
    pub anomaly_type: String,
    pub severity: String,
    pub description: String,
    pub student_id: i64,
    pub student_name: String,
    pub event_id: i64,
    pub course_name: String,
    pub detection_time: DateTime<Utc>,
    pub recommended_action: String,
}

/// Anomaly scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnomalyReport {
    pub anomaly_count: i64,
    pub critical_anomalies: i64,
    pub anomalies: Vec<Anomaly>,
    pub generated_at: DateTime<Utc>,
}

/// Naive attendance forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub entity_type: String,
    pub entity_id: EntityId,
    pub entity_name: String,
    pub forecasted_attendance: f64,
    pub current_attendance: f64,
    pub confidence_level: f64,
    pub risk_factors: Vec<String>,
    pub recommended_actions: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Last period against the one before.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalComparison {
    pub current_period: f64,
    pub previous_period: f64,
    pub change_percent: f64,
    pub trend_direction: TrendDirection,
}

/// Progress against the at-risk threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalTracking {
    pub target_attendance: f64,
    pub actual_attendance: f64,
    /// `on_track` or `at_risk`.
    pub goal_met_status: String,
}

/// Peer comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub entity_type: String,
    pub entity_id: EntityId,
    pub entity_name: String,
    pub performance_value: f64,
    pub peer_average: f64,
    pub peer_std_dev: f64,
    pub percentile_rank: f64,
    pub performance_vs_peers: PeerStanding,
    pub historical_comparison: HistoricalComparison,
    pub goal_tracking: GoalTracking,
    pub generated_at: DateTime<Utc>,
}

/// One chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub color: String,
}

/// Chart axis labels and series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// Chart-ready payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartReport {
    pub chart_type: String,
    pub title: String,
    pub description: String,
    pub data_points: ChartData,
    pub labels: Vec<String>,
    pub generated_at: DateTime<Utc>,
}
