//! Read-only attendance analytics.
//!
//! Repositories return raw counts ([`tallies`]); this module owns every
//! formula, rollup, template and report shape derived from them.

mod charts;
mod insights;
mod metrics;
mod policy;
mod reports;
mod rollups;
mod tallies;

pub use charts::{ChartKind, UnknownChartKind, bar_chart, line_chart};
pub use insights::{LecturerInsightInput, lecturer_insights, student_insights};
pub use metrics::{
    AttendanceDistribution, PeerStanding, TrendDirection, attendance_rate, attendance_streak,
    engagement_score, is_at_risk, mean, peer_standing, percentile_rank, period_change,
    punctuality_score, round2, std_dev,
};
pub use policy::AnalyticsPolicy;
pub use reports::*;
pub use rollups::{
    course_enrollment, course_metrics, course_rates, day_of_week, duplicate_anomalies, heatmap,
    lecturer_events, mean_event_rate, most_attended_course, ongoing_sessions, trend_points,
    venue_utilization,
};
pub use tallies::{
    AttendanceScope, AttendanceTally, CourseIdentity, CourseTally, DailyActivity,
    DepartmentTally, DuplicateCheckin, EventScope, EventTally, Granularity, HeatmapTally,
    InstitutionCounts, LecturerProfile, PeriodTally, PresentDates, StudentTally,
    UnknownGranularity,
};

/// Kind of entity a benchmark or chart is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    /// A student, identified by numeric id.
    Student,
    /// A course, identified by code.
    Course,
    /// A lecturer, identified by numeric id.
    Lecturer,
}

impl EntityType {
    /// Query-string spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Course => "course",
            Self::Lecturer => "lecturer",
        }
    }
}

/// Error returned for an unsupported entity type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported entity_type: {0}")]
pub struct UnknownEntityType(pub String);

impl std::str::FromStr for EntityType {
    type Err = UnknownEntityType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "student" => Ok(Self::Student),
            "course" => Ok(Self::Course),
            "lecturer" => Ok(Self::Lecturer),
            other => Err(UnknownEntityType(other.to_owned())),
        }
    }
}
