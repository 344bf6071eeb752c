//! Port for read-only analytics aggregates.
//!
//! Each method is one aggregate query. Adapters return counts; formulas live
//! in [`crate::domain::analytics`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::StudentProfile;
use crate::domain::analytics::{
    AttendanceScope, AttendanceTally, CourseIdentity, CourseTally, DailyActivity,
    DepartmentTally, DuplicateCheckin, EventScope, EventTally, Granularity, HeatmapTally,
    InstitutionCounts, LecturerProfile, PeriodTally, PresentDates, StudentTally,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by analytics repository adapters.
    pub enum AnalyticsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "analytics repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "analytics repository query failed: {message}",
    }
}

/// Port for the aggregate reads backing every analytics report.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Load a live student's identity.
    async fn find_student(
        &self,
        student_id: i64,
    ) -> Result<Option<StudentProfile>, AnalyticsRepositoryError>;

    /// Load a live lecturer's identity.
    async fn find_lecturer(
        &self,
        lecturer_id: i64,
    ) -> Result<Option<LecturerProfile>, AnalyticsRepositoryError>;

    /// Resolve a course code from its events.
    async fn find_course(
        &self,
        course_code: &str,
    ) -> Result<Option<CourseIdentity>, AnalyticsRepositoryError>;

    /// Row counts over a scope; rows later than `late_after_seconds` count as late.
    async fn attendance_tally(
        &self,
        scope: &AttendanceScope,
        late_after_seconds: f64,
    ) -> Result<AttendanceTally, AnalyticsRepositoryError>;

    /// Distinct UTC dates on which the student was present, newest first.
    async fn present_dates(&self, student_id: i64)
    -> Result<PresentDates, AnalyticsRepositoryError>;

    /// Counts per course code.
    async fn course_tallies(
        &self,
        scope: &AttendanceScope,
    ) -> Result<Vec<CourseTally>, AnalyticsRepositoryError>;

    /// Counts per student.
    async fn student_tallies(
        &self,
        scope: &AttendanceScope,
    ) -> Result<Vec<StudentTally>, AnalyticsRepositoryError>;

    /// Counts per trend period, oldest first.
    async fn period_tallies(
        &self,
        scope: &AttendanceScope,
        granularity: Granularity,
    ) -> Result<Vec<PeriodTally>, AnalyticsRepositoryError>;

    /// Counts per (weekday, hour) cell.
    async fn heatmap_tallies(
        &self,
        scope: &AttendanceScope,
    ) -> Result<Vec<HeatmapTally>, AnalyticsRepositoryError>;

    /// Per-event counts, newest first.
    async fn event_tallies(
        &self,
        scope: &EventScope,
    ) -> Result<Vec<EventTally>, AnalyticsRepositoryError>;

    /// Population counts across the institution.
    async fn institution_counts(&self) -> Result<InstitutionCounts, AnalyticsRepositoryError>;

    /// Live lecturers, optionally within one department.
    async fn lecturer_count(
        &self,
        department: Option<String>,
    ) -> Result<i64, AnalyticsRepositoryError>;

    /// Activity since `since`, with sessions open at `now`.
    async fn activity_since(
        &self,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<DailyActivity, AnalyticsRepositoryError>;

    /// Counts per department.
    async fn department_tallies(&self) -> Result<Vec<DepartmentTally>, AnalyticsRepositoryError>;

    /// Pairs of rows for the same (student, event) closer than `window_seconds`.
    async fn duplicate_checkins(
        &self,
        window_seconds: f64,
    ) -> Result<Vec<DuplicateCheckin>, AnalyticsRepositoryError>;
}
