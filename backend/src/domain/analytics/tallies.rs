//! Raw aggregates read from the store and the filters that select them.
//!
//! Repositories answer with counts only; every rate, score and
//! classification is derived in the domain from these values.

use chrono::{DateTime, NaiveDate, Utc};

use super::metrics;

/// Filter over attendance rows joined to their events.
///
/// Every field left `None` matches all rows.
///
/// # Examples
/// ```
/// use attendance::domain::AttendanceScope;
///
/// let scope = AttendanceScope::all().student(7).course("CSC301");
/// assert_eq!(scope.student_id, Some(7));
/// assert_eq!(scope.course_code.as_deref(), Some("CSC301"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceScope {
    /// Only rows for this student.
    pub student_id: Option<i64>,
    /// Only rows for events owned by this lecturer.
    pub lecturer_id: Option<i64>,
    /// Only rows for events of this course.
    pub course_code: Option<String>,
    /// Only rows for events of this department.
    pub department: Option<String>,
    /// Only rows marked at or after this instant.
    pub marked_from: Option<DateTime<Utc>>,
    /// Only rows marked strictly before this instant.
    pub marked_before: Option<DateTime<Utc>>,
}

impl AttendanceScope {
    /// Match every attendance row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to one student.
    pub fn student(mut self, student_id: i64) -> Self {
        self.student_id = Some(student_id);
        self
    }

    /// Restrict to one lecturer's events.
    pub fn lecturer(mut self, lecturer_id: i64) -> Self {
        self.lecturer_id = Some(lecturer_id);
        self
    }

    /// Restrict to one course code.
    pub fn course(mut self, course_code: impl Into<String>) -> Self {
        self.course_code = Some(course_code.into());
        self
    }

    /// Restrict to one department.
    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Restrict to rows marked at or after `from`.
    pub fn marked_from(mut self, from: DateTime<Utc>) -> Self {
        self.marked_from = Some(from);
        self
    }

    /// Restrict to rows marked before `before`.
    pub fn marked_before(mut self, before: DateTime<Utc>) -> Self {
        self.marked_before = Some(before);
        self
    }
}

/// Filter over events, independent of whether they have attendance rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventScope {
    /// Only events owned by this lecturer.
    pub lecturer_id: Option<i64>,
    /// Only events of this course.
    pub course_code: Option<String>,
    /// Only events of this department.
    pub department: Option<String>,
    /// Only events whose window brackets this instant.
    pub active_at: Option<DateTime<Utc>>,
}

impl EventScope {
    /// Match every live event.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to one lecturer.
    pub fn lecturer(mut self, lecturer_id: i64) -> Self {
        self.lecturer_id = Some(lecturer_id);
        self
    }

    /// Restrict to one course code.
    pub fn course(mut self, course_code: impl Into<String>) -> Self {
        self.course_code = Some(course_code.into());
        self
    }

    /// Restrict to one department.
    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Restrict to events open at `now`.
    pub fn active_at(mut self, now: DateTime<Utc>) -> Self {
        self.active_at = Some(now);
        self
    }
}

/// Period bucketing for trend rollups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Granularity {
    /// ISO year and week, e.g. `2025-48`.
    #[default]
    Weekly,
    /// Year and month, e.g. `2025-11`.
    Monthly,
}

impl Granularity {
    /// Query-string spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// Error returned for an unrecognised granularity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("granularity must be weekly or monthly, got {0}")]
pub struct UnknownGranularity(pub String);

impl std::str::FromStr for Granularity {
    type Err = UnknownGranularity;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(UnknownGranularity(other.to_owned())),
        }
    }
}

/// Row counts for one scope.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttendanceTally {
    /// Attendance rows.
    pub total: i64,
    /// Rows with status `present`.
    pub present: i64,
    /// Rows marked after the late threshold.
    pub late: i64,
    /// Mean minutes between window opening and check-in.
    pub average_delay_minutes: f64,
}

impl AttendanceTally {
    /// Attendance rate over this tally.
    pub fn rate(&self) -> f64 {
        metrics::attendance_rate(self.present, self.total)
    }
}

/// Counts for one course code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseTally {
    /// Course code.
    pub course_code: String,
    /// Course name.
    pub course_name: String,
    /// Department.
    pub department: String,
    /// Attendance rows.
    pub total: i64,
    /// Present rows.
    pub present: i64,
    /// Distinct students with any row.
    pub enrolled: i64,
    /// Distinct students with a present row.
    pub attended: i64,
}

impl CourseTally {
    /// Attendance rate over this course.
    pub fn rate(&self) -> f64 {
        metrics::attendance_rate(self.present, self.total)
    }
}

/// Counts for one student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentTally {
    /// Student id.
    pub student_id: i64,
    /// Display name, empty when soft-deleted.
    pub student_name: String,
    /// Attendance rows.
    pub total: i64,
    /// Present rows.
    pub present: i64,
}

impl StudentTally {
    /// Attendance rate of this student.
    pub fn rate(&self) -> f64 {
        metrics::attendance_rate(self.present, self.total)
    }
}

/// Counts for one trend period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTally {
    /// Period key (`IYYY-IW` or `YYYY-MM`).
    pub period: String,
    /// Attendance rows.
    pub total: i64,
    /// Present rows.
    pub present: i64,
    /// Mean check-in delay in minutes.
    pub average_delay_minutes: f64,
}

/// Counts for one (weekday, hour) cell.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapTally {
    /// ISO weekday, Monday is 1.
    pub weekday: u32,
    /// Hour of day, 0 to 23.
    pub hour: u32,
    /// Attendance rows.
    pub total: i64,
    /// Present rows.
    pub present: i64,
    /// Distinct events.
    pub sessions: i64,
    /// Mean check-in delay in minutes.
    pub average_delay_minutes: f64,
}

/// Per-event counts with the event's descriptive fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTally {
    /// Event id.
    pub event_id: i64,
    /// Course code.
    pub course_code: String,
    /// Course name.
    pub course_name: String,
    /// Department.
    pub department: String,
    /// Venue.
    pub venue: String,
    /// Owning lecturer's display name, empty when unknown.
    pub lecturer_name: String,
    /// Window start.
    pub start_time: DateTime<Utc>,
    /// Window end.
    pub end_time: DateTime<Utc>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Attendance rows.
    pub total: i64,
    /// Present rows.
    pub present: i64,
    /// Distinct students with any row.
    pub distinct_students: i64,
}

impl EventTally {
    /// Attendance rate of this event.
    pub fn rate(&self) -> f64 {
        metrics::attendance_rate(self.present, self.total)
    }
}

/// Institution-wide population counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstitutionCounts {
    /// Live students.
    pub students: i64,
    /// Live lecturers.
    pub lecturers: i64,
    /// Distinct non-empty departments across events and lecturers.
    pub departments: i64,
    /// Live events.
    pub events: i64,
}

/// Activity since a cut-off instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyActivity {
    /// Events created since the cut-off.
    pub events_created: i64,
    /// Check-ins since the cut-off.
    pub checkins: i64,
    /// Events whose window brackets now.
    pub active_sessions: i64,
    /// Most recent check-in ever recorded.
    pub last_check_in: Option<DateTime<Utc>>,
}

/// Counts for one department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentTally {
    /// Department name.
    pub department: String,
    /// Events held.
    pub event_count: i64,
    /// Distinct course codes.
    pub course_count: i64,
    /// Distinct students with a row.
    pub student_count: i64,
    /// Live lecturers attached to the department.
    pub lecturer_count: i64,
    /// Attendance rows.
    pub total: i64,
    /// Present rows.
    pub present: i64,
}

/// Two rows for the same (student, event) recorded close together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCheckin {
    /// Student id.
    pub student_id: i64,
    /// Student display name, empty when soft-deleted.
    pub student_name: String,
    /// Event id.
    pub event_id: i64,
    /// Course name of the event.
    pub course_name: String,
    /// Earlier check-in.
    pub first_marked: DateTime<Utc>,
    /// Later check-in.
    pub second_marked: DateTime<Utc>,
}

/// Course identity resolved from its events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseIdentity {
    /// Course code.
    pub course_code: String,
    /// Course name.
    pub course_name: String,
}

/// Lecturer identity for dashboards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LecturerProfile {
    /// Primary key.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Department.
    pub department: String,
}

/// Calendar dates on which a student was present, newest first.
pub type PresentDates = Vec<NaiveDate>;
