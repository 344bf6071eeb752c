//! Attendance rows and the projections read back from them.
//!
//! The core only ever writes [`AttendanceStatus::Present`]; the remaining
//! statuses are reserved for administrative correction but must be read back
//! faithfully by analytics.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recorded status of a (session, student) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    /// Checked in within the window.
    Present,
    /// Marked absent by an administrator.
    Absent,
    /// Marked late by an administrator.
    Late,
    /// Excused by an administrator.
    Excused,
}

impl AttendanceStatus {
    /// Lowercase storage and wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Late => "late",
            Self::Excused => "excused",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown attendance status: {0}")]
pub struct UnknownAttendanceStatus(pub String);

impl FromStr for AttendanceStatus {
    type Err = UnknownAttendanceStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            "late" => Ok(Self::Late),
            "excused" => Ok(Self::Excused),
            other => Err(UnknownAttendanceStatus(other.to_owned())),
        }
    }
}

/// Row written by a successful check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendance {
    /// Session being attended.
    pub event_id: i64,
    /// Student checking in.
    pub student_id: i64,
    /// Always `present` when written by the core.
    pub status: AttendanceStatus,
    /// Server clock at check-in, whole seconds.
    pub marked_time: DateTime<Utc>,
}

/// Persisted attendance row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    /// Primary key.
    pub id: i64,
    /// Session.
    pub event_id: i64,
    /// Student.
    pub student_id: i64,
    /// Status.
    pub status: AttendanceStatus,
    /// Check-in instant.
    pub marked_time: DateTime<Utc>,
}

/// Student identity as rendered in attendance responses.
///
/// Soft-deleted students render with empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentProfile {
    /// Primary key.
    pub id: i64,
    /// Display name, `first last`.
    pub name: String,
    /// Matriculation number.
    pub matric_number: String,
}

/// One line of an event roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    /// Attendance row id.
    pub id: i64,
    /// Student id.
    pub student_id: i64,
    /// Student display name, empty when the student is soft-deleted.
    pub student_name: String,
    /// Matriculation number, empty when the student is soft-deleted.
    pub matric_number: String,
    /// Status.
    pub status: AttendanceStatus,
    /// Check-in instant.
    pub marked_time: DateTime<Utc>,
}

/// One line of a student's attendance history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// Attendance row id.
    pub id: i64,
    /// Session id.
    pub event_id: i64,
    /// Course code of the session.
    pub course_code: String,
    /// Course name of the session.
    pub course_name: String,
    /// Venue of the session.
    pub venue: String,
    /// Status.
    pub status: AttendanceStatus,
    /// Check-in instant.
    pub marked_time: DateTime<Utc>,
}
