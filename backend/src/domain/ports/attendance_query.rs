//! Driving port for reading rosters and attendance histories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Error, HistoryEntry, RosterEntry};

/// Every check-in recorded for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRoster {
    pub event_id: i64,
    pub course_name: String,
    pub course_code: String,
    pub department: String,
    pub venue: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_by: Option<i64>,
    pub total_present: i64,
    pub attendance_records: Vec<RosterEntry>,
    pub generated_at: DateTime<Utc>,
}

/// A student's own attendance rows, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentHistory {
    pub student_id: i64,
    pub student_name: String,
    pub matric_number: String,
    pub total_events: i64,
    pub total_present: i64,
    pub records: Vec<HistoryEntry>,
}

/// Driving port for attendance reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceQuery: Send + Sync {
    /// Roster of one session.
    async fn event_roster(&self, event_id: i64) -> Result<EventRoster, Error>;

    /// History of one student.
    async fn student_history(&self, student_id: i64) -> Result<StudentHistory, Error>;
}
