//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::analytics::LecturerProfile;
use crate::domain::{AttendanceRecord, AttendanceStatus, Event, SessionToken, StudentProfile};

use super::schema::{audit_logs, events, lecturers, students, user_attendances};

/// Reasons a stored row cannot become a domain value.
#[derive(Debug, thiserror::Error)]
pub(crate) enum RowConversionError {
    #[error("event {0} has an empty qr_code_token")]
    EmptyToken(i64),
    #[error(transparent)]
    Status(#[from] crate::domain::UnknownAttendanceStatus),
}

// ---------------------------------------------------------------------------
// Event models
// ---------------------------------------------------------------------------

/// Row struct for reading from the events table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: i64,
    pub course_code: String,
    pub course_name: String,
    pub department: String,
    pub venue: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub lecturer_id: Option<i64>,
    pub qr_code_token: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = RowConversionError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let token = SessionToken::from_presented(&row.qr_code_token)
            .ok_or(RowConversionError::EmptyToken(row.id))?;
        Ok(Self {
            id: row.id,
            course_code: row.course_code,
            course_name: row.course_name,
            department: row.department,
            venue: row.venue,
            start_time: row.start_time,
            end_time: row.end_time,
            lecturer_id: row.lecturer_id,
            token,
            created_at: row.created_at,
        })
    }
}

/// Insertable struct for creating new events.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub course_code: &'a str,
    pub course_name: &'a str,
    pub department: &'a str,
    pub venue: &'a str,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub lecturer_id: Option<i64>,
    pub qr_code_token: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Attendance models
// ---------------------------------------------------------------------------

/// Row struct for reading from the user_attendances table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_attendances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AttendanceRow {
    pub id: i64,
    pub event_id: i64,
    pub student_id: i64,
    pub status: String,
    pub marked_time: DateTime<Utc>,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = RowConversionError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            event_id: row.event_id,
            student_id: row.student_id,
            status: row.status.parse::<AttendanceStatus>()?,
            marked_time: row.marked_time,
        })
    }
}

/// Insertable struct for check-ins.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_attendances)]
pub(crate) struct NewAttendanceRow<'a> {
    pub event_id: i64,
    pub student_id: i64,
    pub status: &'a str,
    pub marked_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Student models
// ---------------------------------------------------------------------------

/// Identity columns of the students table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StudentRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub matric_number: String,
}

impl From<StudentRow> for StudentProfile {
    fn from(row: StudentRow) -> Self {
        Self {
            id: row.id,
            name: format!("{} {}", row.first_name, row.last_name),
            matric_number: row.matric_number,
        }
    }
}

// ---------------------------------------------------------------------------
// Audit models
// ---------------------------------------------------------------------------

/// Insertable struct for audit log entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_logs)]
pub(crate) struct NewAuditLogRow<'a> {
    pub timestamp: DateTime<Utc>,
    pub user_type: &'a str,
    pub user_id: i64,
    pub user_email: &'a str,
    pub action: &'a str,
    pub resource_type: &'a str,
    pub resource_id: &'a str,
    pub details: &'a serde_json::Value,
    pub ip_address: Option<&'a str>,
    pub user_agent: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Lecturer models
// ---------------------------------------------------------------------------

/// Identity columns of the lecturers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = lecturers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LecturerRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
}

impl From<LecturerRow> for LecturerProfile {
    fn from(row: LecturerRow) -> Self {
        Self {
            id: row.id,
            name: format!("{} {}", row.first_name, row.last_name),
            department: row.department,
        }
    }
}
