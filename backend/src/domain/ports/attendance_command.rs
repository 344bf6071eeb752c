//! Driving port for session creation and student check-in.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{AttendanceStatus, Error, EventFields};

/// Request to open a new session.
#[derive(Debug, Clone)]
pub struct CreateSessionRequest {
    /// Lecturer creating the session.
    pub lecturer_id: i64,
    /// Unvalidated session fields.
    pub fields: EventFields,
}

/// Newly created session with its QR image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionCreated {
    pub event_id: i64,
    pub qr_token: String,
    /// Base64-encoded PNG of the token.
    pub qr_code_data: String,
    pub course_name: String,
    pub course_code: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub venue: String,
    pub department: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Request to check a student into the session named by a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInRequest {
    /// Student checking in.
    pub student_id: i64,
    /// Token as scanned from the QR code.
    pub qr_token: String,
}

/// Confirmation of a successful check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInReceipt {
    pub message: String,
    pub status: AttendanceStatus,
    pub student_id: i64,
    pub student_name: String,
    pub matric_number: String,
    pub course_name: String,
    pub course_code: String,
    pub marked_time: DateTime<Utc>,
    pub event_id: i64,
}

/// Driving port for attendance writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceCommand: Send + Sync {
    /// Validate, persist and QR-encode a new session.
    async fn create_session(&self, request: CreateSessionRequest)
    -> Result<SessionCreated, Error>;

    /// Run the check-in protocol for one student and token.
    async fn check_in(&self, request: CheckInRequest) -> Result<CheckInReceipt, Error>;
}
