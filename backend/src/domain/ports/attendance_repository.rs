//! Port for session and attendance persistence.

use async_trait::async_trait;

use crate::domain::{
    AttendanceRecord, Event, HistoryEntry, NewAttendance, NewEvent, RosterEntry, SessionToken,
    StudentProfile,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by attendance repository adapters.
    pub enum AttendanceRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "attendance repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "attendance repository query failed: {message}",
        /// The (event, student) pair already has a row.
        AlreadyRecorded =>
            "attendance already recorded for this event",
        /// A freshly minted token collided with an existing one.
        DuplicateToken =>
            "session token already exists",
    }
}

/// Port for writing sessions and check-ins and reading them back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Persist a new session and return the stored row.
    async fn create_event(&self, event: &NewEvent) -> Result<Event, AttendanceRepositoryError>;

    /// Find a live session by its token.
    async fn find_event_by_token(
        &self,
        token: &SessionToken,
    ) -> Result<Option<Event>, AttendanceRepositoryError>;

    /// Find a live session by id.
    async fn find_event(&self, event_id: i64) -> Result<Option<Event>, AttendanceRepositoryError>;

    /// Whether the (event, student) pair already has a row.
    async fn attendance_exists(
        &self,
        event_id: i64,
        student_id: i64,
    ) -> Result<bool, AttendanceRepositoryError>;

    /// Insert a check-in row.
    ///
    /// Returns [`AttendanceRepositoryError::AlreadyRecorded`] when the unique
    /// (event, student) constraint rejects the insert.
    async fn record_attendance(
        &self,
        attendance: &NewAttendance,
    ) -> Result<AttendanceRecord, AttendanceRepositoryError>;

    /// Load a live student's profile.
    async fn find_student(
        &self,
        student_id: i64,
    ) -> Result<Option<StudentProfile>, AttendanceRepositoryError>;

    /// Rows for one session, oldest first.
    async fn event_roster(&self, event_id: i64)
    -> Result<Vec<RosterEntry>, AttendanceRepositoryError>;

    /// Rows for one student, newest first.
    async fn student_history(
        &self,
        student_id: i64,
    ) -> Result<Vec<HistoryEntry>, AttendanceRepositoryError>;
}
