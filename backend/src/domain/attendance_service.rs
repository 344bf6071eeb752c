//! Attendance domain services.
//!
//! [`AttendanceService`] implements session creation, the check-in state
//! machine and the two attendance reads. Check-in preconditions are evaluated
//! in a fixed order so each bad request receives one deterministic error.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::{
    AttendanceCommand, AttendanceQuery, AttendanceRepository, AttendanceRepositoryError,
    CheckInReceipt, CheckInRequest, CreateSessionRequest, EventRoster, QrEncoder,
    SessionCreated, StudentHistory,
};
use crate::domain::{
    AttendanceStatus, Error, EventDraft, EventValidationError, NewAttendance, NewEvent,
    SessionToken, WindowPosition,
};

fn map_repository_error(error: AttendanceRepositoryError) -> Error {
    match error {
        AttendanceRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("attendance repository unavailable: {message}"))
        }
        AttendanceRepositoryError::Query { message } => {
            Error::internal(format!("attendance repository error: {message}"))
        }
        AttendanceRepositoryError::AlreadyRecorded => {
            Error::already_recorded("attendance already recorded for this event")
        }
        AttendanceRepositoryError::DuplicateToken => {
            Error::conflict("session token collided with an existing session")
        }
    }
}

fn map_validation_error(error: EventValidationError) -> Error {
    let details = match &error {
        EventValidationError::EmptyField { field } => {
            json!({ "field": field, "code": "missing_field" })
        }
        EventValidationError::EndBeforeStart => {
            json!({ "field": "end_time", "code": "end_before_start" })
        }
    };
    Error::invalid_request(error.to_string()).with_details(details)
}

/// Truncate to whole seconds; the store and the window check share this
/// resolution.
fn whole_seconds(instant: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(instant.timestamp(), 0).unwrap_or(instant)
}

/// Attendance service implementing the attendance driving ports.
#[derive(Clone)]
pub struct AttendanceService<R, Q> {
    repo: Arc<R>,
    qr: Arc<Q>,
    clock: Arc<dyn Clock>,
}

impl<R, Q> AttendanceService<R, Q> {
    /// Create a service over a repository, QR encoder and clock.
    pub fn new(repo: Arc<R>, qr: Arc<Q>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, qr, clock }
    }

    fn now(&self) -> DateTime<Utc> {
        whole_seconds(self.clock.utc())
    }
}

#[async_trait]
impl<R, Q> AttendanceCommand for AttendanceService<R, Q>
where
    R: AttendanceRepository,
    Q: QrEncoder,
{
    async fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> Result<SessionCreated, Error> {
        let draft = EventDraft::new(request.fields).map_err(map_validation_error)?;
        let token = SessionToken::mint();
        let qr_code_data = self
            .qr
            .encode_png_base64(token.as_str())
            .map_err(|err| Error::internal(format!("failed to render QR code: {err}")))?;

        let new_event = NewEvent {
            draft,
            lecturer_id: request.lecturer_id,
            token,
            created_at: self.now(),
        };
        let event = self
            .repo
            .create_event(&new_event)
            .await
            .map_err(map_repository_error)?;

        debug!(event_id = event.id, lecturer_id = request.lecturer_id, "session created");
        Ok(SessionCreated {
            event_id: event.id,
            qr_token: event.token.as_str().to_owned(),
            qr_code_data,
            course_name: event.course_name,
            course_code: event.course_code,
            start_time: event.start_time,
            end_time: event.end_time,
            venue: event.venue,
            department: event.department,
            created_by: request.lecturer_id,
            created_at: event.created_at,
            expires_at: event.end_time,
        })
    }

    async fn check_in(&self, request: CheckInRequest) -> Result<CheckInReceipt, Error> {
        let token = SessionToken::from_presented(&request.qr_token).ok_or_else(|| {
            Error::invalid_request("qr_token is required")
                .with_details(json!({ "field": "qr_token", "code": "missing_field" }))
        })?;

        let event = self
            .repo
            .find_event_by_token(&token)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("invalid or unknown QR code"))?;

        let now = self.now();
        match event.window_position(now) {
            WindowPosition::BeforeStart => {
                return Err(Error::too_early("attendance window has not opened yet")
                    .with_details(json!({ "start_time": event.start_time.to_rfc3339() })));
            }
            WindowPosition::AfterEnd => {
                return Err(Error::too_late("attendance window has closed")
                    .with_details(json!({ "end_time": event.end_time.to_rfc3339() })));
            }
            WindowPosition::Open => {}
        }

        if self
            .repo
            .attendance_exists(event.id, request.student_id)
            .await
            .map_err(map_repository_error)?
        {
            return Err(map_repository_error(
                AttendanceRepositoryError::AlreadyRecorded,
            ));
        }

        let record = self
            .repo
            .record_attendance(&NewAttendance {
                event_id: event.id,
                student_id: request.student_id,
                status: AttendanceStatus::Present,
                marked_time: now,
            })
            .await
            .map_err(map_repository_error)?;

        let student = self
            .repo
            .find_student(request.student_id)
            .await
            .map_err(map_repository_error)?
            .unwrap_or_default();

        Ok(CheckInReceipt {
            message: "attendance marked successfully".to_owned(),
            status: record.status,
            student_id: record.student_id,
            student_name: student.name,
            matric_number: student.matric_number,
            course_name: event.course_name,
            course_code: event.course_code,
            marked_time: record.marked_time,
            event_id: event.id,
        })
    }
}

#[async_trait]
impl<R, Q> AttendanceQuery for AttendanceService<R, Q>
where
    R: AttendanceRepository,
    Q: QrEncoder,
{
    async fn event_roster(&self, event_id: i64) -> Result<EventRoster, Error> {
        let event = self
            .repo
            .find_event(event_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("event {event_id} not found")))?;

        let records = self
            .repo
            .event_roster(event_id)
            .await
            .map_err(map_repository_error)?;
        let total_present = records
            .iter()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count() as i64;

        Ok(EventRoster {
            event_id: event.id,
            course_name: event.course_name,
            course_code: event.course_code,
            department: event.department,
            venue: event.venue,
            start_time: event.start_time,
            end_time: event.end_time,
            created_by: event.lecturer_id,
            total_present,
            attendance_records: records,
            generated_at: self.now(),
        })
    }

    async fn student_history(&self, student_id: i64) -> Result<StudentHistory, Error> {
        let student = self
            .repo
            .find_student(student_id)
            .await
            .map_err(map_repository_error)?
            .unwrap_or_default();
        let records = self
            .repo
            .student_history(student_id)
            .await
            .map_err(map_repository_error)?;
        let total_present = records
            .iter()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count() as i64;

        Ok(StudentHistory {
            student_id,
            student_name: student.name,
            matric_number: student.matric_number,
            total_events: records.len() as i64,
            total_present,
            records,
        })
    }
}

#[cfg(test)]
#[path = "attendance_service_tests.rs"]
mod tests;
