//! Session creation, check-in and attendance read handlers.
//!
//! ```text
//! POST /api/lecturer/qrcode/generate
//! POST /api/attendance/check-in {"qr_token":"..."}
//! GET  /api/attendance/student/records
//! GET  /api/attendance/{event_id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CheckInRequest, CreateSessionRequest};
use crate::domain::{Error, EventFields, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::deadline::run_within;
use crate::inbound::http::envelope;
use crate::inbound::http::schemas::{FailureEnvelopeSchema, SuccessEnvelopeSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_rfc3339_timestamp};

/// Request payload for opening a session.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateSessionBody {
    #[schema(example = "CSC301")]
    pub course_code: Option<String>,
    #[schema(example = "Data Structures")]
    pub course_name: Option<String>,
    #[schema(example = "Computer Science")]
    pub department: Option<String>,
    #[schema(example = "LT1")]
    pub venue: Option<String>,
    #[schema(format = "date-time", example = "2025-11-27T10:00:00Z")]
    pub start_time: Option<String>,
    #[schema(format = "date-time", example = "2025-11-27T11:00:00Z")]
    pub end_time: Option<String>,
}

impl CreateSessionBody {
    fn into_fields(self) -> Result<EventFields, Error> {
        Ok(EventFields {
            start_time: parse_rfc3339_timestamp(self.start_time, FieldName::new("start_time"))?,
            end_time: parse_rfc3339_timestamp(self.end_time, FieldName::new("end_time"))?,
            course_code: self.course_code.unwrap_or_default(),
            course_name: self.course_name.unwrap_or_default(),
            department: self.department.unwrap_or_default(),
            venue: self.venue.unwrap_or_default(),
        })
    }
}

/// Request payload for a check-in.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CheckInBody {
    /// Token exactly as scanned from the QR code.
    pub qr_token: Option<String>,
}

/// Open a session and return its QR code.
#[utoipa::path(
    post,
    path = "/api/lecturer/qrcode/generate",
    request_body = CreateSessionBody,
    responses(
        (status = 201, description = "Session created", body = SuccessEnvelopeSchema),
        (status = 400, description = "Invalid request", body = FailureEnvelopeSchema),
        (status = 401, description = "Unauthorized", body = FailureEnvelopeSchema),
        (status = 403, description = "Caller is not a lecturer", body = FailureEnvelopeSchema),
        (status = 503, description = "Service unavailable", body = FailureEnvelopeSchema)
    ),
    tags = ["attendance"],
    operation_id = "createSession",
    security(("BearerAuth" = []))
)]
#[post("/lecturer/qrcode/generate")]
pub async fn create_session(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CreateSessionBody>,
) -> ApiResult<HttpResponse> {
    let lecturer = caller.require_role(Role::Lecturer)?;
    let fields = payload.into_inner().into_fields()?;

    let created = run_within(
        "create_session",
        &lecturer,
        state.deadlines.mutation,
        state.attendance.create_session(CreateSessionRequest {
            lecturer_id: lecturer.id(),
            fields,
        }),
    )
    .await?;
    Ok(envelope::created("QR code generated successfully", created))
}

/// Check the calling student into the session named by a scanned token.
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body = CheckInBody,
    responses(
        (status = 200, description = "Attendance recorded", body = SuccessEnvelopeSchema),
        (status = 400, description = "Missing token or outside the session window", body = FailureEnvelopeSchema),
        (status = 401, description = "Unauthorized", body = FailureEnvelopeSchema),
        (status = 403, description = "Caller is not a student", body = FailureEnvelopeSchema),
        (status = 404, description = "Unknown token", body = FailureEnvelopeSchema),
        (status = 409, description = "Already recorded", body = FailureEnvelopeSchema)
    ),
    tags = ["attendance"],
    operation_id = "checkIn",
    security(("BearerAuth" = []))
)]
#[post("/attendance/check-in")]
pub async fn check_in(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CheckInBody>,
) -> ApiResult<HttpResponse> {
    let student = caller.require_role(Role::Student)?;
    let qr_token = payload.into_inner().qr_token.unwrap_or_default();

    let receipt = run_within(
        "check_in",
        &student,
        state.deadlines.mutation,
        state.attendance.check_in(CheckInRequest {
            student_id: student.id(),
            qr_token,
        }),
    )
    .await?;
    Ok(envelope::ok("Check-in successful", receipt))
}

/// The calling student's attendance history, newest first.
#[utoipa::path(
    get,
    path = "/api/attendance/student/records",
    responses(
        (status = 200, description = "Attendance history", body = SuccessEnvelopeSchema),
        (status = 401, description = "Unauthorized", body = FailureEnvelopeSchema),
        (status = 403, description = "Caller is not a student", body = FailureEnvelopeSchema)
    ),
    tags = ["attendance"],
    operation_id = "studentRecords",
    security(("BearerAuth" = []))
)]
#[get("/attendance/student/records")]
pub async fn student_records(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let student = caller.require_role(Role::Student)?;

    let history = run_within(
        "student_records",
        &student,
        state.deadlines.analytics,
        state.attendance_query.student_history(student.id()),
    )
    .await?;
    Ok(envelope::ok(
        "Student attendance records retrieved successfully",
        history,
    ))
}

/// Every check-in recorded for one session.
#[utoipa::path(
    get,
    path = "/api/attendance/{event_id}",
    params(("event_id" = i64, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Event roster", body = SuccessEnvelopeSchema),
        (status = 400, description = "Non-numeric event id", body = FailureEnvelopeSchema),
        (status = 401, description = "Unauthorized", body = FailureEnvelopeSchema),
        (status = 403, description = "Caller is not a lecturer", body = FailureEnvelopeSchema),
        (status = 404, description = "Unknown event", body = FailureEnvelopeSchema)
    ),
    tags = ["attendance"],
    operation_id = "eventRoster",
    security(("BearerAuth" = []))
)]
#[get("/attendance/{event_id}")]
pub async fn event_roster(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let lecturer = caller.require_role(Role::Lecturer)?;
    let event_id = parse_id(&path.into_inner(), FieldName::new("event_id"))?;

    let roster = run_within(
        "event_roster",
        &lecturer,
        state.deadlines.analytics,
        state.attendance_query.event_roster(event_id),
    )
    .await?;
    Ok(envelope::ok("Attendance records retrieved successfully", roster))
}

#[cfg(test)]
#[path = "attendance_tests.rs"]
mod tests;
