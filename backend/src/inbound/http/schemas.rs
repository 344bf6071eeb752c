//! OpenAPI schema definitions for domain and envelope types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their wire shape and exist only for documentation.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in failure envelopes.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// Check-in before the session opened.
    #[schema(rename = "too_early")]
    TooEarly,
    /// Check-in after the session closed.
    #[schema(rename = "too_late")]
    TooLate,
    /// The student is already recorded for the session.
    #[schema(rename = "already_recorded")]
    AlreadyRecorded,
    /// A uniqueness constraint rejected the write.
    #[schema(rename = "conflict")]
    Conflict,
    /// A dependency is temporarily unavailable or the deadline elapsed.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for a success envelope.
///
/// `data` carries the operation-specific report.
#[derive(ToSchema)]
#[schema(as = SuccessEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SuccessEnvelopeSchema {
    /// Always `true`.
    #[schema(example = true)]
    success: bool,
    /// Human-readable outcome.
    #[schema(example = "Check-in successful")]
    message: String,
    /// Operation payload.
    #[schema(value_type = Object)]
    data: serde_json::Value,
}

/// OpenAPI schema for a failure envelope.
#[derive(ToSchema)]
#[schema(as = FailureEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FailureEnvelopeSchema {
    /// Always `false`.
    #[schema(example = false)]
    success: bool,
    /// Human-readable message returned to clients.
    #[schema(example = "attendance already recorded for this event")]
    error_message: String,
    /// Stable machine-readable error code.
    error: ErrorCodeSchema,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "0b1c6f2e-8d7a-4a53-9c1e-5b9e6f0e2a41")]
    trace_id: Option<String>,
}
