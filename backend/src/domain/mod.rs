//! Domain primitives, ports and services.
//!
//! Purpose: define the attendance entities, the analytics formulas and the
//! ports that inbound and outbound adapters meet at. Nothing here depends on
//! actix, Diesel or any other framework type.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Principal and Role: the authenticated caller.
//! - Event, SessionToken and the attendance records.
//! - AttendanceService, AnalyticsService and AdminService: driving port
//!   implementations.

pub mod admin_service;
pub mod analytics;
pub mod analytics_service;
pub mod attendance;
pub mod attendance_service;
pub mod auth;
pub mod error;
pub mod event;
pub mod ports;
pub mod trace_id;

pub use self::admin_service::AdminService;
pub use self::analytics::{AnalyticsPolicy, AttendanceScope, EventScope};
pub use self::analytics_service::AnalyticsService;
pub use self::attendance::{
    AttendanceRecord, AttendanceStatus, HistoryEntry, NewAttendance, RosterEntry,
    StudentProfile, UnknownAttendanceStatus,
};
pub use self::attendance_service::AttendanceService;
pub use self::auth::{Principal, Role, UnknownRole};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::event::{
    Event, EventDraft, EventFields, EventValidationError, NewEvent, SessionToken, WindowPosition,
};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use attendance::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
