//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`AttendanceCommand`, `AttendanceQuery`, `AnalyticsQuery`,
//! `AdminCommand`) are what inbound adapters call. Driven ports
//! (repositories, the QR encoder and the credential verifier) are what the
//! services call out to.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_command;
mod admin_repository;
mod analytics_query;
mod analytics_repository;
mod attendance_command;
mod attendance_query;
mod attendance_repository;
mod credential_verifier;
mod qr_encoder;

#[cfg(test)]
pub use admin_command::MockAdminCommand;
pub use admin_command::{AdminCommand, DeleteEventRequest, DeletedEvent};
#[cfg(test)]
pub use admin_repository::MockAdminRepository;
pub use admin_repository::{AdminRepository, AdminRepositoryError, AuditEntry};
#[cfg(test)]
pub use analytics_query::MockAnalyticsQuery;
pub use analytics_query::{AnalyticsEntity, AnalyticsQuery, TemporalRequest};
#[cfg(test)]
pub use analytics_repository::MockAnalyticsRepository;
pub use analytics_repository::{AnalyticsRepository, AnalyticsRepositoryError};
#[cfg(test)]
pub use attendance_command::MockAttendanceCommand;
pub use attendance_command::{
    AttendanceCommand, CheckInReceipt, CheckInRequest, CreateSessionRequest, SessionCreated,
};
#[cfg(test)]
pub use attendance_query::MockAttendanceQuery;
pub use attendance_query::{AttendanceQuery, EventRoster, StudentHistory};
#[cfg(test)]
pub use attendance_repository::MockAttendanceRepository;
pub use attendance_repository::{AttendanceRepository, AttendanceRepositoryError};
#[cfg(test)]
pub use credential_verifier::MockCredentialVerifier;
pub use credential_verifier::{CredentialError, CredentialVerifier};
#[cfg(test)]
pub use qr_encoder::MockQrEncoder;
pub use qr_encoder::{QrEncoder, QrEncodingError};
