//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AdminCommand, AnalyticsQuery, AttendanceCommand, AttendanceQuery, CredentialVerifier,
};
use crate::inbound::http::deadline::Deadlines;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub attendance: Arc<dyn AttendanceCommand>,
    pub attendance_query: Arc<dyn AttendanceQuery>,
    pub analytics: Arc<dyn AnalyticsQuery>,
    pub admin: Arc<dyn AdminCommand>,
    pub credentials: Arc<dyn CredentialVerifier>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub attendance: Arc<dyn AttendanceCommand>,
    pub attendance_query: Arc<dyn AttendanceQuery>,
    pub analytics: Arc<dyn AnalyticsQuery>,
    pub admin: Arc<dyn AdminCommand>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub deadlines: Deadlines,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle with the default deadlines.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            attendance,
            attendance_query,
            analytics,
            admin,
            credentials,
        } = ports;
        Self {
            attendance,
            attendance_query,
            analytics,
            admin,
            credentials,
            deadlines: Deadlines::default(),
        }
    }

    /// Replace the handler deadlines.
    #[must_use]
    pub fn with_deadlines(mut self, deadlines: Deadlines) -> Self {
        self.deadlines = deadlines;
        self
    }
}
