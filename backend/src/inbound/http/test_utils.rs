//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::AUTHORIZATION;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    MockAdminCommand, MockAnalyticsQuery, MockAttendanceCommand, MockAttendanceQuery,
};
use crate::domain::{Principal, Role};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::jwt::{JwtCodec, JwtSecret};

const TEST_SECRET: &str = "inbound-http-test-secret-of-32-bytes";

/// Codec sharing the key used by [`TestPorts::into_state`].
pub fn codec() -> JwtCodec {
    JwtCodec::new(JwtSecret::new(TEST_SECRET))
}

/// Sign a credential for `principal` issued at `now`.
pub fn issue(principal: &Principal, now: DateTime<Utc>) -> String {
    codec().issue(principal, now).expect("test credential signs")
}

/// `Authorization` header value for a freshly issued credential.
pub fn bearer_for(principal: &Principal) -> String {
    format!("Bearer {}", issue(principal, Utc::now()))
}

/// `Authorization` header tuple for a freshly issued credential.
pub fn auth_header(principal: &Principal) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, bearer_for(principal))
}

pub fn student(id: i64) -> Principal {
    Principal::new(id, format!("student{id}@uni.edu"), Role::Student)
}

pub fn lecturer(id: i64) -> Principal {
    Principal::new(id, format!("lecturer{id}@uni.edu"), Role::Lecturer)
}

pub fn admin(id: i64) -> Principal {
    Principal::new(id, format!("admin{id}@uni.edu"), Role::Admin)
}

/// Driving-port mocks; unset expectations fail the test when called.
#[derive(Default)]
pub struct TestPorts {
    pub attendance: MockAttendanceCommand,
    pub attendance_query: MockAttendanceQuery,
    pub analytics: MockAnalyticsQuery,
    pub admin: MockAdminCommand,
}

impl TestPorts {
    /// Build handler state over the mocks and a real credential codec.
    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            attendance: Arc::new(self.attendance),
            attendance_query: Arc::new(self.attendance_query),
            analytics: Arc::new(self.analytics),
            admin: Arc::new(self.admin),
            credentials: Arc::new(codec()),
        })
    }
}

/// Application with every API route over `state`.
pub fn test_app(
    state: HttpState,
) -> actix_web::App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    actix_web::App::new()
        .app_data(actix_web::web::Data::new(state))
        .configure(crate::inbound::http::configure)
}
