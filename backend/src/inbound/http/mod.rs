//! HTTP inbound adapter exposing the attendance REST API.
//!
//! Handlers only depend on the driving ports held in [`state::HttpState`].
//! [`configure`] registers every `/api` route and is shared by the server
//! binary and the test suites.

pub mod admin;
pub mod analytics;
pub mod attendance;
pub mod auth;
pub mod cache_control;
pub mod deadline;
pub mod envelope;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

use crate::domain::Error;

pub use error::ApiResult;

fn malformed_body(err: impl std::fmt::Display) -> actix_web::Error {
    Error::invalid_request(format!("malformed request: {err}")).into()
}

/// Register the `/api` scope with its extractor policies.
///
/// `/attendance/student/records` is registered ahead of
/// `/attendance/{event_id}` so the literal segment wins.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| malformed_body(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _| malformed_body(err)))
        .service(
            web::scope("/api")
                .service(attendance::create_session)
                .service(attendance::check_in)
                .service(attendance::student_records)
                .service(attendance::event_roster)
                .service(analytics::student_insights)
                .service(analytics::student_metrics)
                .service(analytics::lecturer_courses)
                .service(analytics::lecturer_summary)
                .service(analytics::course_performance)
                .service(analytics::admin_overview)
                .service(analytics::departments)
                .service(analytics::department_deep_dive)
                .service(analytics::realtime)
                .service(analytics::temporal)
                .service(analytics::anomalies)
                .service(analytics::predict_student)
                .service(analytics::predict_course)
                .service(analytics::benchmark)
                .service(analytics::chart)
                .service(admin::delete_event),
        );
}
