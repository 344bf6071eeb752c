//! End-to-end flows through the HTTP adapter, the domain services and an
//! in-memory store.
//!
//! Requests carry real signed credentials; only persistence and the clock are
//! substituted.

#[path = "support/memory_store.rs"]
mod memory_store;

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::{self as actix_test, TestRequest};
use actix_web::{App, web};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use attendance::domain::{
    AdminService, AnalyticsService, AttendanceService, AttendanceStatus, Principal, Role,
};
use attendance::inbound::http::configure;
use attendance::inbound::http::state::{HttpState, HttpStatePorts};
use attendance::outbound::jwt::{JwtCodec, JwtSecret};
use attendance::outbound::qr::PngQrEncoder;
use attendance::test_support::{MutableClock, utc};

use memory_store::MemoryStore;

const LECTURER: i64 = 1;
const ADMIN: i64 = 9;
const S1: i64 = 101;
const S2: i64 = 102;
const S3: i64 = 103;
const EVENT_ID: i64 = 42;

struct World {
    store: Arc<MemoryStore>,
    clock: Arc<MutableClock>,
    codec: JwtCodec,
}

#[fixture]
fn world() -> World {
    let store = Arc::new(MemoryStore::new());
    store.add_lecturer(LECTURER, "Dr. Okafor", "Computer Science");
    store.add_student(S1, "Ada Obi", "CSC/2021/001");
    store.add_student(S2, "Bola Ade", "CSC/2021/002");
    store.add_student(S3, "Chidi Eze", "CSC/2021/003");
    store.set_next_event_id(EVENT_ID);
    World {
        store,
        clock: Arc::new(MutableClock::new(utc(2025, 11, 27, 9, 0, 0))),
        codec: JwtCodec::new(JwtSecret::new("integration-secret")),
    }
}

impl World {
    fn state(&self) -> HttpState {
        let clock: Arc<dyn Clock> = self.clock.clone();
        let attendance = Arc::new(AttendanceService::new(
            Arc::clone(&self.store),
            Arc::new(PngQrEncoder::new()),
            Arc::clone(&clock),
        ));
        HttpState::new(HttpStatePorts {
            attendance: attendance.clone(),
            attendance_query: attendance,
            analytics: Arc::new(AnalyticsService::new(
                Arc::clone(&self.store),
                Arc::clone(&clock),
            )),
            admin: Arc::new(AdminService::new(Arc::clone(&self.store), clock)),
            credentials: Arc::new(self.codec.clone()),
        })
    }

    async fn app(
        &self,
    ) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new(self.state()))
                .configure(configure),
        )
        .await
    }

    /// Signed against the wall clock so the credential is valid when verified.
    fn bearer(&self, id: i64, role: Role) -> (actix_web::http::header::HeaderName, String) {
        let principal = Principal::new(id, format!("user{id}@uni.edu"), role);
        let token = self
            .codec
            .issue(&principal, Utc::now())
            .expect("credential signs");
        (AUTHORIZATION, format!("Bearer {token}"))
    }

    fn at(&self, now: DateTime<Utc>) {
        self.clock.set(now);
    }
}

async fn send<S>(app: &S, request: TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = actix_test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn session_body() -> Value {
    json!({
        "course_code": "CSC301",
        "course_name": "Compiler Construction",
        "department": "Computer Science",
        "venue": "LT1",
        "start_time": "2025-11-27T10:00:00Z",
        "end_time": "2025-11-27T11:00:00Z",
    })
}

async fn open_session<S>(world: &World, app: &S) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        TestRequest::post()
            .uri("/api/lecturer/qrcode/generate")
            .insert_header(world.bearer(LECTURER, Role::Lecturer))
            .set_json(session_body()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["qr_token"]
        .as_str()
        .expect("token in response")
        .to_owned()
}

fn check_in(world: &World, student_id: i64, token: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/attendance/check-in")
        .insert_header(world.bearer(student_id, Role::Student))
        .set_json(json!({ "qr_token": token }))
}

fn roster(world: &World, event_id: i64) -> TestRequest {
    TestRequest::get()
        .uri(&format!("/api/attendance/{event_id}"))
        .insert_header(world.bearer(LECTURER, Role::Lecturer))
}

#[rstest]
#[actix_web::test]
async fn new_session_has_an_empty_roster(world: World) {
    let app = world.app().await;
    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/lecturer/qrcode/generate")
            .insert_header(world.bearer(LECTURER, Role::Lecturer))
            .set_json(session_body()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["event_id"], EVENT_ID);
    assert_eq!(body["data"]["course_code"], "CSC301");
    assert_eq!(body["data"]["expires_at"], "2025-11-27T11:00:00Z");
    assert_eq!(body["data"]["qr_token"].as_str().map(str::len), Some(36));
    assert!(
        body["data"]["qr_code_data"]
            .as_str()
            .is_some_and(|data| data.starts_with("iVBORw0KGgo"))
    );

    let (status, body) = send(&app, roster(&world, EVENT_ID)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_present"], 0);
    assert_eq!(body["data"]["attendance_records"], json!([]));
}

#[rstest]
#[actix_web::test]
async fn second_check_in_is_rejected(world: World) {
    let app = world.app().await;
    let token = open_session(&world, &app).await;

    world.at(utc(2025, 11, 27, 10, 30, 0));
    let (status, body) = send(&app, check_in(&world, S1, &token)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "present");
    assert_eq!(body["data"]["marked_time"], "2025-11-27T10:30:00Z");
    assert_eq!(body["data"]["student_name"], "Ada Obi");
    assert_eq!(body["data"]["event_id"], EVENT_ID);

    world.at(utc(2025, 11, 27, 10, 31, 0));
    let (status, body) = send(&app, check_in(&world, S1, &token)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "already_recorded");

    let (_, body) = send(&app, roster(&world, EVENT_ID)).await;
    assert_eq!(body["data"]["total_present"], 1);
    assert_eq!(body["data"]["attendance_records"][0]["student_id"], S1);
    assert_eq!(
        body["data"]["attendance_records"]
            .as_array()
            .map(Vec::len),
        Some(1)
    );
}

#[rstest]
#[case(utc(2025, 11, 27, 9, 59, 59), StatusCode::BAD_REQUEST, Some("too_early"))]
#[case(utc(2025, 11, 27, 10, 0, 0), StatusCode::OK, None)]
#[case(utc(2025, 11, 27, 11, 0, 0), StatusCode::OK, None)]
#[case(utc(2025, 11, 27, 11, 0, 1), StatusCode::BAD_REQUEST, Some("too_late"))]
#[actix_web::test]
async fn check_in_window_is_inclusive(
    world: World,
    #[case] now: DateTime<Utc>,
    #[case] expected: StatusCode,
    #[case] code: Option<&str>,
) {
    let app = world.app().await;
    let token = open_session(&world, &app).await;

    world.at(now);
    let (status, body) = send(&app, check_in(&world, S2, &token)).await;

    assert_eq!(status, expected, "{body}");
    if let Some(code) = code {
        assert_eq!(body["error"], code);
        assert_eq!(world.store.attendance_rows(EVENT_ID), 0);
    } else {
        assert_eq!(world.store.attendance_rows(EVENT_ID), 1);
    }
}

#[rstest]
#[case(json!({ "qr_token": "" }), StatusCode::BAD_REQUEST, "invalid_request")]
#[case(json!({ "qr_token": "   " }), StatusCode::BAD_REQUEST, "invalid_request")]
#[case(json!({}), StatusCode::BAD_REQUEST, "invalid_request")]
#[case(
    json!({ "qr_token": "00000000-0000-0000-0000-000000000000" }),
    StatusCode::NOT_FOUND,
    "not_found"
)]
#[actix_web::test]
async fn unusable_tokens_are_rejected(
    world: World,
    #[case] payload: Value,
    #[case] expected: StatusCode,
    #[case] code: &str,
) {
    let app = world.app().await;
    open_session(&world, &app).await;
    world.at(utc(2025, 11, 27, 10, 30, 0));

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/attendance/check-in")
            .insert_header(world.bearer(S1, Role::Student))
            .set_json(payload),
    )
    .await;

    assert_eq!(status, expected);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], code);
}

#[rstest]
#[actix_web::test]
async fn concurrent_check_ins_record_once(world: World) {
    let app = world.app().await;
    let token = open_session(&world, &app).await;
    world.at(utc(2025, 11, 27, 10, 15, 0));

    let attempts = (0..8).map(|_| send(&app, check_in(&world, S1, &token)));
    let statuses: Vec<StatusCode> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|(status, _)| status)
        .collect();

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == StatusCode::CONFLICT)
            .count(),
        7
    );
    assert_eq!(world.store.attendance_rows(EVENT_ID), 1);
}

fn seed_history(world: &World, student_id: i64, present: usize, absent: usize) {
    let first = utc(2025, 11, 3, 10, 0, 0);
    let statuses = std::iter::repeat_n(AttendanceStatus::Present, present)
        .chain(std::iter::repeat_n(AttendanceStatus::Absent, absent));
    for (offset, status) in (0_i64..).zip(statuses) {
        world.store.seed_attendance(
            LECTURER,
            "CSC301",
            first + Duration::days(offset),
            student_id,
            status,
        );
    }
}

#[rstest]
#[actix_web::test]
async fn student_metrics_reflect_recorded_rows(world: World) {
    seed_history(&world, S1, 3, 1);
    world.at(utc(2025, 11, 27, 12, 0, 0));
    let app = world.app().await;

    let (status, body) = send(
        &app,
        TestRequest::get()
            .uri(&format!("/api/analytics/student/{S1}"))
            .insert_header(world.bearer(S1, Role::Student)),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let data = &body["data"];
    assert_eq!(data["overall_attendance_rate"], 75.0);
    assert_eq!(data["at_risk_status"], false);
    assert_eq!(data["total_sessions"], 4);
    assert_eq!(data["total_present"], 3);
    assert_eq!(data["total_absent"], 1);
    assert_eq!(data["matric_number"], "CSC/2021/001");
}

#[rstest]
#[actix_web::test]
async fn check_in_moves_student_metrics(world: World) {
    seed_history(&world, S1, 1, 1);
    let app = world.app().await;
    let token = open_session(&world, &app).await;
    let metrics = || {
        TestRequest::get()
            .uri(&format!("/api/analytics/student/{S1}"))
            .insert_header(world.bearer(S1, Role::Student))
    };

    world.at(utc(2025, 11, 27, 10, 5, 0));
    let (_, before) = send(&app, metrics()).await;
    let (status, _) = send(&app, check_in(&world, S1, &token)).await;
    assert_eq!(status, StatusCode::OK);
    let (_, after) = send(&app, metrics()).await;

    assert_eq!(before["data"]["total_sessions"], 2);
    assert_eq!(before["data"]["total_present"], 1);
    assert_eq!(after["data"]["total_sessions"], 3);
    assert_eq!(after["data"]["total_present"], 2);
}

#[rstest]
#[actix_web::test]
async fn low_attendance_insights_recommend_action(world: World) {
    seed_history(&world, S3, 3, 2);
    world.at(utc(2025, 11, 27, 12, 0, 0));
    let app = world.app().await;

    let (status, body) = send(
        &app,
        TestRequest::get()
            .uri(&format!("/api/analytics/student/{S3}/insights"))
            .insert_header(world.bearer(S3, Role::Student)),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let summary = body["data"]["summary"].as_str().expect("summary text");
    assert!(summary.contains("60.0%"), "{summary}");
    assert!(summary.contains("below the 75% threshold"), "{summary}");
    let recommendations = body["data"]["recommendations"]
        .as_array()
        .expect("recommendations");
    assert!(
        recommendations
            .iter()
            .any(|recommendation| recommendation["priority"] == "high")
    );
}

#[rstest]
#[actix_web::test]
async fn deleting_an_event_removes_its_attendance(world: World) {
    let app = world.app().await;
    let token = open_session(&world, &app).await;
    world.at(utc(2025, 11, 27, 10, 30, 0));
    let (status, _) = send(&app, check_in(&world, S1, &token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/admin/events/{EVENT_ID}"))
            .insert_header(world.bearer(ADMIN, Role::Admin))
            .insert_header(("User-Agent", "attendance-tests/1.0")),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = send(&app, roster(&world, EVENT_ID)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, body) = send(
        &app,
        TestRequest::get()
            .uri("/api/attendance/student/records")
            .insert_header(world.bearer(S1, Role::Student)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["records"], json!([]));

    let audit = world.store.audit_log();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].action, "delete_event");
    assert_eq!(audit[0].user_id, ADMIN);
    assert_eq!(audit[0].resource_id, EVENT_ID.to_string());
    assert_eq!(audit[0].user_agent.as_deref(), Some("attendance-tests/1.0"));
}

#[rstest]
#[actix_web::test]
async fn deleting_an_unknown_event_writes_no_audit(world: World) {
    let app = world.app().await;

    let (status, body) = send(
        &app,
        TestRequest::delete()
            .uri("/api/admin/events/999")
            .insert_header(world.bearer(ADMIN, Role::Admin)),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");
    assert!(world.store.audit_log().is_empty());
}

#[rstest]
#[actix_web::test]
async fn students_cannot_open_sessions(world: World) {
    let app = world.app().await;

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/lecturer/qrcode/generate")
            .insert_header(world.bearer(S1, Role::Student))
            .set_json(session_body()),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}
