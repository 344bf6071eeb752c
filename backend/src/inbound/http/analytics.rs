//! Analytics HTTP handlers.
//!
//! ```text
//! GET /api/analytics/student/{id}
//! GET /api/analytics/student/{id}/insights
//! GET /api/analytics/lecturer/courses
//! GET /api/analytics/lecturer/summary
//! GET /api/analytics/lecturer/course/{code}
//! GET /api/analytics/admin/overview
//! GET /api/analytics/admin/departments
//! GET /api/analytics/admin/department/{department}
//! GET /api/analytics/admin/realtime
//! GET /api/analytics/temporal?start=&end=&granularity=
//! GET /api/analytics/anomalies
//! GET /api/analytics/predictions/student/{id}
//! GET /api/analytics/predictions/course/{code}
//! GET /api/analytics/benchmark?entity_type=&entity_id=
//! GET /api/analytics/charts/{type}?entity_type=&entity_id=
//! ```
//!
//! Every handler authenticates, checks the role, validates its inputs and
//! only then queries, so a bad request receives one deterministic error.

use std::future::Future;

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::domain::analytics::{ChartKind, EntityType, Granularity};
use crate::domain::ports::{AnalyticsEntity, TemporalRequest};
use crate::domain::{Error, Principal, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::deadline::run_within;
use crate::inbound::http::envelope;
use crate::inbound::http::schemas::{FailureEnvelopeSchema, SuccessEnvelopeSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_choice, parse_id, parse_optional_date, require_present,
};

const STAFF: [Role; 2] = [Role::Admin, Role::Lecturer];

/// Query string of the temporal report.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TemporalQuery {
    /// First day included (`YYYY-MM-DD`); defaults to 30 days before `end`.
    pub start: Option<String>,
    /// Last day included (`YYYY-MM-DD`); defaults to today.
    pub end: Option<String>,
    /// `weekly` (default) or `monthly`.
    pub granularity: Option<String>,
}

impl TemporalQuery {
    fn into_request(self) -> Result<TemporalRequest, Error> {
        let granularity = match self.granularity.as_deref().map(str::trim) {
            None | Some("") => Granularity::default(),
            Some(raw) => parse_choice(raw, FieldName::new("granularity"))?,
        };
        Ok(TemporalRequest {
            start: parse_optional_date(self.start.as_deref(), FieldName::new("start"))?,
            end: parse_optional_date(self.end.as_deref(), FieldName::new("end"))?,
            granularity,
        })
    }
}

/// Query string naming a benchmark or chart entity.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EntityQuery {
    /// `student`, `course` or `lecturer`.
    pub entity_type: Option<String>,
    /// Numeric id for students and lecturers, course code for courses.
    pub entity_id: Option<String>,
}

impl EntityQuery {
    fn into_entity(self) -> Result<AnalyticsEntity, Error> {
        let raw_type = require_present(self.entity_type, FieldName::new("entity_type"))?;
        let raw_id = require_present(self.entity_id, FieldName::new("entity_id"))?;
        let entity_type: EntityType = parse_choice(&raw_type, FieldName::new("entity_type"))?;
        AnalyticsEntity::parse(entity_type, &raw_id)
    }
}

async fn respond<T, F>(
    state: &HttpState,
    route: &'static str,
    caller: &Principal,
    message: &str,
    work: F,
) -> ApiResult<HttpResponse>
where
    T: Serialize,
    F: Future<Output = ApiResult<T>>,
{
    let data = run_within(route, caller, state.deadlines.analytics, work).await?;
    Ok(envelope::ok(message, data))
}

/// Attendance metrics for one student. Students may only read their own.
#[utoipa::path(
    get,
    path = "/api/analytics/student/{student_id}",
    params(("student_id" = i64, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "Student metrics", body = SuccessEnvelopeSchema),
        (status = 400, description = "Non-numeric id", body = FailureEnvelopeSchema),
        (status = 403, description = "Another student's metrics", body = FailureEnvelopeSchema),
        (status = 404, description = "Unknown student", body = FailureEnvelopeSchema)
    ),
    tags = ["analytics"],
    operation_id = "studentMetrics",
    security(("BearerAuth" = []))
)]
#[get("/analytics/student/{student_id}")]
pub async fn student_metrics(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = caller.into_principal();
    let student_id = parse_id(&path.into_inner(), FieldName::new("student_id"))?;
    caller.ensure_can_view_student(student_id)?;

    respond(
        &state,
        "student_metrics",
        &caller,
        "Student metrics retrieved successfully",
        state.analytics.student_metrics(student_id),
    )
    .await
}

/// Templated insight for one student.
#[utoipa::path(
    get,
    path = "/api/analytics/student/{student_id}/insights",
    params(("student_id" = i64, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "Student insight", body = SuccessEnvelopeSchema),
        (status = 400, description = "Non-numeric id", body = FailureEnvelopeSchema),
        (status = 404, description = "Unknown student", body = FailureEnvelopeSchema)
    ),
    tags = ["analytics"],
    operation_id = "studentInsights",
    security(("BearerAuth" = []))
)]
#[get("/analytics/student/{student_id}/insights")]
pub async fn student_insights(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = caller.into_principal();
    let student_id = parse_id(&path.into_inner(), FieldName::new("student_id"))?;

    respond(
        &state,
        "student_insights",
        &caller,
        "Student insights generated successfully",
        state.analytics.student_insights(student_id),
    )
    .await
}

/// The calling lecturer's events and reach.
#[utoipa::path(
    get,
    path = "/api/analytics/lecturer/courses",
    responses(
        (status = 200, description = "Lecturer course metrics", body = SuccessEnvelopeSchema),
        (status = 403, description = "Caller is not a lecturer", body = FailureEnvelopeSchema)
    ),
    tags = ["analytics"],
    operation_id = "lecturerCourses",
    security(("BearerAuth" = []))
)]
#[get("/analytics/lecturer/courses")]
pub async fn lecturer_courses(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let lecturer = caller.require_role(Role::Lecturer)?;

    respond(
        &state,
        "lecturer_courses",
        &lecturer,
        "Lecturer course metrics retrieved successfully",
        state.analytics.lecturer_courses(lecturer.id()),
    )
    .await
}

/// The calling lecturer's dashboard summary.
#[utoipa::path(
    get,
    path = "/api/analytics/lecturer/summary",
    responses(
        (status = 200, description = "Lecturer summary", body = SuccessEnvelopeSchema),
        (status = 403, description = "Caller is not a lecturer", body = FailureEnvelopeSchema)
    ),
    tags = ["analytics"],
    operation_id = "lecturerSummary",
    security(("BearerAuth" = []))
)]
#[get("/analytics/lecturer/summary")]
pub async fn lecturer_summary(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let lecturer = caller.require_role(Role::Lecturer)?;

    respond(
        &state,
        "lecturer_summary",
        &lecturer,
        "Lecturer summary retrieved successfully",
        state.analytics.lecturer_summary(lecturer.id()),
    )
    .await
}

/// Performance of one course taught by the calling lecturer.
#[utoipa::path(
    get,
    path = "/api/analytics/lecturer/course/{course_code}",
    params(("course_code" = String, Path, description = "Course code")),
    responses(
        (status = 200, description = "Course performance", body = SuccessEnvelopeSchema),
        (status = 403, description = "Caller is not a lecturer", body = FailureEnvelopeSchema),
        (status = 404, description = "Course not taught by the caller", body = FailureEnvelopeSchema)
    ),
    tags = ["analytics"],
    operation_id = "coursePerformance",
    security(("BearerAuth" = []))
)]
#[get("/analytics/lecturer/course/{course_code}")]
pub async fn course_performance(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let lecturer = caller.require_role(Role::Lecturer)?;
    let course_code = require_present(Some(path.into_inner()), FieldName::new("course_code"))?;

    respond(
        &state,
        "course_performance",
        &lecturer,
        "Course performance retrieved successfully",
        state
            .analytics
            .course_performance(lecturer.id(), course_code),
    )
    .await
}

/// Institution-wide overview.
#[utoipa::path(
    get,
    path = "/api/analytics/admin/overview",
    responses(
        (status = 200, description = "Admin overview", body = SuccessEnvelopeSchema),
        (status = 403, description = "Caller is a student", body = FailureEnvelopeSchema)
    ),
    tags = ["analytics"],
    operation_id = "adminOverview",
    security(("BearerAuth" = []))
)]
#[get("/analytics/admin/overview")]
pub async fn admin_overview(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let staff = caller.require_any_role(&STAFF)?;

    respond(
        &state,
        "admin_overview",
        &staff,
        "Admin overview retrieved successfully",
        state.analytics.admin_overview(),
    )
    .await
}

/// Per-department breakdown.
#[utoipa::path(
    get,
    path = "/api/analytics/admin/departments",
    responses(
        (status = 200, description = "Department statistics", body = SuccessEnvelopeSchema),
        (status = 403, description = "Caller is a student", body = FailureEnvelopeSchema)
    ),
    tags = ["analytics"],
    operation_id = "departments",
    security(("BearerAuth" = []))
)]
#[get("/analytics/admin/departments")]
pub async fn departments(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let staff = caller.require_any_role(&STAFF)?;

    respond(
        &state,
        "departments",
        &staff,
        "Department statistics retrieved successfully",
        state.analytics.departments(),
    )
    .await
}

/// Deep dive into one department.
#[utoipa::path(
    get,
    path = "/api/analytics/admin/department/{department}",
    params(("department" = String, Path, description = "Department name")),
    responses(
        (status = 200, description = "Department metrics", body = SuccessEnvelopeSchema),
        (status = 403, description = "Caller is a student", body = FailureEnvelopeSchema)
    ),
    tags = ["analytics"],
    operation_id = "departmentDeepDive",
    security(("BearerAuth" = []))
)]
#[get("/analytics/admin/department/{department}")]
pub async fn department_deep_dive(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let staff = caller.require_any_role(&STAFF)?;
    let department = require_present(Some(path.into_inner()), FieldName::new("department"))?;

    respond(
        &state,
        "department_deep_dive",
        &staff,
        "Department metrics retrieved successfully",
        state.analytics.department_deep_dive(department),
    )
    .await
}

/// Live dashboard.
#[utoipa::path(
    get,
    path = "/api/analytics/admin/realtime",
    responses(
        (status = 200, description = "Real-time dashboard", body = SuccessEnvelopeSchema),
        (status = 403, description = "Caller is a student", body = FailureEnvelopeSchema)
    ),
    tags = ["analytics"],
    operation_id = "realtime",
    security(("BearerAuth" = []))
)]
#[get("/analytics/admin/realtime")]
pub async fn realtime(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let staff = caller.require_any_role(&STAFF)?;

    respond(
        &state,
        "realtime",
        &staff,
        "Real-time dashboard retrieved successfully",
        state.analytics.realtime(),
    )
    .await
}

/// Heatmap, weekday and seasonal rollups.
#[utoipa::path(
    get,
    path = "/api/analytics/temporal",
    params(TemporalQuery),
    responses(
        (status = 200, description = "Temporal analytics", body = SuccessEnvelopeSchema),
        (status = 400, description = "Invalid date or granularity", body = FailureEnvelopeSchema)
    ),
    tags = ["analytics"],
    operation_id = "temporal",
    security(("BearerAuth" = []))
)]
#[get("/analytics/temporal")]
pub async fn temporal(
    state: web::Data<HttpState>,
    caller: Authenticated,
    query: web::Query<TemporalQuery>,
) -> ApiResult<HttpResponse> {
    let caller = caller.into_principal();
    let request = query.into_inner().into_request()?;

    respond(
        &state,
        "temporal",
        &caller,
        "Temporal analytics retrieved successfully",
        state.analytics.temporal(request),
    )
    .await
}

/// Duplicate check-in scan.
#[utoipa::path(
    get,
    path = "/api/analytics/anomalies",
    responses(
        (status = 200, description = "Anomaly scan", body = SuccessEnvelopeSchema)
    ),
    tags = ["analytics"],
    operation_id = "anomalies",
    security(("BearerAuth" = []))
)]
#[get("/analytics/anomalies")]
pub async fn anomalies(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let caller = caller.into_principal();

    respond(
        &state,
        "anomalies",
        &caller,
        "Anomaly detection completed",
        state.analytics.anomalies(),
    )
    .await
}

/// Naive forecast for one student.
#[utoipa::path(
    get,
    path = "/api/analytics/predictions/student/{student_id}",
    params(("student_id" = i64, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "Student prediction", body = SuccessEnvelopeSchema),
        (status = 400, description = "Non-numeric id", body = FailureEnvelopeSchema),
        (status = 404, description = "Unknown student", body = FailureEnvelopeSchema)
    ),
    tags = ["analytics"],
    operation_id = "predictStudent",
    security(("BearerAuth" = []))
)]
#[get("/analytics/predictions/student/{student_id}")]
pub async fn predict_student(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = caller.into_principal();
    let student_id = parse_id(&path.into_inner(), FieldName::new("student_id"))?;

    respond(
        &state,
        "predict_student",
        &caller,
        "Attendance prediction generated successfully",
        state.analytics.predict_student(student_id),
    )
    .await
}

/// Naive forecast for one course.
#[utoipa::path(
    get,
    path = "/api/analytics/predictions/course/{course_code}",
    params(("course_code" = String, Path, description = "Course code")),
    responses(
        (status = 200, description = "Course prediction", body = SuccessEnvelopeSchema),
        (status = 404, description = "Unknown course", body = FailureEnvelopeSchema)
    ),
    tags = ["analytics"],
    operation_id = "predictCourse",
    security(("BearerAuth" = []))
)]
#[get("/analytics/predictions/course/{course_code}")]
pub async fn predict_course(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = caller.into_principal();
    let course_code = require_present(Some(path.into_inner()), FieldName::new("course_code"))?;

    respond(
        &state,
        "predict_course",
        &caller,
        "Course attendance prediction generated successfully",
        state.analytics.predict_course(course_code),
    )
    .await
}

/// Peer comparison for a student or course.
#[utoipa::path(
    get,
    path = "/api/analytics/benchmark",
    params(EntityQuery),
    responses(
        (status = 200, description = "Benchmark comparison", body = SuccessEnvelopeSchema),
        (status = 400, description = "Missing or unsupported entity", body = FailureEnvelopeSchema),
        (status = 404, description = "Unknown entity", body = FailureEnvelopeSchema)
    ),
    tags = ["analytics"],
    operation_id = "benchmark",
    security(("BearerAuth" = []))
)]
#[get("/analytics/benchmark")]
pub async fn benchmark(
    state: web::Data<HttpState>,
    caller: Authenticated,
    query: web::Query<EntityQuery>,
) -> ApiResult<HttpResponse> {
    let caller = caller.into_principal();
    let entity = query.into_inner().into_entity()?;

    respond(
        &state,
        "benchmark",
        &caller,
        "Benchmark comparison retrieved successfully",
        state.analytics.benchmark(entity),
    )
    .await
}

/// Chart-ready data for an entity.
#[utoipa::path(
    get,
    path = "/api/analytics/charts/{chart_type}",
    params(
        ("chart_type" = String, Path, description = "`line` or `bar`"),
        EntityQuery
    ),
    responses(
        (status = 200, description = "Chart data", body = SuccessEnvelopeSchema),
        (status = 400, description = "Unsupported chart or entity", body = FailureEnvelopeSchema)
    ),
    tags = ["analytics"],
    operation_id = "chart",
    security(("BearerAuth" = []))
)]
#[get("/analytics/charts/{chart_type}")]
pub async fn chart(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    query: web::Query<EntityQuery>,
) -> ApiResult<HttpResponse> {
    let caller = caller.into_principal();
    let kind: ChartKind = parse_choice(&path.into_inner(), FieldName::new("chart_type"))?;
    let entity = query.into_inner().into_entity()?;

    respond(
        &state,
        "chart",
        &caller,
        "Chart data retrieved successfully",
        state.analytics.chart(kind, entity),
    )
    .await
}

#[cfg(test)]
#[path = "analytics_tests.rs"]
mod tests;
