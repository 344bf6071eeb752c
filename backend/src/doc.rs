//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler in the inbound HTTP layer, the
//! envelope and error-code schemas from [`crate::inbound::http::schemas`],
//! and the bearer credential security scheme. Swagger UI serves it in
//! debug builds.

use crate::inbound::http::attendance::{CheckInBody, CreateSessionBody};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, FailureEnvelopeSchema, SuccessEnvelopeSchema,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("HS256 credential issued by the login service."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Attendance API",
        description = "QR session check-in and attendance analytics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::attendance::create_session,
        crate::inbound::http::attendance::check_in,
        crate::inbound::http::attendance::student_records,
        crate::inbound::http::attendance::event_roster,
        crate::inbound::http::analytics::student_metrics,
        crate::inbound::http::analytics::student_insights,
        crate::inbound::http::analytics::lecturer_courses,
        crate::inbound::http::analytics::lecturer_summary,
        crate::inbound::http::analytics::course_performance,
        crate::inbound::http::analytics::admin_overview,
        crate::inbound::http::analytics::departments,
        crate::inbound::http::analytics::department_deep_dive,
        crate::inbound::http::analytics::realtime,
        crate::inbound::http::analytics::temporal,
        crate::inbound::http::analytics::anomalies,
        crate::inbound::http::analytics::predict_student,
        crate::inbound::http::analytics::predict_course,
        crate::inbound::http::analytics::benchmark,
        crate::inbound::http::analytics::chart,
        crate::inbound::http::admin::delete_event,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CreateSessionBody,
        CheckInBody,
        SuccessEnvelopeSchema,
        FailureEnvelopeSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "attendance", description = "Session creation and check-in"),
        (name = "analytics", description = "Attendance reports"),
        (name = "admin", description = "Administrative operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn failure_envelope_schema_has_wire_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let failure = schemas.get("FailureEnvelope").expect("FailureEnvelope schema");

        assert_object_schema_has_field(failure, "error_message");
        assert_object_schema_has_field(failure, "error");
    }

    #[rstest]
    #[case("/api/lecturer/qrcode/generate")]
    #[case("/api/attendance/check-in")]
    #[case("/api/analytics/charts/{chart_type}")]
    #[case("/api/admin/events/{event_id}")]
    #[case("/health/ready")]
    fn document_lists_routes(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerAuth"));
    }
}
