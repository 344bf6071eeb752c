//! Administrative HTTP handlers.
//!
//! ```text
//! DELETE /api/admin/events/{event_id}
//! ```

use actix_web::http::header::USER_AGENT;
use actix_web::{HttpRequest, HttpResponse, delete, web};

use crate::domain::Role;
use crate::domain::ports::DeleteEventRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::deadline::run_within;
use crate::inbound::http::envelope;
use crate::inbound::http::schemas::{FailureEnvelopeSchema, SuccessEnvelopeSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Delete an event together with its attendance rows.
#[utoipa::path(
    delete,
    path = "/api/admin/events/{event_id}",
    params(("event_id" = i64, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Event deleted", body = SuccessEnvelopeSchema),
        (status = 400, description = "Non-numeric event id", body = FailureEnvelopeSchema),
        (status = 401, description = "Unauthorized", body = FailureEnvelopeSchema),
        (status = 403, description = "Caller is not an administrator", body = FailureEnvelopeSchema),
        (status = 404, description = "Unknown event", body = FailureEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "deleteEvent",
    security(("BearerAuth" = []))
)]
#[delete("/admin/events/{event_id}")]
pub async fn delete_event(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let actor = caller.require_role(Role::Admin)?;
    let event_id = parse_id(&path.into_inner(), FieldName::new("event_id"))?;
    let ip_address = req.connection_info().realip_remote_addr().map(str::to_owned);
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let deleted = run_within(
        "delete_event",
        &actor,
        state.deadlines.mutation,
        state.admin.delete_event(DeleteEventRequest {
            event_id,
            actor: actor.clone(),
            ip_address,
            user_agent,
        }),
    )
    .await?;
    Ok(envelope::ok(
        "Event deleted successfully. All associated attendance records have been removed.",
        deleted,
    ))
}
