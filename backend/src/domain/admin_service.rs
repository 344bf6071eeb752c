//! Administrative domain service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::Error;
use crate::domain::ports::{
    AdminCommand, AdminRepository, AdminRepositoryError, AuditEntry, DeleteEventRequest,
    DeletedEvent,
};

fn map_repository_error(error: AdminRepositoryError) -> Error {
    match error {
        AdminRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("admin repository unavailable: {message}"))
        }
        AdminRepositoryError::Query { message } => {
            Error::internal(format!("admin repository error: {message}"))
        }
    }
}

/// Admin service implementing [`AdminCommand`].
#[derive(Clone)]
pub struct AdminService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> AdminService<R> {
    /// Create a service over the admin repository.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

#[async_trait]
impl<R> AdminCommand for AdminService<R>
where
    R: AdminRepository,
{
    async fn delete_event(&self, request: DeleteEventRequest) -> Result<DeletedEvent, Error> {
        let DeleteEventRequest {
            event_id,
            actor,
            ip_address,
            user_agent,
        } = request;
        let audit = AuditEntry {
            timestamp: self.clock.utc(),
            user_type: actor.role(),
            user_id: actor.id(),
            user_email: actor.email().to_owned(),
            action: "delete_event".to_owned(),
            resource_type: "event".to_owned(),
            resource_id: event_id.to_string(),
            details: json!({ "event_id": event_id }),
            ip_address,
            user_agent,
        };

        let removed = self
            .repo
            .delete_event(event_id, &audit)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("event {event_id} not found")))?;

        info!(event_id, admin_id = actor.id(), attendance_rows_removed = removed, "event deleted");
        Ok(DeletedEvent {
            event_id,
            attendance_rows_removed: removed,
        })
    }
}
