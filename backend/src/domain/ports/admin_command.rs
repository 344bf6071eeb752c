//! Driving port for administrative event deletion.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Error, Principal};

/// Request to delete one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteEventRequest {
    /// Event to delete.
    pub event_id: i64,
    /// Administrator performing the deletion.
    pub actor: Principal,
    /// Client address, when known.
    pub ip_address: Option<String>,
    /// Client user agent, when known.
    pub user_agent: Option<String>,
}

/// Outcome of a deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeletedEvent {
    pub event_id: i64,
    pub attendance_rows_removed: i64,
}

/// Driving port for administrative writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminCommand: Send + Sync {
    /// Delete an event, cascade its attendance rows and audit the action.
    async fn delete_event(&self, request: DeleteEventRequest) -> Result<DeletedEvent, Error>;
}
