//! Port for administrative mutations and their audit trail.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::Role;

use super::define_port_error;

define_port_error! {
    /// Errors raised by admin repository adapters.
    pub enum AdminRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "admin repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "admin repository query failed: {message}",
    }
}

/// One audit-log row.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    /// When the action happened.
    pub timestamp: DateTime<Utc>,
    /// Role of the actor.
    pub user_type: Role,
    /// Actor id.
    pub user_id: i64,
    /// Actor email.
    pub user_email: String,
    /// Action name, e.g. `delete_event`.
    pub action: String,
    /// Resource kind, e.g. `event`.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Free-form context.
    pub details: Value,
    /// Client address, when known.
    pub ip_address: Option<String>,
    /// Client user agent, when known.
    pub user_agent: Option<String>,
}

/// Port for administrative writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Delete an event and its attendance rows and record `audit`, atomically.
    ///
    /// Returns the number of attendance rows removed, or `None` when the event
    /// does not exist (nothing is written in that case).
    async fn delete_event(
        &self,
        event_id: i64,
        audit: &AuditEntry,
    ) -> Result<Option<i64>, AdminRepositoryError>;
}
