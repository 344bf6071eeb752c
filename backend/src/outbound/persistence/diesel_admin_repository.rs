//! PostgreSQL-backed `AdminRepository` implementation using Diesel ORM.
//!
//! Event deletion and its audit row commit in one transaction so the audit
//! trail never records a deletion that did not happen.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{AdminRepository, AdminRepositoryError, AuditEntry};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewAuditLogRow;
use super::pool::{DbPool, PoolError};
use super::schema::{audit_logs, events, user_attendances};

/// Diesel-backed implementation of the admin repository port.
#[derive(Clone)]
pub struct DieselAdminRepository {
    pool: DbPool,
}

impl DieselAdminRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AdminRepositoryError {
    map_basic_pool_error(error, AdminRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AdminRepositoryError {
    map_basic_diesel_error(
        error,
        AdminRepositoryError::query,
        AdminRepositoryError::connection,
    )
}

fn audit_row(audit: &AuditEntry) -> NewAuditLogRow<'_> {
    NewAuditLogRow {
        timestamp: audit.timestamp,
        user_type: audit.user_type.as_str(),
        user_id: audit.user_id,
        user_email: &audit.user_email,
        action: &audit.action,
        resource_type: &audit.resource_type,
        resource_id: &audit.resource_id,
        details: &audit.details,
        ip_address: audit.ip_address.as_deref(),
        user_agent: audit.user_agent.as_deref(),
        created_at: audit.timestamp,
    }
}

#[async_trait]
impl AdminRepository for DieselAdminRepository {
    async fn delete_event(
        &self,
        event_id: i64,
        audit: &AuditEntry,
    ) -> Result<Option<i64>, AdminRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = audit_row(audit);

        let removed = conn
            .transaction(|conn| {
                async move {
                    let found: Option<i64> = events::table
                        .filter(events::id.eq(event_id))
                        .select(events::id)
                        .first(conn)
                        .await
                        .optional()?;
                    if found.is_none() {
                        return Ok(None);
                    }

                    let removed = diesel::delete(
                        user_attendances::table.filter(user_attendances::event_id.eq(event_id)),
                    )
                    .execute(conn)
                    .await?;
                    diesel::delete(events::table.filter(events::id.eq(event_id)))
                        .execute(conn)
                        .await?;
                    diesel::insert_into(audit_logs::table)
                        .values(&row)
                        .execute(conn)
                        .await?;

                    Ok(Some(removed))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        debug!(event_id, ?removed, "event deletion transaction finished");
        Ok(removed.map(|count| i64::try_from(count).unwrap_or(i64::MAX)))
    }
}
