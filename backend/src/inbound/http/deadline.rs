//! Per-request deadlines and server-error logging.
//!
//! Every handler body runs through [`run_within`]. Work that overruns its
//! deadline is dropped, which cancels any in-flight store round-trip, and the
//! caller receives `service_unavailable`.

use std::future::Future;
use std::time::Duration;

use tracing::error;

use crate::domain::{Error, Principal};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::status_for;

/// Deadlines applied to handler bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    /// Session creation, check-in and deletion.
    pub mutation: Duration,
    /// Analytics and attendance reads.
    pub analytics: Duration,
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            mutation: Duration::from_secs(10),
            analytics: Duration::from_secs(30),
        }
    }
}

/// Run `work` within `limit`, logging any 5xx outcome against `route` and the
/// caller.
pub(crate) async fn run_within<T, F>(
    route: &'static str,
    principal: &Principal,
    limit: Duration,
    work: F,
) -> ApiResult<T>
where
    F: Future<Output = ApiResult<T>>,
{
    let outcome = match tokio::time::timeout(limit, work).await {
        Ok(result) => result,
        Err(_) => Err(Error::service_unavailable(format!(
            "request did not complete within {limit:?}"
        ))),
    };

    if let Err(err) = &outcome {
        if status_for(err.code()).is_server_error() {
            error!(
                trace_id = err.trace_id(),
                route,
                principal_id = principal.id(),
                role = %principal.role(),
                error = ?err,
                "request failed"
            );
        }
    }
    outcome
}
