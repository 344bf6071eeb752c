//! Async connection pool for Diesel PostgreSQL connections.
//!
//! Wraps `diesel-async` and `bb8`. Connections are recycled once they reach
//! the configured lifetime, checkout waits at most [`CHECKOUT_TIMEOUT`], and
//! every failure surfaces as a [`PoolError`] for repositories to map into
//! their own port errors.

use std::time::Duration;

use diesel::sql_query;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

/// Longest a caller waits for a pooled connection.
pub const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur during pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Failed to check out a connection from the pool.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// Failed to build the connection pool.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },

    /// The liveness probe failed or did not answer in time.
    #[error("database ping failed: {message}")]
    Ping { message: String },
}

impl PoolError {
    /// Create a checkout error with the given message.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Create a build error with the given message.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    /// Create a ping error with the given message.
    pub fn ping(message: impl Into<String>) -> Self {
        Self::Ping {
            message: message.into(),
        }
    }
}

/// Configuration for the database connection pool.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use attendance::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://attendance@localhost/attendance")
///     .with_max_size(25)
///     .with_max_idle(Some(10))
///     .with_max_lifetime(Some(Duration::from_secs(300)));
/// assert_eq!(config.database_url(), "postgres://attendance@localhost/attendance");
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    max_idle: Option<u32>,
    max_lifetime: Option<Duration>,
}

impl PoolConfig {
    /// Create a configuration with 10 open connections, 2 idle connections
    /// and a 30 second connection lifetime.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            max_idle: Some(2),
            max_lifetime: Some(Duration::from_secs(30)),
        }
    }

    /// Set the maximum number of open connections.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the number of idle connections the pool keeps warm.
    pub fn with_max_idle(mut self, max_idle: Option<u32>) -> Self {
        self.max_idle = max_idle;
        self
    }

    /// Set how long a connection lives before it is closed and replaced.
    ///
    /// `None` or a zero duration keeps connections indefinitely.
    pub fn with_max_lifetime(mut self, lifetime: Option<Duration>) -> Self {
        self.max_lifetime = lifetime.filter(|lifetime| !lifetime.is_zero());
        self
    }

    /// Get the database URL.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Async connection pool for PostgreSQL via Diesel.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build a pool with the given configuration.
    ///
    /// Idle connections above the open limit are clamped to it.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Build` if the pool cannot be constructed.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
        let min_idle = config.max_idle.map(|idle| idle.min(config.max_size));

        let pool = Pool::builder()
            .max_size(config.max_size)
            .min_idle(min_idle)
            .max_lifetime(config.max_lifetime)
            .idle_timeout(config.max_lifetime)
            .connection_timeout(CHECKOUT_TIMEOUT)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        Ok(Self { inner: pool })
    }

    /// Get a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Checkout` if a connection cannot be obtained within
    /// [`CHECKOUT_TIMEOUT`].
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }

    /// Run `SELECT 1` on a pooled connection within `deadline`.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Checkout` when no connection is available and
    /// `PoolError::Ping` when the probe fails or exceeds the deadline.
    pub async fn ping(&self, deadline: Duration) -> Result<(), PoolError> {
        let probe = async {
            let mut conn = self.get().await?;
            sql_query("SELECT 1")
                .execute(&mut conn)
                .await
                .map(|_| ())
                .map_err(|err| PoolError::ping(err.to_string()))
        };
        tokio::time::timeout(deadline, probe)
            .await
            .map_err(|_| PoolError::ping(format!("no answer within {deadline:?}")))?
    }
}
