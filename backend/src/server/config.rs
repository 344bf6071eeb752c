//! HTTP server configuration object.

use attendance::outbound::jwt::JwtCodec;
use attendance::outbound::persistence::DbPool;

use super::cors::CorsPolicy;

/// Everything [`super::create_server`] needs beyond the health state.
pub struct ServerConfig {
    pub(crate) bind_addr: (String, u16),
    pub(crate) cors: CorsPolicy,
    pub(crate) db_pool: DbPool,
    pub(crate) credentials: JwtCodec,
}

impl ServerConfig {
    /// Construct a server configuration from resolved settings.
    #[must_use]
    pub fn new(
        bind_addr: (String, u16),
        cors: CorsPolicy,
        db_pool: DbPool,
        credentials: JwtCodec,
    ) -> Self {
        Self {
            bind_addr,
            cors,
            db_pool,
            credentials,
        }
    }

    /// Host and port the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> (&str, u16) {
        (self.bind_addr.0.as_str(), self.bind_addr.1)
    }
}
