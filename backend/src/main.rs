//! Attendance back end entry-point.

mod server;

use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::web;
use color_eyre::eyre::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use attendance::inbound::http::health::HealthState;
use attendance::outbound::jwt::JwtCodec;
use attendance::outbound::persistence::{DbPool, run_pending_migrations};

use server::{ServerConfig, Settings, create_server};

const PING_DEADLINE: Duration = Duration::from_secs(3);

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::load().inspect_err(|err| error!(error = %err, "invalid settings"))?;
    let database_url = settings.database.database_url();
    let pool_config = settings.pool.pool_config(database_url.clone())?;
    let bind_addr = settings.app.bind_addr()?;
    let cors = settings.cors.policy()?;
    let credentials = JwtCodec::new(settings.jwt.resolve(&settings.app)?);

    let pool = DbPool::new(pool_config)
        .await
        .inspect_err(|err| error!(error = %err, "database pool construction failed"))?;
    pool.ping(PING_DEADLINE)
        .await
        .inspect_err(|err| error!(error = %err, "database ping failed"))
        .wrap_err("database unreachable at startup")?;
    let applied = run_pending_migrations(&database_url)
        .await
        .inspect_err(|err| error!(error = %err, "migrations failed"))?;
    info!(applied, "database schema up to date");

    let config = ServerConfig::new(bind_addr, cors, pool, credentials);
    let (host, port) = config.bind_addr();
    info!(host, port, environment = settings.app.environment(), "starting server");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    actix_web::rt::spawn(stop_on_signal(server.handle(), health_state));
    server.await?;

    info!("server stopped");
    Ok(())
}

/// Wait for SIGINT or SIGTERM, fail liveness, then drain the server.
async fn stop_on_signal(handle: ServerHandle, health_state: web::Data<HealthState>) {
    wait_for_signal().await;
    info!("shutdown signal received; draining");
    health_state.mark_unhealthy();
    handle.stop(true).await;
}

#[cfg(unix)]
async fn wait_for_signal() {
    use actix_web::rt::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = actix_web::rt::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(err) => {
            warn!(error = %err, "SIGTERM handler unavailable; waiting for SIGINT only");
            let _ = actix_web::rt::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = actix_web::rt::signal::ctrl_c().await;
}
