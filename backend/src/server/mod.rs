//! Server construction and middleware wiring.

mod config;
mod cors;
mod duration;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::{Settings, SettingsError};

use cors::CorsPolicy;
use state_builders::build_http_state;

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use attendance::Trace;
#[cfg(debug_assertions)]
use attendance::doc::ApiDoc;
use attendance::inbound::http::configure;
use attendance::inbound::http::health::{self, HealthState};
use attendance::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Seconds in-flight requests get to finish after a stop signal.
const SHUTDOWN_GRACE_SECS: u64 = 10;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    cors: CorsPolicy,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        cors,
    } = deps;

    let app = App::new()
        .app_data(http_state)
        .wrap(Trace)
        .wrap(cors.middleware())
        .configure(configure)
        .configure(health::configure(health_state));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the Actix HTTP server.
///
/// Signals are left to the caller, which flips liveness before stopping the
/// returned server through its handle.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        cors,
        db_pool,
        credentials,
    } = config;
    let http_state = web::Data::new(build_http_state(&db_pool, credentials));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            cors: cors.clone(),
        })
    })
    .disable_signals()
    .shutdown_timeout(SHUTDOWN_GRACE_SECS)
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
    use actix_web::test as actix_test;
    use attendance::domain::TRACE_ID_HEADER;
    use attendance::outbound::jwt::{JwtCodec, JwtSecret};
    use attendance::outbound::persistence::{DbPool, PoolConfig};

    use super::cors::CorsInput;

    /// Dependencies over a pool that never opens a connection.
    async fn dependencies() -> AppDependencies {
        let pool = DbPool::new(
            PoolConfig::new("postgres://attendance@127.0.0.1:1/attendance").with_max_idle(None),
        )
        .await
        .expect("pool without idle connections");
        let credentials = JwtCodec::new(JwtSecret::new("server-test-secret"));
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        AppDependencies {
            health_state,
            http_state: web::Data::new(build_http_state(&pool, credentials)),
            cors: CorsPolicy::from_input(CorsInput::default()).expect("default policy"),
        }
    }

    #[actix_web::test]
    async fn assembled_app_serves_probes_through_every_middleware() {
        let app = actix_test::init_service(build_app(dependencies().await)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/health/ready")
                .insert_header((ORIGIN, "https://portal.uni.edu"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(TRACE_ID_HEADER));
        assert!(response.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[actix_web::test]
    async fn assembled_app_guards_api_routes() {
        let app = actix_test::init_service(build_app(dependencies().await)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/attendance/check-in")
                .set_json(serde_json::json!({ "qr_token": "anything" }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
