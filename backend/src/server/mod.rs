//! Server construction and middleware wiring.

mod settings;
mod state_builders;

pub use settings::{AppSettings, ConfigError, RuntimeConfig};

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use icumbi::Trace;
#[cfg(debug_assertions)]
use icumbi::doc::ApiDoc;
use icumbi::inbound::http::configure;
use icumbi::inbound::http::health::{HealthState, live, ready};
use icumbi::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from validated settings.
///
/// # Parameters
/// - `health_state`: shared readiness state flipped once the listener binds.
/// - `config`: validated [`RuntimeConfig`] with the backend URL, keys, and
///   bind address.
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when an HTTP client cannot be built or the
/// socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: RuntimeConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config)?;
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, backend = %config.supabase_url, "listening");
    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Tests for server bootstrap and readiness signalling.

    use super::*;
    use actix_web::test as actix_test;
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> RuntimeConfig {
        AppSettings {
            supabase_url: Some("https://abc.supabase.co".to_owned()),
            supabase_anon_key: Some("anon".to_owned()),
            invitation_endpoint: None,
            bind_addr: Some("127.0.0.1:0".to_owned()),
            request_timeout_secs: Some(2),
            rent_due_day: None,
            mail_sender: None,
        }
        .validate()
        .expect("valid settings")
    }

    #[rstest]
    #[actix_rt::test]
    async fn create_server_marks_ready(config: RuntimeConfig) {
        let health_state = web::Data::new(HealthState::new());
        assert!(!health_state.is_ready(), "state should start unready");

        let server = create_server(health_state.clone(), config).expect("server should bind");
        assert!(health_state.is_ready(), "state should be ready after bind");
        let handle = server.handle();
        actix_rt::spawn(server);
        handle.stop(false).await;
    }

    #[rstest]
    #[actix_rt::test]
    async fn app_serves_probes_and_api(config: RuntimeConfig) {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        let http_state = build_http_state(&config).expect("state");
        let app = actix_test::init_service(build_app(AppDependencies {
            health_state,
            http_state,
        }))
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(res.status(), 200);
        assert!(res.headers().contains_key("trace-id"));

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/me").to_request(),
        )
        .await;
        assert_eq!(res.status(), 401, "missing token never reaches the backend");
    }
}
