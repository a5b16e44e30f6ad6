//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};

use meal_backend::Trace;
#[cfg(debug_assertions)]
use meal_backend::doc::ApiDoc;
use meal_backend::inbound::http::health::{HealthState, live, ready};
use meal_backend::inbound::http::routes::{configure_api, configure_extractors};
use meal_backend::inbound::http::state::HttpState;
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
        .configure(configure_extractors)
        .wrap(Trace)
        .configure(configure_api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app
}

/// Prometheus middleware serving `/metrics`.
#[cfg(feature = "metrics")]
fn default_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("meals")
        .endpoint("/metrics")
        .build()
        .map_err(|err| std::io::Error::other(format!("metrics registration failed: {err}")))
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let bind_addr = config.bind_addr;

    #[cfg(feature = "metrics")]
    let prometheus = default_metrics()?;

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::TimeDelta;
    use rstest::rstest;
    use serde_json::{Value, json};

    use meal_backend::domain::{OrderVisibility, TRACE_ID_HEADER};
    use meal_backend::outbound::security::JwtTokenIssuer;

    use super::*;

    fn memory_app_deps() -> AppDependencies {
        let config = ServerConfig::new(
            "127.0.0.1:0".parse().expect("literal address"),
            JwtTokenIssuer::new(b"server-test-secret", TimeDelta::hours(1)),
            OrderVisibility::Own,
        );
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        AppDependencies {
            health_state,
            http_state: build_http_state(&config),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn signup_then_login_over_the_in_memory_store() {
        let app = test::init_service(build_app(memory_app_deps())).await;

        let signup = test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(json!({ "username": "ada", "password": "pw" }))
            .to_request();
        let res = test::call_service(&app, signup).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert!(res.headers().contains_key(TRACE_ID_HEADER));

        let login = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "username": "ada", "password": "pw" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, login).await;
        let token = body["token"].as_str().expect("token issued");

        let orders = test::TestRequest::get()
            .uri("/api/v1/orders")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let res = test::call_service(&app, orders).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn probes_are_served_outside_the_api_scope() {
        let app = test::init_service(build_app(memory_app_deps())).await;
        let req = test::TestRequest::get().uri("/health/ready").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
