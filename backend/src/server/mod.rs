//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::UserService;
use backend::inbound::http::HttpState;
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::users::{
    create_user, delete_user, get_user, list_users, update_user,
};
use backend::inbound::http::validation::{
    json_error_handler, path_error_handler, query_error_handler,
};
use backend::outbound::persistence::DieselUserRepository;

/// Build the shared HTTP state when a database pool is configured.
fn build_http_state(config: &ServerConfig) -> Option<web::Data<HttpState>> {
    config.db_pool.as_ref().map(|pool| {
        let repository = Arc::new(DieselUserRepository::new(pool.clone()));
        web::Data::new(HttpState::from_service(UserService::new(repository)))
    })
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: Option<web::Data<HttpState>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let mut app = App::new()
        .app_data(health_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(Trace)
        .service(ready)
        .service(live);

    if let Some(http_state) = http_state {
        let api = web::scope("/api/v1")
            .service(create_user)
            .service(list_users)
            .service(get_user)
            .service(update_user)
            .service(delete_user);
        app = app.app_data(http_state).service(api);
    }

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let has_db = http_state.is_some();
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    if has_db {
        health_state.mark_ready();
    }
    Ok(server)
}
