//! Server construction and middleware wiring.

mod config;

pub use config::{ServerConfig, load_session_key};

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use admin_console::Trace;
#[cfg(debug_assertions)]
use admin_console::doc::ApiDoc;
use admin_console::domain::ports::FixtureLoginService;
use admin_console::inbound::http::admin::{
    admin_page, assign_manager, console_view, create_business_unit, remove_manager, update_user,
};
use admin_console::inbound::http::health::{HealthState, live, ready};
use admin_console::inbound::http::navigation::navigation;
use admin_console::inbound::http::state::{HttpState, HttpStatePorts};
use admin_console::inbound::http::users::{current_session, login, logout};
use admin_console::inbound::ws;
use admin_console::inbound::ws::state::WsState;
use admin_console::outbound::notifications::TracingNotifier;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
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
        ws_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .service(login)
        .service(logout)
        .service(current_session)
        .service(navigation)
        .service(console_view)
        .service(update_user)
        .service(assign_manager)
        .service(remove_manager)
        .service(create_business_unit);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(ws_state)
        .wrap(session)
        .wrap(Trace)
        .service(api)
        .service(admin_page)
        .service(ws::admin_console_ws)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

fn build_states(config: &ServerConfig) -> (web::Data<HttpState>, web::Data<WsState>) {
    let http_state = HttpState::new(
        HttpStatePorts {
            login: Arc::new(FixtureLoginService),
            directory: Arc::clone(&config.directory),
            notifier: Arc::new(TracingNotifier),
        },
        config.gate.clone(),
    );
    let ws_state = WsState::new(
        Arc::clone(&config.directory),
        Arc::clone(&http_state.sessions),
        config.gate.clone(),
    )
    .with_allowed_origins(config.allowed_origins.clone());
    (web::Data::new(http_state), web::Data::new(ws_state))
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
    let (http_state, ws_state) = build_states(&config);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        #[cfg(feature = "metrics")]
        prometheus,
        ..
    } = config;

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            ws_state: ws_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(actix_web::middleware::Condition::from_option(
            prometheus.clone(),
        ));

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
