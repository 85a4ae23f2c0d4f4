//! Server harness and shared world for console scenarios.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. Dropping the `WorldFixture` stops the
//! server even if a step panics.

use std::cell::RefCell;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite, time::Duration as CookieDuration};
use actix_web::dev::ServerHandle;
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
use admin_console::Trace;
use admin_console::domain::ports::{FixtureLoginService, NoOpNotifier};
use admin_console::domain::{AuthorizationGate, Email, User, UserId, UserRole};
use admin_console::inbound::http::admin::{
    admin_page, assign_manager, console_view, create_business_unit, remove_manager, update_user,
};
use admin_console::inbound::http::state::{HttpState, HttpStatePorts};
use admin_console::inbound::http::users::login;
use admin_console::outbound::memory::InMemoryDirectory;
use awc::Client;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

pub(crate) struct ConsoleWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) directory: Arc<InMemoryDirectory>,
    pub(crate) session_cookie: Option<String>,
    pub(crate) business_unit_id: Option<String>,
    pub(crate) manager_role_id: Option<String>,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_location: Option<String>,
    pub(crate) last_body: Option<Value>,
}

pub(crate) type SharedWorld = Rc<RefCell<ConsoleWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        // `LocalSet` must be driven on the thread that owns it.
        let ctx = self.world.borrow();
        let server = ctx.server.clone();
        ctx.local.block_on(&ctx.runtime, async move {
            server.stop(true).await;
        });
    }
}

pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

fn test_session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(PersistentSession::default().session_ttl(CookieDuration::hours(2)))
        .build()
}

/// Fixture accounts plus a manager named Grace.
pub(crate) fn seeded_directory() -> Arc<InMemoryDirectory> {
    let mut users = FixtureLoginService::seed_users().expect("fixture users");
    users.push(
        User::new(
            UserId::new("grace").expect("user id"),
            Email::new("grace@example.com").expect("email"),
            UserRole::Manager,
        )
        .with_display_name("Grace Hopper"),
    );
    Arc::new(InMemoryDirectory::with_users(users))
}

async fn spawn_console_server(
    directory: Arc<InMemoryDirectory>,
) -> Result<(String, ServerHandle), String> {
    let key = Key::generate();
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let http_data = web::Data::new(HttpState::new(
        HttpStatePorts {
            login: Arc::new(FixtureLoginService),
            directory,
            notifier: Arc::new(NoOpNotifier),
        },
        AuthorizationGate::default(),
    ));

    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1")
            .service(login)
            .service(console_view)
            .service(update_user)
            .service(assign_manager)
            .service(remove_manager)
            .service(create_business_unit);

        App::new()
            .app_data(http_data.clone())
            .wrap(test_session_middleware(key.clone()))
            .wrap(Trace)
            .service(api)
            .service(admin_page)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok((format!("http://{addr}"), handle))
}

pub(crate) fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let directory = seeded_directory();
    let (base_url, server) = local
        .block_on(&runtime, spawn_console_server(Arc::clone(&directory)))
        .expect("console server");

    WorldFixture {
        world: Rc::new(RefCell::new(ConsoleWorld {
            runtime,
            local,
            base_url,
            server,
            directory,
            session_cookie: None,
            business_unit_id: None,
            manager_role_id: None,
            last_status: None,
            last_location: None,
            last_body: None,
        })),
    }
}

/// Sign in and keep the `name=value` pair of the session cookie.
pub(crate) fn sign_in(world: &SharedWorld, username: &str) {
    let username = username.to_owned();
    let cookie = with_world_async(world, |base_url| async move {
        let response = Client::default()
            .post(format!("{base_url}/api/v1/login"))
            .send_json(&serde_json::json!({ "username": username, "password": "password" }))
            .await
            .expect("login request");
        assert!(response.status().is_success(), "login failed");
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_owned)
    });
    world.borrow_mut().session_cookie = cookie;
}

/// Send a request with the stored cookie and record status, location and body.
pub(crate) fn perform(world: &SharedWorld, method: Method, path: &str, payload: Option<Value>) {
    let cookie = world.borrow().session_cookie.clone();
    let path = path.to_owned();
    let (status, location, body) = with_world_async(world, |base_url| async move {
        // Redirects are asserted, not followed.
        let client = Client::builder().disable_redirects().finish();
        let mut request = client.request(method, format!("{base_url}{path}"));
        if let Some(cookie) = cookie {
            request = request.insert_header((header::COOKIE, cookie));
        }
        let mut response = match payload {
            Some(payload) => request.send_json(&payload).await.expect("console request"),
            None => request.send().await.expect("console request"),
        };
        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.body().await.expect("response body");
        let json = serde_json::from_slice(&body).ok();
        (status, location, json)
    });

    let mut ctx = world.borrow_mut();
    ctx.last_status = Some(status);
    ctx.last_location = location;
    ctx.last_body = body;
}
