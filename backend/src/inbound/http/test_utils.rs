//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::domain::ports::{FixtureLoginService, NoOpNotifier};
use crate::domain::{AuthorizationGate, Email, User, UserId, UserRole};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryDirectory;

/// Cookie session middleware with a throwaway key and insecure cookies.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Directory seeded with the fixture accounts plus a manager called Grace.
pub fn seeded_directory() -> Arc<InMemoryDirectory> {
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

/// State wired to `directory` with the fixture login service.
pub fn http_state(directory: Arc<InMemoryDirectory>) -> HttpState {
    HttpState::new(
        HttpStatePorts {
            login: Arc::new(FixtureLoginService),
            directory,
            notifier: Arc::new(NoOpNotifier),
        },
        AuthorizationGate::default(),
    )
}
