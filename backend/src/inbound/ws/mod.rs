//! WebSocket inbound adapter serving the live admin console.
//!
//! Responsibilities:
//! - validate upgrade requests against the configured origin allow-list
//! - gate the socket on the session cookie: non-admins get a redirect frame
//! - run one [`ManagementConsole`](crate::domain::ManagementConsole) per
//!   connection

use std::sync::Arc;

use actix_web::http::header::{HeaderValue, ORIGIN};
use actix_web::web::{self, Payload};
use actix_web::{HttpRequest, HttpResponse, get};
use tracing::{error, info, warn};
use url::Url;

use crate::domain::{
    ConsoleActions, GateDecision, ManagementConsole, SessionState, resolve_session,
};
use crate::inbound::http::session::SessionContext;
use crate::outbound::notifications::ChannelNotifier;

mod session;

pub mod messages;
pub mod state;

/// Handle the WebSocket upgrade for `/ws/admin`.
#[get("/ws/admin")]
pub async fn admin_console_ws(
    state: web::Data<state::WsState>,
    session: SessionContext,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }
    validate_origin(&state, origin_header)?;

    let user_id = session.user_id().unwrap_or_else(|err| {
        warn!(error = %err, "unreadable session cookie on WebSocket upgrade");
        None
    });
    let session_state = resolve_session(state.sessions.as_ref(), user_id.as_ref()).await;
    let decision = state.gate.evaluate(&session_state);

    let (response, ws_session, msg_stream) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        actix_web::error::ErrorInternalServerError("WebSocket upgrade failed")
    })?;

    match (decision, session_state) {
        (GateDecision::Render, SessionState::Resolved(user)) => {
            info!(user_id = %user.id(), "admin console connected");
            let (notifier, notifications) = ChannelNotifier::channel();
            let actions = ConsoleActions::new(Arc::clone(&state.directory), Arc::new(notifier));
            let console = ManagementConsole::new(actions);
            actix_web::rt::spawn(session::handle_ws_session(
                console,
                notifications,
                ws_session,
                msg_stream,
            ));
        }
        (GateDecision::Redirect(location), _) => {
            actix_web::rt::spawn(session::redirect_and_close(ws_session, location));
        }
        _ => {
            actix_web::rt::spawn(session::redirect_and_close(
                ws_session,
                state.gate.redirect_route().to_owned(),
            ));
        }
    }
    Ok(response)
}

fn validate_origin(state: &state::WsState, origin_header: &HeaderValue) -> actix_web::Result<()> {
    let origin_value = match origin_header.to_str() {
        Ok(value) => value,
        Err(error) => {
            error!(error = %error, "Failed to parse Origin header as string");
            return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
        }
    };

    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if state.allows(&origin) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}
