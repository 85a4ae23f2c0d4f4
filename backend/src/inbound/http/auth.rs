//! Session resolution and the admin guard shared by HTTP handlers.

use crate::domain::{Error, GateDecision, SessionState, User, resolve_session};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Resolve the request's session cookie into a [`SessionState`].
pub async fn session_state(state: &HttpState, session: &SessionContext) -> ApiResult<SessionState> {
    let user_id = session.user_id()?;
    Ok(resolve_session(state.sessions.as_ref(), user_id.as_ref()).await)
}

/// Signed-in user or `401 Unauthorized`.
pub async fn require_user(state: &HttpState, session: &SessionContext) -> ApiResult<User> {
    match session_state(state, session).await? {
        SessionState::Resolved(user) => Ok(user),
        SessionState::Loading | SessionState::Absent => {
            Err(Error::unauthorized("login required"))
        }
    }
}

/// Signed-in administrator; `401` without a session and `403` otherwise.
pub async fn require_admin(state: &HttpState, session: &SessionContext) -> ApiResult<User> {
    let session_state = session_state(state, session).await?;
    match (state.gate.evaluate(&session_state), session_state) {
        (GateDecision::Render, SessionState::Resolved(user)) => Ok(user),
        (_, SessionState::Resolved(_)) => Err(Error::forbidden("admin role required")),
        _ => Err(Error::unauthorized("login required")),
    }
}
