//! Per-connection admin console loop.
//!
//! Keeps WebSocket framing and heartbeats at the edge while the
//! [`ManagementConsole`] owns the console state. The socket pings every 5s and
//! considers a connection idle after 10s without client traffic. Tests
//! shorten both intervals.
//!
//! The client receives a view frame on connect, after every command and
//! whenever a live collection changes. Notifications raised by actions are
//! sent before the view that follows them.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, warn};

use crate::domain::{
    BusinessUnitId, Error, ManagementConsole, ManagerRoleId, Notification, UserId,
};
use crate::inbound::ws::messages::{ConsoleEvent, ConsoleRequest};

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(
    console: ManagementConsole,
    notifications: mpsc::UnboundedReceiver<Notification>,
    session: Session,
    stream: MessageStream,
) {
    WsSession::new(console, notifications)
        .run(session, stream)
        .await;
}

/// Tell a non-admin client where to go, then close the socket.
pub(super) async fn redirect_and_close(mut session: Session, location: String) {
    debug!(%location, "redirecting console socket");
    if let Err(error) = send_json(&mut session, &ConsoleEvent::Redirect { location }).await {
        warn!(error = %error, "WebSocket send failed before redirect close");
        return;
    }
    let reason = CloseReason {
        code: CloseCode::Policy,
        description: Some("admin role required".to_owned()),
    };
    if let Err(error) = session.close(Some(reason)).await {
        warn!(error = %error, "Failed to close WebSocket session");
    }
}

// Action outcomes were already notified; the result is only logged.
fn notified<T>(action: &str, result: Result<T, Error>) {
    if let Err(error) = result {
        debug!(action, code = ?error.code(), "console action failed");
    }
}

async fn send_json<T: serde::Serialize>(session: &mut Session, payload: &T) -> Result<(), Closed> {
    match serde_json::to_string(payload) {
        Ok(body) => session.text(body).await,
        Err(error) => {
            // Debug builds fail fast on schema drift; release logs and keeps going.
            if cfg!(debug_assertions) {
                panic!("console frames must serialize: {error}");
            } else {
                warn!(error = %error, "Failed to serialize WebSocket payload");
            }
            Ok(())
        }
    }
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    InvalidPayload,
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    console: ManagementConsole,
    notifications: mpsc::UnboundedReceiver<Notification>,
}

impl WsSession {
    fn new(
        console: ManagementConsole,
        notifications: mpsc::UnboundedReceiver<Notification>,
    ) -> Self {
        Self {
            console,
            notifications,
        }
    }

    async fn run(&mut self, mut session: Session, mut stream: MessageStream) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        if let Err(error) = self.send_view(&mut session).await {
            warn!(error = %error, "WebSocket send failed; closing connection");
            return;
        }

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    Self::handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message)
                        .await
                }
                () = self.console.changed() => {
                    self.send_view(&mut session).await.map_err(SessionError::Network)
                }
                Some(notification) = self.notifications.recv() => {
                    send_json(&mut session, &ConsoleEvent::from(notification))
                        .await
                        .map_err(SessionError::Network)
                }
            };

            if let Err(error) = result {
                Self::log_shutdown_reason(&error);
                let close_action = Self::close_action_for(&error);
                Self::close_session_if_needed(session, close_action).await;
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &mut self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(message) => self.handle_message(session, last_heartbeat, message).await,
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_message(
        &mut self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Message,
    ) -> Result<(), SessionError> {
        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session
                    .pong(&payload)
                    .await
                    .map_err(SessionError::Network)?;
                Ok(())
            }
            Message::Text(text) => {
                *last_heartbeat = Instant::now();
                self.handle_text_message(session, text.as_ref()).await
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    async fn handle_text_message(
        &mut self,
        session: &mut Session,
        text: &str,
    ) -> Result<(), SessionError> {
        let request = match serde_json::from_str::<ConsoleRequest>(text) {
            Ok(request) => request,
            Err(error) => {
                warn!(error = %error, "Rejected malformed WebSocket payload");
                return Err(SessionError::InvalidPayload);
            }
        };

        if let Err(error) = self.apply(request).await {
            send_json(session, &ConsoleEvent::from(&error))
                .await
                .map_err(SessionError::Network)?;
        }
        self.flush_notifications(session)
            .await
            .map_err(SessionError::Network)?;
        self.send_view(session).await.map_err(SessionError::Network)
    }

    /// Run one command. Errors returned here raised no notification; action
    /// outcomes reach the client as notification frames instead.
    async fn apply(&mut self, request: ConsoleRequest) -> Result<(), Error> {
        match request {
            ConsoleRequest::EditUser { user_id } => {
                let user_id = UserId::new(user_id)
                    .map_err(|err| Error::invalid_request(err.to_string()))?;
                self.console.begin_edit(&user_id)
            }
            ConsoleRequest::SelectRole { role } => self.console.select_role(role),
            ConsoleRequest::SelectBusinessUnit { business_unit_id } => {
                let id = business_unit_id
                    .filter(|raw| !raw.trim().is_empty())
                    .map(BusinessUnitId::new)
                    .transpose()
                    .map_err(|err| Error::invalid_request(err.to_string()))?;
                self.console.select_business_unit(id.as_ref())
            }
            ConsoleRequest::CancelEdit => {
                self.console.cancel_edit();
                Ok(())
            }
            ConsoleRequest::SaveUser => {
                notified("save user", self.console.save_user().await);
                Ok(())
            }
            ConsoleRequest::SelectManager { user_id } => {
                self.console.select_manager(user_id);
                Ok(())
            }
            ConsoleRequest::SelectManagerUnit { business_unit_id } => {
                self.console.select_manager_unit(business_unit_id);
                Ok(())
            }
            ConsoleRequest::AssignManager => {
                notified("assign manager", self.console.assign_manager().await);
                Ok(())
            }
            ConsoleRequest::RemoveManager { id } => {
                let id =
                    ManagerRoleId::new(id).map_err(|err| Error::invalid_request(err.to_string()))?;
                notified("remove manager", self.console.remove_manager(&id).await);
                Ok(())
            }
            ConsoleRequest::SetBusinessUnitName { name } => {
                self.console.set_business_unit_name(name);
                Ok(())
            }
            ConsoleRequest::CreateBusinessUnit => {
                notified("create business unit", self.console.create_business_unit().await);
                Ok(())
            }
        }
    }

    async fn flush_notifications(&mut self, session: &mut Session) -> Result<(), Closed> {
        while let Ok(notification) = self.notifications.try_recv() {
            send_json(session, &ConsoleEvent::from(notification)).await?;
        }
        Ok(())
    }

    async fn send_view(&self, session: &mut Session) -> Result<(), Closed> {
        send_json(session, &ConsoleEvent::view(self.console.view())).await
    }

    fn log_shutdown_reason(error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                warn!("WebSocket heartbeat timeout; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(error = %error, "WebSocket protocol error");
            }
            SessionError::Network(error) => {
                warn!(error = %error, "WebSocket send failed; closing connection");
            }
            SessionError::InvalidPayload
            | SessionError::ClientClosed(_)
            | SessionError::StreamClosed => {}
        }
    }

    fn close_action_for(error: &SessionError) -> CloseAction {
        match error {
            SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            })),
            SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Protocol,
                description: Some("protocol error".to_owned()),
            })),
            SessionError::InvalidPayload => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Policy,
                description: Some("invalid payload".to_owned()),
            })),
            SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
            SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
        }
    }

    async fn close_session_if_needed(session: Session, close_action: CloseAction) {
        if let CloseAction::Close(reason) = close_action {
            if let Err(error) = session.close(reason).await {
                warn!(error = %error, "Failed to close WebSocket session");
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
