//! Wire frames exchanged with the admin console client.
//!
//! Every frame is a JSON object tagged by `type`. Clients send
//! [`ConsoleRequest`]s; the server answers with [`ConsoleEvent`]s.

use serde::{Deserialize, Serialize};

use crate::domain::{ConsoleView, Error, ErrorCode, Notification, UserRole};

/// Inbound console command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ConsoleRequest {
    /// Open the editor for a user, or retarget the open one.
    EditUser { user_id: String },
    SelectRole { role: UserRole },
    /// Pick a unit in the editor; `null` or `""` clears it.
    SelectBusinessUnit {
        #[serde(default)]
        business_unit_id: Option<String>,
    },
    CancelEdit,
    SaveUser,
    SelectManager { user_id: String },
    SelectManagerUnit { business_unit_id: String },
    AssignManager,
    RemoveManager { id: String },
    SetBusinessUnitName { name: String },
    CreateBusinessUnit,
}

/// Outbound frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConsoleEvent {
    /// Full console state; sent on connect, after each command and whenever a
    /// collection changes.
    View { view: Box<ConsoleView> },
    Notification { notification: Notification },
    /// The session may not use the console; the socket closes next.
    Redirect { location: String },
    /// A command that raises no notification was refused.
    Error { code: ErrorCode, message: String },
}

impl ConsoleEvent {
    pub fn view(view: ConsoleView) -> Self {
        Self::View {
            view: Box::new(view),
        }
    }
}

impl From<&Error> for ConsoleEvent {
    fn from(error: &Error) -> Self {
        Self::Error {
            code: error.code(),
            message: error.message().to_owned(),
        }
    }
}

impl From<Notification> for ConsoleEvent {
    fn from(notification: Notification) -> Self {
        Self::Notification { notification }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConsoleAction;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(
        json!({ "type": "editUser", "userId": "ada" }),
        ConsoleRequest::EditUser { user_id: "ada".into() }
    )]
    #[case(
        json!({ "type": "selectRole", "role": "manager" }),
        ConsoleRequest::SelectRole { role: UserRole::Manager }
    )]
    #[case(
        json!({ "type": "selectBusinessUnit" }),
        ConsoleRequest::SelectBusinessUnit { business_unit_id: None }
    )]
    #[case(json!({ "type": "saveUser" }), ConsoleRequest::SaveUser)]
    #[case(
        json!({ "type": "removeManager", "id": "eng_ada" }),
        ConsoleRequest::RemoveManager { id: "eng_ada".into() }
    )]
    #[case(
        json!({ "type": "setBusinessUnitName", "name": "Ops" }),
        ConsoleRequest::SetBusinessUnitName { name: "Ops".into() }
    )]
    fn parses_requests(#[case] raw: serde_json::Value, #[case] expected: ConsoleRequest) {
        let parsed: ConsoleRequest = serde_json::from_value(raw).expect("valid request");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case(json!({ "type": "dropTables" }))]
    #[case(json!({ "type": "selectRole", "role": "owner" }))]
    #[case(json!({ "userId": "ada" }))]
    fn rejects_unknown_requests(#[case] raw: serde_json::Value) {
        assert!(serde_json::from_value::<ConsoleRequest>(raw).is_err());
    }

    #[rstest]
    fn notification_frames_are_tagged() {
        let frame = ConsoleEvent::from(ConsoleAction::CreateBusinessUnit.succeeded());
        let value = serde_json::to_value(&frame).expect("serialise frame");
        assert_eq!(value["type"], "notification");
        assert_eq!(value["notification"]["title"], "Success");
    }

    #[rstest]
    fn error_frames_carry_code_and_message() {
        let frame = ConsoleEvent::from(&Error::not_found("user ghost not found"));
        let value = serde_json::to_value(&frame).expect("serialise frame");
        assert_eq!(
            value,
            json!({ "type": "error", "code": "not_found", "message": "user ghost not found" })
        );
    }
}
