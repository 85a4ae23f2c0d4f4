//! Domain primitives, console components and the ports they depend on.
//!
//! Purpose: keep the console rules (who may enter, what an edit submits, how
//! manager roles are keyed, which notification each action raises) free of
//! transport and storage concerns.
//!
//! Public surface:
//! - Entities: [`User`], [`BusinessUnit`], [`ManagerRole`] and their ids.
//! - Access control: [`AuthorizationGate`], [`SessionState`], [`GateDecision`].
//! - Console: [`ConsoleActions`], [`ManagementConsole`], [`ConsoleView`].
//! - [`Error`] and [`ErrorCode`], the transport-agnostic error payload.

pub mod assignor;
pub mod auth;
pub mod authorization;
pub mod business_unit;
pub mod console;
pub mod edit_flow;
pub mod error;
pub mod forms;
pub mod manager_role;
pub mod notification;
pub mod ports;
pub mod registrar;
pub mod roster;
pub mod trace_id;
pub mod user;
pub mod user_editor;

pub use self::assignor::{ManagerRoleAssignor, SELECT_PAIR_MESSAGE};
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::authorization::{
    AuthorizationGate, DirectorySessionProvider, GateDecision, NavLink, SessionState,
    navigation_links, resolve_session,
};
pub use self::business_unit::{
    BusinessUnit, BusinessUnitId, BusinessUnitName, BusinessUnitValidationError,
};
pub use self::console::{ConsoleActions, ManagementConsole};
pub use self::edit_flow::{EditFlow, EditFlowError, EditPhase};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::forms::{
    AssignmentForm, AssignmentFormView, FormError, FormPhase, RegistrationForm,
    RegistrationFormView,
};
pub use self::manager_role::{ManagerRole, ManagerRoleId, ManagerRoleValidationError};
pub use self::notification::{ConsoleAction, Notification, NotificationVariant};
pub use self::registrar::BusinessUnitRegistrar;
pub use self::roster::{
    ConsoleView, EditView, LoadingState, ManagerCandidate, ManagerRow, Roster, UserRow,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Email, User, UserAssignment, UserId, UserRole, UserValidationError};
pub use self::user_editor::{EditorView, UserEditor, UserEditorError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use admin_console::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
