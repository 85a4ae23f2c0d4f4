//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST path of the console, the schemas they
//! reference and the session cookie security scheme. The document is served
//! by Swagger UI in debug builds and printed by the `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    BusinessUnit, ConsoleView, Error, ErrorCode, ManagerRole, NavLink, Notification, User,
    UserRole,
};
use crate::inbound::http::admin::{
    AssignManagerRequest, CreateBusinessUnitRequest, RemovedManagerRole, UpdateUserRequest,
};
use crate::inbound::http::users::LoginRequest;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Admin console API",
        description = "Session-authenticated management of users, business units and manager roles."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_session,
        crate::inbound::http::navigation::navigation,
        crate::inbound::http::admin::admin_page,
        crate::inbound::http::admin::console_view,
        crate::inbound::http::admin::update_user,
        crate::inbound::http::admin::assign_manager,
        crate::inbound::http::admin::remove_manager,
        crate::inbound::http::admin::create_business_unit,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        UserRole,
        BusinessUnit,
        ManagerRole,
        Notification,
        NavLink,
        ConsoleView,
        LoginRequest,
        UpdateUserRequest,
        AssignManagerRequest,
        CreateBusinessUnitRequest,
        RemovedManagerRole,
    )),
    tags(
        (name = "session", description = "Login, logout and navigation"),
        (name = "admin", description = "Admin console"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
