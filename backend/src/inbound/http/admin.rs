//! Admin console endpoints.
//!
//! ```text
//! GET    /admin                              gated page route
//! GET    /api/v1/admin/console               console view
//! PUT    /api/v1/admin/users/{id}            save role and business unit
//! POST   /api/v1/admin/manager-roles         assign a manager
//! DELETE /api/v1/admin/manager-roles/{id}    remove a manager role
//! POST   /api/v1/admin/business-units        create a business unit
//! ```
//!
//! Every mutation answers with the notification it raised. Failures use the
//! error envelope with the notification in `details.title` and
//! `details.description`, which keeps the underlying write error visible even
//! when the message itself is redacted.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    BusinessUnit, BusinessUnitId, ConsoleAction, ConsoleView, Error, GateDecision, ManagerRole,
    ManagerRoleId, Notification, User, UserEditor, UserId, UserRole,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{require_admin, session_state};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Successful mutation payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse<T> {
    pub notice: Notification,
    pub data: T,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub role: UserRole,
    /// Business unit to assign; omit, `null` or `""` for none.
    #[serde(default)]
    pub business_unit_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignManagerRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub business_unit_id: String,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessUnitRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemovedManagerRole {
    pub id: String,
}

fn settle<T: Serialize>(
    action: ConsoleAction,
    status: StatusCode,
    result: Result<T, Error>,
) -> ApiResult<HttpResponse> {
    match result {
        Ok(data) => Ok(HttpResponse::build(status).json(ActionResponse {
            notice: action.succeeded(),
            data,
        })),
        Err(error) => {
            let notice = action.failed(&error);
            Err(error.with_details(json!({
                "title": notice.title,
                "description": notice.description,
            })))
        }
    }
}

/// Gated console page.
///
/// Administrators get the console view; everyone else is sent to the
/// dashboard with `303 See Other`.
#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "Console view", body = ConsoleView),
        (status = 303, description = "Not an administrator", headers(("Location" = String)))
    ),
    tags = ["admin"],
    operation_id = "adminPage"
)]
#[get("/admin")]
pub async fn admin_page(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let session_state = session_state(&state, &session).await?;
    match state.gate.evaluate(&session_state) {
        GateDecision::Render => Ok(HttpResponse::Ok().json(state.console.snapshot_view())),
        GateDecision::Redirect(route) => Ok(HttpResponse::SeeOther()
            .insert_header((header::LOCATION, route))
            .finish()),
        GateDecision::Pending => Ok(HttpResponse::SeeOther()
            .insert_header((header::LOCATION, state.gate.redirect_route().to_owned()))
            .finish()),
    }
}

/// Current console view.
#[utoipa::path(
    get,
    path = "/api/v1/admin/console",
    responses(
        (status = 200, description = "Console view", body = ConsoleView),
        (status = 401, description = "No session", body = Error),
        (status = 403, description = "Not an administrator", body = Error)
    ),
    tags = ["admin"],
    operation_id = "consoleView"
)]
#[get("/admin/console")]
pub async fn console_view(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ConsoleView>> {
    require_admin(&state, &session).await?;
    Ok(web::Json(state.console.snapshot_view()))
}

async fn build_assignment(
    state: &HttpState,
    raw_id: &str,
    request: UpdateUserRequest,
) -> Result<UserEditor, Error> {
    let user_id = UserId::new(raw_id).map_err(|err| Error::invalid_request(err.to_string()))?;
    let directory = state.console.directory();
    let target = directory
        .get_user(&user_id)
        .await?
        .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))?;
    let mut editor = UserEditor::new(target, directory.subscribe_business_units().snapshot());
    editor.select_role(request.role);
    match request.business_unit_id.filter(|id| !id.trim().is_empty()) {
        Some(raw) => {
            let id = BusinessUnitId::new(raw.trim())
                .map_err(|err| Error::invalid_request(err.to_string()))?;
            editor.select_business_unit(&id)?;
        }
        None => editor.clear_business_unit(),
    }
    Ok(editor)
}

/// Save a user's role and business unit.
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ActionResponse<User>),
        (status = 400, description = "Invalid selection", body = Error),
        (status = 403, description = "Not an administrator", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["admin"],
    operation_id = "updateUser"
)]
#[put("/admin/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let result = match build_assignment(&state, &path, payload.into_inner()).await {
        Ok(editor) => state.console.save_user(&editor.submission()).await,
        Err(error) => state.console.reject(ConsoleAction::UpdateUser, error),
    };
    settle(ConsoleAction::UpdateUser, StatusCode::OK, result)
}

/// Make a user the manager of a business unit.
#[utoipa::path(
    post,
    path = "/api/v1/admin/manager-roles",
    request_body = AssignManagerRequest,
    responses(
        (status = 200, description = "Manager assigned", body = ActionResponse<ManagerRole>),
        (status = 400, description = "User or business unit missing", body = Error),
        (status = 403, description = "Not an administrator", body = Error)
    ),
    tags = ["admin"],
    operation_id = "assignManager"
)]
#[post("/admin/manager-roles")]
pub async fn assign_manager(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AssignManagerRequest>,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let result = state
        .console
        .assign_manager(&payload.user_id, &payload.business_unit_id)
        .await;
    settle(ConsoleAction::AssignManager, StatusCode::OK, result)
}

/// Remove a manager role. Unknown ids succeed.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/manager-roles/{id}",
    params(("id" = String, Path, description = "Manager role id")),
    responses(
        (status = 200, description = "Manager role removed", body = ActionResponse<RemovedManagerRole>),
        (status = 403, description = "Not an administrator", body = Error)
    ),
    tags = ["admin"],
    operation_id = "removeManager"
)]
#[delete("/admin/manager-roles/{id}")]
pub async fn remove_manager(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let result = match ManagerRoleId::new(path.into_inner()) {
        Ok(id) => state
            .console
            .remove_manager(&id)
            .await
            .map(|()| RemovedManagerRole { id: id.into() }),
        Err(err) => state.console.reject(
            ConsoleAction::RemoveManager,
            Error::invalid_request(err.to_string()),
        ),
    };
    settle(ConsoleAction::RemoveManager, StatusCode::OK, result)
}

/// Create a business unit.
#[utoipa::path(
    post,
    path = "/api/v1/admin/business-units",
    request_body = CreateBusinessUnitRequest,
    responses(
        (status = 201, description = "Business unit created", body = ActionResponse<BusinessUnit>),
        (status = 400, description = "Blank name", body = Error),
        (status = 403, description = "Not an administrator", body = Error)
    ),
    tags = ["admin"],
    operation_id = "createBusinessUnit"
)]
#[post("/admin/business-units")]
pub async fn create_business_unit(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateBusinessUnitRequest>,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let result = state.console.create_business_unit(&payload.name).await;
    settle(ConsoleAction::CreateBusinessUnit, StatusCode::CREATED, result)
}

#[cfg(test)]
mod tests;
