//! Dashboard navigation for the signed-in user.

use actix_web::{get, web};
use serde::Deserialize;

use crate::domain::{Error, NavLink, navigation_links};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_user;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct NavigationQuery {
    /// Path of the page being rendered; its link is marked active.
    #[serde(default)]
    pub path: String,
}

/// Navigation links; the admin link is only offered to administrators.
#[utoipa::path(
    get,
    path = "/api/v1/navigation",
    params(NavigationQuery),
    responses(
        (status = 200, description = "Navigation links", body = [NavLink]),
        (status = 401, description = "No session", body = Error)
    ),
    tags = ["session"],
    operation_id = "navigation"
)]
#[get("/navigation")]
pub async fn navigation(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<NavigationQuery>,
) -> ApiResult<web::Json<Vec<NavLink>>> {
    let user = require_user(&state, &session).await?;
    Ok(web::Json(navigation_links(&user, &query.path)))
}
