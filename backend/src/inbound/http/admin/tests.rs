//! Admin endpoint coverage against the in-memory directory.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{DirectoryError, DirectoryStore, MockDirectoryStore, NoOpNotifier};
use crate::domain::{
    BusinessUnitId, ConsoleActions, Email, SELECT_PAIR_MESSAGE, User, UserId, UserRole,
};
use crate::inbound::http::test_utils::{
    http_state, seeded_directory, session_cookie, test_session_middleware,
};
use crate::inbound::http::users::{LoginRequest, login};
use crate::outbound::memory::InMemoryDirectory;

const EMPLOYEE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn test_app(
    directory: Arc<InMemoryDirectory>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(http_state(directory)))
        .wrap(test_session_middleware())
        .service(admin_page)
        .service(
            web::scope("/api/v1")
                .service(login)
                .service(console_view)
                .service(update_user)
                .service(assign_manager)
                .service(remove_manager)
                .service(create_business_unit),
        )
}

async fn sign_in<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                username: username.into(),
                password: "password".into(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    session_cookie(&res)
}

#[rstest]
#[case(Some("employee"))]
#[case(None)]
#[actix_web::test]
async fn non_admins_are_redirected_from_the_page(#[case] username: Option<&str>) {
    let app = actix_test::init_service(test_app(seeded_directory())).await;
    let mut request = actix_test::TestRequest::get().uri("/admin");
    if let Some(name) = username {
        request = request.cookie(sign_in(&app, name).await);
    }
    let res = actix_test::call_service(&app, request.to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        res.headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("/dashboard")
    );
}

#[actix_web::test]
async fn admins_get_the_console_page() {
    let app = actix_test::init_service(test_app(seeded_directory())).await;
    let cookie = sign_in(&app, "admin").await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/admin")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["users"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["managerCandidates"][0]["label"], "Grace Hopper");
    assert_eq!(body["edit"]["phase"], "idle");
}

#[actix_web::test]
async fn console_api_requires_a_session() {
    let app = actix_test::init_service(test_app(seeded_directory())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/admin/console")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn console_api_forbids_employees() {
    let directory = seeded_directory();
    let app = actix_test::init_service(test_app(Arc::clone(&directory))).await;
    let cookie = sign_in(&app, "employee").await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/admin/business-units")
            .cookie(cookie)
            .set_json(json!({ "name": "Engineering" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(directory.business_units().is_empty());
}

#[rstest]
#[case(json!({ "name": "   " }))]
#[case(json!({}))]
#[actix_web::test]
async fn blank_business_unit_names_are_rejected(#[case] payload: Value) {
    let directory = seeded_directory();
    let app = actix_test::init_service(test_app(Arc::clone(&directory))).await;
    let cookie = sign_in(&app, "admin").await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/admin/business-units")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["title"], "Error");
    assert_eq!(body["message"], "Business unit name cannot be empty.");
    assert!(directory.business_units().is_empty());
}

#[actix_web::test]
async fn creating_a_business_unit_trims_the_name() {
    let directory = seeded_directory();
    let app = actix_test::init_service(test_app(Arc::clone(&directory))).await;
    let cookie = sign_in(&app, "admin").await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/admin/business-units")
            .cookie(cookie)
            .set_json(json!({ "name": "  Engineering " }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["notice"]["title"], "Success");
    assert_eq!(body["notice"]["description"], "Business unit created.");
    assert_eq!(body["data"]["name"], "Engineering");
    assert_eq!(directory.business_units().len(), 1);
}

#[actix_web::test]
async fn directory_outage_uses_the_action_title() {
    let directory = seeded_directory();
    directory.set_available(false);
    let app = actix_test::init_service(test_app(Arc::clone(&directory))).await;
    let cookie = sign_in(&app, "admin").await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/admin/business-units")
            .cookie(cookie)
            .set_json(json!({ "name": "Engineering" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["title"], "Error creating business unit");
}

#[rstest]
#[case(json!({ "businessUnitId": "eng" }))]
#[case(json!({ "userId": "grace", "businessUnitId": "  " }))]
#[actix_web::test]
async fn assigning_without_a_pair_is_rejected(#[case] payload: Value) {
    let directory = seeded_directory();
    let app = actix_test::init_service(test_app(Arc::clone(&directory))).await;
    let cookie = sign_in(&app, "admin").await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/admin/manager-roles")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], SELECT_PAIR_MESSAGE);
    assert!(directory.manager_roles().is_empty());
}

#[actix_web::test]
async fn assign_is_idempotent_and_remove_deletes_the_role() {
    let directory = seeded_directory();
    let app = actix_test::init_service(test_app(Arc::clone(&directory))).await;
    let cookie = sign_in(&app, "admin").await;

    for _ in 0..2 {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/admin/manager-roles")
                .cookie(cookie.clone())
                .set_json(json!({ "userId": "grace", "businessUnitId": "eng" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["data"]["id"], "eng_grace");
        assert_eq!(body["notice"]["description"], "Manager assigned successfully.");
    }
    assert_eq!(directory.manager_roles().len(), 1);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/admin/manager-roles/eng_grace")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["data"]["id"], "eng_grace");
    assert_eq!(body["notice"]["description"], "Manager role removed.");
    assert!(directory.manager_roles().is_empty());
}

#[actix_web::test]
async fn updating_a_user_changes_role_and_unit() {
    let directory = seeded_directory();
    let app = actix_test::init_service(test_app(Arc::clone(&directory))).await;
    let cookie = sign_in(&app, "admin").await;

    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/admin/business-units")
            .cookie(cookie.clone())
            .set_json(json!({ "name": "Engineering" }))
            .to_request(),
    )
    .await;
    let created: Value = actix_test::read_body_json(created).await;
    let unit_id = created["data"]["id"].as_str().expect("unit id").to_owned();

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/admin/users/{EMPLOYEE_ID}"))
            .cookie(cookie.clone())
            .set_json(json!({ "role": "manager", "businessUnitId": unit_id }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["notice"]["description"], "User updated successfully.");
    assert_eq!(body["data"]["role"], "manager");
    assert_eq!(body["data"]["businessUnitId"], unit_id.as_str());
    assert_eq!(body["data"]["email"], "employee@example.com");

    let view = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/admin/console")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let view: Value = actix_test::read_body_json(view).await;
    let row = view["users"]
        .as_array()
        .and_then(|rows| rows.iter().find(|row| row["id"] == EMPLOYEE_ID))
        .expect("employee row");
    assert_eq!(row["businessUnitName"], "Engineering");
}

#[rstest]
#[case("nobody", json!({ "role": "admin" }), StatusCode::NOT_FOUND, "Error updating user")]
#[case(EMPLOYEE_ID, json!({ "role": "admin", "businessUnitId": "missing" }), StatusCode::BAD_REQUEST, "Error")]
#[actix_web::test]
async fn invalid_updates_are_reported(
    #[case] user_id: &str,
    #[case] payload: Value,
    #[case] status: StatusCode,
    #[case] title: &str,
) {
    let app = actix_test::init_service(test_app(seeded_directory())).await;
    let cookie = sign_in(&app, "admin").await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/admin/users/{user_id}"))
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), status);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["title"], title);
}

#[actix_web::test]
async fn failed_writes_keep_the_underlying_message() {
    let mut store = MockDirectoryStore::new();
    store
        .expect_add_business_unit()
        .times(1)
        .returning(|_| Err(DirectoryError::query("quota exceeded")));
    let actions = ConsoleActions::new(Arc::new(store), Arc::new(NoOpNotifier));
    let result = actions.create_business_unit("Engineering").await;
    let Err(error) = settle(ConsoleAction::CreateBusinessUnit, StatusCode::CREATED, result) else {
        panic!("write should fail");
    };
    let response = actix_web::ResponseError::error_response(&error);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = actix_web::body::to_bytes(response.into_body())
        .await
        .expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(body["message"], "Internal server error");
    assert_eq!(body["details"]["title"], "Error creating business unit");
    assert_eq!(body["details"]["description"], "quota exceeded");
}

#[actix_web::test]
async fn role_only_edit_keeps_a_dangling_business_unit() {
    let directory = seeded_directory();
    let stale = User::new(
        UserId::new("stale").expect("user id"),
        Email::new("stale@example.com").expect("email"),
        UserRole::Employee,
    )
    .with_business_unit(BusinessUnitId::new("gone").expect("unit id"));
    directory.put_user(&stale).await.expect("seed user");
    let app = actix_test::init_service(test_app(Arc::clone(&directory))).await;
    let cookie = sign_in(&app, "admin").await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/admin/users/stale")
            .cookie(cookie)
            .set_json(json!({ "role": "manager", "businessUnitId": "gone" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let stored = directory
        .users()
        .into_iter()
        .find(|user| user.id().as_ref() == "stale")
        .expect("stored user");
    assert_eq!(stored.role(), UserRole::Manager);
    assert_eq!(stored.business_unit_id().map(AsRef::as_ref), Some("gone"));
}
