//! HTTP error mapping coverage.

use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn body_of(error: &Error) -> Value {
    let response = ResponseError::error_response(error);
    let bytes = to_bytes(response.into_body()).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("admins only"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("offline"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_follows_code(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), expected);
}

#[rstest]
#[actix_web::test]
async fn trace_id_is_echoed_in_header_and_body() {
    let error = Error::forbidden("admins only").with_trace_id(TRACE_ID);
    let response = ResponseError::error_response(&error);
    assert_eq!(
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(TRACE_ID)
    );
    let body = body_of(&error).await;
    assert_eq!(body["traceId"], TRACE_ID);
    assert_eq!(body["code"], "forbidden");
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_the_notice() {
    let error = Error::internal("database password wrong")
        .with_trace_id(TRACE_ID)
        .with_details(json!({
            "title": "Error updating user",
            "description": "write rejected",
            "secret": "x"
        }));
    let body = body_of(&error).await;
    assert_eq!(body["message"], "Internal server error");
    assert_eq!(
        body["details"],
        json!({ "title": "Error updating user", "description": "write rejected" })
    );
    assert_eq!(body["traceId"], TRACE_ID);
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_details() {
    let error = Error::invalid_request("Business unit name cannot be empty.")
        .with_details(json!({ "title": "Error" }));
    let body = body_of(&error).await;
    assert_eq!(body["message"], "Business unit name cannot be empty.");
    assert_eq!(body["details"]["title"], "Error");
    assert!(body.get("traceId").is_none());
}

#[rstest]
#[actix_web::test]
async fn internal_errors_without_a_notice_drop_details() {
    let error = Error::internal("boom").with_details(json!({ "secret": "x" }));
    let body = body_of(&error).await;
    assert!(body.get("details").is_none());
}
