//! Tests for HTTP error mapping.

use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::json;

use super::*;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn body_of(response: HttpResponse) -> Error {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::invalid_credentials("nope"), StatusCode::UNAUTHORIZED)]
#[case(Error::unauthorized("no token"), StatusCode::UNAUTHORIZED)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), expected);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_the_trace_id() {
    let error = Error::internal("connection string leaked")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "secret": "x" }));

    let response = error.error_response();
    assert_eq!(
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(TRACE_ID)
    );
    let body = body_of(response).await;
    assert_eq!(body.message(), "Internal server error");
    assert_eq!(body.trace_id(), Some(TRACE_ID));
    assert!(body.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::conflict("meal already on the menu")
        .with_details(json!({ "mealId": "abc" }));

    let body = body_of(error.error_response()).await;
    assert_eq!(body.code(), ErrorCode::Conflict);
    assert_eq!(body.message(), "meal already on the menu");
    assert_eq!(body.details(), Some(&json!({ "mealId": "abc" })));
}

#[rstest]
fn unauthorized_responses_challenge_for_a_bearer_token() {
    let response = Error::unauthorized("missing bearer token").error_response();
    assert_eq!(
        response
            .headers()
            .get("WWW-Authenticate")
            .and_then(|value| value.to_str().ok()),
        Some("Bearer")
    );
    let login = Error::invalid_credentials("invalid username or password").error_response();
    assert!(login.headers().get("WWW-Authenticate").is_none());
}

#[rstest]
#[actix_web::test]
async fn malformed_json_bodies_become_invalid_requests() {
    let req = TestRequest::default().to_http_request();
    let error = json_error_handler(JsonPayloadError::ContentType, &req);
    let response = error.error_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_of(response).await;
    assert_eq!(body.code(), ErrorCode::InvalidRequest);
}
