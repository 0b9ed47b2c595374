//! The unauthenticated `send-reset-pin-email` function endpoint.

#[path = "support/api.rs"]
mod api;

use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use rstest::rstest;
use serde_json::{Value, json};

use icumbi::domain::ports::MailerError;

use api::{backend, init_app, send};

const ENDPOINT: &str = "/functions/v1/send-reset-pin-email";

#[actix_rt::test]
async fn valid_requests_send_one_email() {
    let backend = backend();
    let app = init_app(&backend).await;

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri(ENDPOINT)
            .set_json(json!({
                "email": "Aline@Example.rw",
                "pin": "4821",
                "fullName": "Aline Uwase",
                "language": "en",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body, json!({ "success": true, "message": "Reset PIN email sent successfully" }));

    let emails = backend.sent_emails();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].to.as_str(), "aline@example.rw");
    assert!(emails[0].body.contains("4821"));
    assert!(emails[0].body.contains("Aline Uwase"));
}

#[rstest]
#[case(json!({ "email": "not-an-email", "pin": "4821", "fullName": "Aline" }))]
#[case(json!({ "email": "aline@example.rw", "pin": "12", "fullName": "Aline" }))]
#[case(json!({ "email": "aline@example.rw", "pin": "48a1", "fullName": "Aline" }))]
#[case(json!({ "email": "aline@example.rw", "pin": "4821", "fullName": "  " }))]
#[case(json!({}))]
#[actix_rt::test]
async fn invalid_requests_are_rejected_without_sending(#[case] payload: Value) {
    let backend = backend();
    let app = init_app(&backend).await;

    let (status, body) = send(
        &app,
        TestRequest::post().uri(ENDPOINT).set_json(payload).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(backend.sent_emails().is_empty());
}

#[actix_rt::test]
async fn malformed_json_still_gets_the_envelope() {
    let backend = backend();
    let app = init_app(&backend).await;

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri(ENDPOINT)
            .insert_header(header::ContentType::json())
            .set_payload("{not json")
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn mailer_failures_surface_as_server_errors() {
    let backend = backend();
    backend.fail_mail_with(Some(MailerError::delivery("connection refused")));
    let app = init_app(&backend).await;

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri(ENDPOINT)
            .set_json(json!({ "email": "aline@example.rw", "pin": "4821", "fullName": "Aline" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn preflight_advertises_cors_headers() {
    let backend = backend();
    let app = init_app(&backend).await;

    let response = test::call_service(
        &app,
        TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri(ENDPOINT)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let origin = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|value| value.to_str().ok());
    assert_eq!(origin, Some("*"));
}
