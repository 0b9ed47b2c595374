//! Shared helpers for driving the HTTP API over the in-memory backend.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, HeaderValue};
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use chrono::NaiveDate;
use serde_json::Value;

use icumbi::Trace;
use icumbi::domain::Caller;
use icumbi::inbound::http::configure;
use icumbi::inbound::http::state::HttpState;
use icumbi::test_support::InMemoryBackend;

/// Saturday 15 June 2024, after the default due day.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date")
}

pub fn backend() -> Arc<InMemoryBackend> {
    InMemoryBackend::new(today())
}

pub async fn init_app(
    backend: &Arc<InMemoryBackend>,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(HttpState::new(backend.ports())))
            .wrap(Trace)
            .configure(configure),
    )
    .await
}

pub fn authorised(request: TestRequest, caller: &Caller) -> TestRequest {
    let value = HeaderValue::from_str(&format!("Bearer {}", caller.token.expose()))
        .expect("token is a valid header value");
    request.insert_header((AUTHORIZATION, value))
}

/// Send a request and return the status with the JSON body (`Null` when empty).
pub async fn send<S>(app: &S, request: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = test::call_service(app, request).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is JSON")
    };
    (status, body)
}
