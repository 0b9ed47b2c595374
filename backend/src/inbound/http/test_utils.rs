//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::{AUTHORIZATION, HeaderValue};
use actix_web::{App, test as actix_test, web};
use chrono::NaiveDate;

use crate::domain::Caller;
use crate::inbound::http::configure;
use crate::inbound::http::state::HttpState;
use crate::test_support::InMemoryBackend;

/// Date the in-memory clock is frozen at.
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap_or_default()
}

/// Empty in-memory backend frozen at [`test_today`].
pub fn backend() -> Arc<InMemoryBackend> {
    InMemoryBackend::new(test_today())
}

/// Initialise the full API surface over `backend`.
pub async fn api(
    backend: &Arc<InMemoryBackend>,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let state = web::Data::new(HttpState::new(backend.ports()));
    actix_test::init_service(App::new().app_data(state).configure(configure)).await
}

/// `Authorization` header value for a signed-in caller.
pub fn bearer(caller: &Caller) -> (actix_web::http::header::HeaderName, HeaderValue) {
    let value = format!("Bearer {}", caller.token.expose());
    (
        AUTHORIZATION,
        HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("Bearer x")),
    )
}
