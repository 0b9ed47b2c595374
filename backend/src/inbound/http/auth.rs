//! Bearer-token authentication for HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! credential extraction and session resolution here. Handlers take an
//! [`Authenticated`] argument and receive a resolved [`Caller`].

use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Caller, Error};
use crate::inbound::http::state::HttpState;

/// Extractor yielding the caller behind the request's bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated(Caller);

impl Authenticated {
    /// Unwrap the resolved caller.
    pub fn into_inner(self) -> Caller {
        self.0
    }
}

impl Deref for Authenticated {
    type Target = Caller;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Token portion of an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. Any other scheme, or a header
/// that is not valid ASCII, counts as no token.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|token| !token.is_empty())
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req.headers()).map(str::to_owned);
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            state
                .auth
                .authenticate(token.as_deref())
                .await
                .map(Authenticated)
        })
    }
}
