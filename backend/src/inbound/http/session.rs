//! Session endpoints.
//!
//! ```text
//! GET  /api/v1/me
//! POST /api/v1/auth/sign-out
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::cache_control::private_json;
use crate::inbound::http::dto::UserBody;
use crate::inbound::http::state::HttpState;

/// Return the user behind the bearer token, with their resolved role.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Signed-in user", body = UserBody),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 503, description = "Auth service unavailable", body = Error)
    ),
    tags = ["session"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(caller: Authenticated) -> ApiResult<HttpResponse> {
    let body = UserBody::from(caller.into_inner().user);
    Ok(private_json(body))
}

/// Revoke the caller's session with the auth service.
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-out",
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 503, description = "Auth service unavailable", body = Error)
    ),
    tags = ["session"],
    operation_id = "signOut"
)]
#[post("/auth/sign-out")]
pub async fn sign_out(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    state.auth.sign_out(&caller).await?;
    Ok(HttpResponse::NoContent().finish())
}
