//! Property manager handlers.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Language, PropertyId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::cache_control::private_json;
use crate::inbound::http::dto::ManagerBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Request body for inviting a manager.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteManagerRequest {
    #[schema(example = "manager@example.rw")]
    pub email: String,
    /// `en` or `rw`; anything else sends the English template.
    pub language: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}/managers",
    params(("id" = String, Path, description = "Property id")),
    responses(
        (status = 200, description = "Managers and pending invitations", body = [ManagerBody]),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["managers"],
    operation_id = "listManagers"
)]
#[get("/properties/{id}/managers")]
pub async fn list_managers(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let property_id: PropertyId = parse_id(&path, FieldName::new("id"))?;
    let managers = state
        .invitations
        .list_managers(&caller, property_id)
        .await?;
    Ok(private_json(
        managers
            .into_iter()
            .map(ManagerBody::from)
            .collect::<Vec<_>>(),
    ))
}

/// Send an invitation email and record the pending manager.
#[utoipa::path(
    post,
    path = "/api/v1/properties/{id}/managers/invitations",
    params(("id" = String, Path, description = "Property id")),
    request_body = InviteManagerRequest,
    responses(
        (status = 201, description = "Invitation sent", body = ManagerBody),
        (status = 400, description = "Invalid email", body = Error),
        (status = 403, description = "Only the owning landlord may invite", body = Error),
        (status = 404, description = "Property not found", body = Error),
        (status = 409, description = "Already invited", body = Error),
        (status = 503, description = "Invitation endpoint unavailable", body = Error)
    ),
    tags = ["managers"],
    operation_id = "inviteManager"
)]
#[post("/properties/{id}/managers/invitations")]
pub async fn invite_manager(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<InviteManagerRequest>,
) -> ApiResult<HttpResponse> {
    let property_id: PropertyId = parse_id(&path, FieldName::new("id"))?;
    let InviteManagerRequest { email, language } = payload.into_inner();
    let language = Language::from_code_lenient(language.as_deref());
    let manager = state
        .invitations
        .invite_manager(&caller, property_id, &email, language)
        .await?;
    Ok(HttpResponse::Created().json(ManagerBody::from(manager)))
}
