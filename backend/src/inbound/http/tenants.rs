//! Tenancy handlers.
//!
//! ```text
//! GET  /api/v1/properties/{id}/tenants
//! POST /api/v1/tenants                      register and assign to a room
//! POST /api/v1/occupancies/{id}/move-out
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, NewTenant, PropertyId, RoomId, RoomTenantId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::cache_control::private_json;
use crate::inbound::http::dto::{OccupancyBody, TenancyBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_date, parse_id};

/// Request body for `POST /api/v1/tenants`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTenantRequest {
    pub full_name: String,
    /// Rwandan mobile number in local or `+250` form.
    #[schema(example = "0788 123 456")]
    pub phone: String,
    pub email: Option<String>,
    pub id_number: Option<String>,
    pub room_id: Option<String>,
    /// `YYYY-MM-DD`
    pub move_in_date: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutRequest {
    /// `YYYY-MM-DD`; not before the move-in date.
    pub move_out_date: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}/tenants",
    params(("id" = String, Path, description = "Property id")),
    responses(
        (status = 200, description = "Active tenancies", body = [TenancyBody]),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["tenancy"],
    operation_id = "listTenants"
)]
#[get("/properties/{id}/tenants")]
pub async fn list_tenants(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let property_id: PropertyId = parse_id(&path, FieldName::new("id"))?;
    let tenancies = state.tenancy.list_tenants(&caller, property_id).await?;
    Ok(private_json(
        tenancies
            .into_iter()
            .map(TenancyBody::from)
            .collect::<Vec<_>>(),
    ))
}

/// Register a tenant and move them into an available room.
#[utoipa::path(
    post,
    path = "/api/v1/tenants",
    request_body = RegisterTenantRequest,
    responses(
        (status = 201, description = "Tenant registered", body = TenancyBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Room not found", body = Error),
        (status = 409, description = "Room is not available", body = Error)
    ),
    tags = ["tenancy"],
    operation_id = "registerTenant"
)]
#[post("/tenants")]
pub async fn register_tenant(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<RegisterTenantRequest>,
) -> ApiResult<HttpResponse> {
    const ROOM_ID: FieldName = FieldName::new("roomId");
    const MOVE_IN_DATE: FieldName = FieldName::new("moveInDate");

    let RegisterTenantRequest {
        full_name,
        phone,
        email,
        id_number,
        room_id,
        move_in_date,
    } = payload.into_inner();
    let room_id: RoomId = parse_id(
        room_id.as_deref().ok_or_else(|| missing_field_error(ROOM_ID))?,
        ROOM_ID,
    )?;
    let move_in_date = parse_date(
        move_in_date
            .as_deref()
            .ok_or_else(|| missing_field_error(MOVE_IN_DATE))?,
        MOVE_IN_DATE,
    )?;
    let tenant = NewTenant {
        full_name,
        phone,
        email,
        id_number,
    };
    let details = state
        .tenancy
        .register_tenant(&caller, tenant, room_id, move_in_date)
        .await?;
    Ok(HttpResponse::Created().json(TenancyBody::from(details)))
}

/// End an occupancy and free the room.
#[utoipa::path(
    post,
    path = "/api/v1/occupancies/{id}/move-out",
    params(("id" = String, Path, description = "Occupancy id")),
    request_body = MoveOutRequest,
    responses(
        (status = 200, description = "Occupancy closed", body = OccupancyBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Already moved out", body = Error)
    ),
    tags = ["tenancy"],
    operation_id = "moveOut"
)]
#[post("/occupancies/{id}/move-out")]
pub async fn move_out(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<MoveOutRequest>,
) -> ApiResult<HttpResponse> {
    const MOVE_OUT_DATE: FieldName = FieldName::new("moveOutDate");

    let occupancy_id: RoomTenantId = parse_id(&path, FieldName::new("id"))?;
    let raw = payload
        .into_inner()
        .move_out_date
        .ok_or_else(|| missing_field_error(MOVE_OUT_DATE))?;
    let move_out_date = parse_date(&raw, MOVE_OUT_DATE)?;
    let occupancy = state
        .tenancy
        .move_out(&caller, occupancy_id, move_out_date)
        .await?;
    Ok(private_json(OccupancyBody::from(occupancy)))
}
