//! Property and room handlers.
//!
//! ```text
//! GET   /api/v1/properties
//! POST  /api/v1/properties
//! GET   /api/v1/properties/{id}
//! PATCH /api/v1/properties/{id}
//! POST  /api/v1/properties/{id}/images?file_name=front.jpg   (raw body)
//! GET   /api/v1/properties/{id}/rooms
//! POST  /api/v1/properties/{id}/rooms
//! PATCH /api/v1/rooms/{id}/status
//! ```

use actix_web::http::header::CONTENT_TYPE;
use actix_web::web::Bytes;
use actix_web::{HttpRequest, HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Error, ImageUpload, NewProperty, NewRoom, ParseRoomStatusError, PropertyId, PropertyPatch,
    RoomId, RoomStatus, Rwf,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::cache_control::private_json;
use crate::inbound::http::dto::{PropertyBody, RoomBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_id};

const ID: FieldName = FieldName::new("id");

/// Request body for `POST /api/v1/properties`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyRequest {
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    /// Defaults to `apartment`.
    pub property_type: Option<String>,
    #[schema(example = 50_000)]
    pub price_range_min: i64,
    #[schema(example = 80_000)]
    pub price_range_max: i64,
}

impl From<CreatePropertyRequest> for NewProperty {
    fn from(value: CreatePropertyRequest) -> Self {
        Self {
            name: value.name,
            address: value.address,
            description: value.description,
            property_type: value.property_type.unwrap_or_default(),
            price_range_min: Rwf::new(value.price_range_min),
            price_range_max: Rwf::new(value.price_range_max),
        }
    }
}

/// Request body for `PATCH /api/v1/properties/{id}`. Absent fields are kept.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    /// An empty string clears the description.
    pub description: Option<String>,
    pub property_type: Option<String>,
    pub price_range_min: Option<i64>,
    pub price_range_max: Option<i64>,
}

impl From<UpdatePropertyRequest> for PropertyPatch {
    fn from(value: UpdatePropertyRequest) -> Self {
        Self {
            name: value.name,
            address: value.address,
            description: value.description,
            property_type: value.property_type,
            price_range_min: value.price_range_min.map(Rwf::new),
            price_range_max: value.price_range_max.map(Rwf::new),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_number: String,
    #[schema(example = 80_000)]
    pub rent_amount: i64,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomStatusRequest {
    /// `available`, `occupied`, or `maintenance`.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImageQuery {
    /// Original file name; sanitised before it becomes part of the object path.
    pub file_name: Option<String>,
}

/// Active properties visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/properties",
    responses(
        (status = 200, description = "Properties", body = [PropertyBody]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Tenants cannot manage properties", body = Error)
    ),
    tags = ["properties"],
    operation_id = "listProperties"
)]
#[get("/properties")]
pub async fn list_properties(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let properties = state.properties.list_properties(&caller).await?;
    Ok(private_json(
        properties
            .into_iter()
            .map(PropertyBody::from)
            .collect::<Vec<_>>(),
    ))
}

/// Create a property owned by the calling landlord.
#[utoipa::path(
    post,
    path = "/api/v1/properties",
    request_body = CreatePropertyRequest,
    responses(
        (status = 201, description = "Property created", body = PropertyBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Only landlords and admins create properties", body = Error)
    ),
    tags = ["properties"],
    operation_id = "createProperty"
)]
#[post("/properties")]
pub async fn create_property(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CreatePropertyRequest>,
) -> ApiResult<HttpResponse> {
    let property = state
        .properties
        .create_property(&caller, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(PropertyBody::from(property)))
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}",
    params(("id" = String, Path, description = "Property id")),
    responses(
        (status = 200, description = "Property", body = PropertyBody),
        (status = 400, description = "Invalid id", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["properties"],
    operation_id = "getProperty"
)]
#[get("/properties/{id}")]
pub async fn get_property(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: PropertyId = parse_id(&path, ID)?;
    let property = state.properties.get_property(&caller, id).await?;
    Ok(private_json(PropertyBody::from(property)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/properties/{id}",
    params(("id" = String, Path, description = "Property id")),
    request_body = UpdatePropertyRequest,
    responses(
        (status = 200, description = "Updated property", body = PropertyBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["properties"],
    operation_id = "updateProperty"
)]
#[patch("/properties/{id}")]
pub async fn update_property(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<UpdatePropertyRequest>,
) -> ApiResult<HttpResponse> {
    let id: PropertyId = parse_id(&path, ID)?;
    let property = state
        .properties
        .update_property(&caller, id, payload.into_inner().into())
        .await?;
    Ok(private_json(PropertyBody::from(property)))
}

/// Upload one photo. The body is the raw image; `Content-Type` must be JPEG,
/// PNG, or WebP and the size at most 5 MiB.
#[utoipa::path(
    post,
    path = "/api/v1/properties/{id}/images",
    params(("id" = String, Path, description = "Property id"), ImageQuery),
    request_body(content = Vec<u8>, content_type = "image/jpeg"),
    responses(
        (status = 200, description = "Property with the new image URL", body = PropertyBody),
        (status = 400, description = "Unsupported type or size", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["properties"],
    operation_id = "uploadPropertyImage"
)]
#[post("/properties/{id}/images")]
pub async fn upload_property_image(
    state: web::Data<HttpState>,
    caller: Authenticated,
    request: HttpRequest,
    path: web::Path<String>,
    query: web::Query<ImageQuery>,
    body: Bytes,
) -> ApiResult<HttpResponse> {
    let id: PropertyId = parse_id(&path, ID)?;
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(';').next().unwrap_or(value).trim().to_owned())
        .ok_or_else(|| missing_field_error(FieldName::new("Content-Type")))?;
    let upload = ImageUpload {
        file_name: query
            .into_inner()
            .file_name
            .unwrap_or_else(|| "image".to_owned()),
        content_type,
        bytes: body.to_vec(),
    };
    let property = state
        .properties
        .upload_property_image(&caller, id, upload)
        .await?;
    Ok(private_json(PropertyBody::from(property)))
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}/rooms",
    params(("id" = String, Path, description = "Property id")),
    responses(
        (status = 200, description = "Rooms ordered by number", body = [RoomBody]),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["properties"],
    operation_id = "listRooms"
)]
#[get("/properties/{id}/rooms")]
pub async fn list_rooms(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: PropertyId = parse_id(&path, ID)?;
    let rooms = state.properties.list_rooms(&caller, id).await?;
    Ok(private_json(rooms.into_iter().map(RoomBody::from).collect::<Vec<_>>()))
}

#[utoipa::path(
    post,
    path = "/api/v1/properties/{id}/rooms",
    params(("id" = String, Path, description = "Property id")),
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created", body = RoomBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["properties"],
    operation_id = "createRoom"
)]
#[post("/properties/{id}/rooms")]
pub async fn create_room(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<CreateRoomRequest>,
) -> ApiResult<HttpResponse> {
    let property_id: PropertyId = parse_id(&path, ID)?;
    let CreateRoomRequest {
        room_number,
        rent_amount,
    } = payload.into_inner();
    let room = state
        .properties
        .create_room(
            &caller,
            NewRoom {
                property_id,
                room_number,
                rent_amount: Rwf::new(rent_amount),
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(RoomBody::from(room)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/rooms/{id}/status",
    params(("id" = String, Path, description = "Room id")),
    request_body = RoomStatusRequest,
    responses(
        (status = 200, description = "Updated room", body = RoomBody),
        (status = 400, description = "Invalid status", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["properties"],
    operation_id = "updateRoomStatus"
)]
#[patch("/rooms/{id}/status")]
pub async fn update_room_status(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<RoomStatusRequest>,
) -> ApiResult<HttpResponse> {
    const STATUS: FieldName = FieldName::new("status");

    let room_id: RoomId = parse_id(&path, ID)?;
    let raw = payload
        .into_inner()
        .status
        .ok_or_else(|| missing_field_error(STATUS))?;
    let status: RoomStatus = raw.parse().map_err(|err: ParseRoomStatusError| {
        Error::invalid_request(err.to_string()).with_details(serde_json::json!({
            "field": "status",
            "value": raw,
            "code": "invalid_status",
        }))
    })?;
    let room = state
        .properties
        .update_room_status(&caller, room_id, status)
        .await?;
    Ok(private_json(RoomBody::from(room)))
}

#[cfg(test)]
mod tests;
