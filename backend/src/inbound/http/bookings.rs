//! Booking handlers.
//!
//! ```text
//! GET  /api/v1/bookings
//! POST /api/v1/bookings
//! POST /api/v1/bookings/{id}/review   {"decision":"approve"}
//! POST /api/v1/bookings/{id}/cancel
//! ```
//!
//! Submission tries the `create_tenant_booking` RPC first and falls back to a
//! direct insert only when the backend reports the function as missing; the
//! response says which path created the row.

use actix_web::{HttpResponse, get, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BookingDecision, BookingId, BookingRequest, Error, PropertyId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::cache_control::private_json;
use crate::inbound::http::dto::{BookingBody, BookingCreatedBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_date, parse_id, parse_optional_id,
};

/// Request body for `POST /api/v1/bookings`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBookingRequest {
    pub property_id: Option<String>,
    pub room_id: Option<String>,
    pub full_name: String,
    #[schema(example = "+250788123456")]
    pub phone: String,
    pub email: Option<String>,
    pub message: Option<String>,
    /// `YYYY-MM-DD`; today or later.
    pub preferred_move_in: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewBookingRequest {
    #[schema(value_type = String, example = "approve")]
    pub decision: BookingDecision,
}

const ID: FieldName = FieldName::new("id");

fn parse_booking_request(request: SubmitBookingRequest) -> Result<BookingRequest, Error> {
    const PROPERTY_ID: FieldName = FieldName::new("propertyId");
    const ROOM_ID: FieldName = FieldName::new("roomId");
    const PREFERRED_MOVE_IN: FieldName = FieldName::new("preferredMoveIn");

    let property_id: PropertyId = parse_id(
        request
            .property_id
            .as_deref()
            .ok_or_else(|| missing_field_error(PROPERTY_ID))?,
        PROPERTY_ID,
    )?;
    let preferred_move_in: Option<NaiveDate> = request
        .preferred_move_in
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_date(raw, PREFERRED_MOVE_IN))
        .transpose()?;
    Ok(BookingRequest {
        property_id,
        room_id: parse_optional_id(request.room_id.as_deref(), ROOM_ID)?,
        full_name: request.full_name,
        phone: request.phone,
        email: request.email,
        message: request.message,
        preferred_move_in,
    })
}

/// Bookings the caller may see: their own for tenants, their properties'
/// for landlords and managers, everything for admins.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    responses(
        (status = 200, description = "Bookings, newest first", body = [BookingBody]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "listBookings"
)]
#[get("/bookings")]
pub async fn list_bookings(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let bookings = state.bookings.list_bookings(&caller).await?;
    Ok(private_json(
        bookings
            .into_iter()
            .map(BookingBody::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = SubmitBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingCreatedBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Only tenants submit bookings", body = Error),
        (status = 404, description = "Property not found", body = Error),
        (status = 409, description = "Backend rejected the booking", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "submitBooking"
)]
#[post("/bookings")]
pub async fn submit_booking(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<SubmitBookingRequest>,
) -> ApiResult<HttpResponse> {
    let request = parse_booking_request(payload.into_inner())?;
    let outcome = state.bookings.submit_booking(&caller, request).await?;
    Ok(HttpResponse::Created().json(BookingCreatedBody::from(outcome)))
}

/// Approve or reject a pending booking.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/review",
    params(("id" = String, Path, description = "Booking id")),
    request_body = ReviewBookingRequest,
    responses(
        (status = 200, description = "Updated booking", body = BookingBody),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Booking is not pending", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "reviewBooking"
)]
#[post("/bookings/{id}/review")]
pub async fn review_booking(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<ReviewBookingRequest>,
) -> ApiResult<HttpResponse> {
    let id: BookingId = parse_id(&path, ID)?;
    let booking = state
        .bookings
        .review_booking(&caller, id, payload.decision)
        .await?;
    Ok(private_json(BookingBody::from(booking)))
}

/// Withdraw one of the caller's pending bookings.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/cancel",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Cancelled booking", body = BookingBody),
        (status = 403, description = "Not the requesting tenant", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Booking is not pending", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "cancelBooking"
)]
#[post("/bookings/{id}/cancel")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: BookingId = parse_id(&path, ID)?;
    let booking = state.bookings.cancel_booking(&caller, id).await?;
    Ok(private_json(BookingBody::from(booking)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;

    fn request() -> SubmitBookingRequest {
        SubmitBookingRequest {
            property_id: Some("6f9619ff-8b86-d011-b42d-00c04fc964ff".to_owned()),
            room_id: Some(String::new()),
            full_name: "Aline".to_owned(),
            phone: "0788123456".to_owned(),
            email: None,
            message: None,
            preferred_move_in: Some("2024-07-01".to_owned()),
        }
    }

    #[test]
    fn parses_a_complete_request() {
        let parsed = parse_booking_request(request()).expect("valid");
        assert!(parsed.room_id.is_none());
        assert_eq!(
            parsed.preferred_move_in,
            NaiveDate::from_ymd_opt(2024, 7, 1)
        );
    }

    #[test]
    fn property_id_is_required() {
        let mut body = request();
        body.property_id = None;
        let err = parse_booking_request(body).expect_err("missing");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().expect("details")["field"], "propertyId");
    }
}
