//! Payment handlers.
//!
//! ```text
//! POST /api/v1/payments
//! GET  /api/v1/properties/{id}/payments?from=2024-06-01&to=2024-06-30
//! GET  /api/v1/properties/{id}/payment-status?month=2024-06
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    DateWindow, Error, Month, NewPayment, PaymentMethod, PropertyId, RoomTenantId, Rwf,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::cache_control::private_json;
use crate::inbound::http::dto::{PaymentBody, PaymentSummaryBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_date, parse_id, parse_month, parse_window,
};

/// Request body for `POST /api/v1/payments`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub room_tenant_id: Option<String>,
    #[schema(example = 80_000)]
    pub amount: i64,
    /// `YYYY-MM-DD`; not in the future.
    pub payment_date: Option<String>,
    #[schema(value_type = String, example = "mobile_money")]
    pub payment_method: PaymentMethod,
    pub reference: Option<String>,
}

/// Optional inclusive window; both bounds or neither.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WindowQuery {
    /// `YYYY-MM-DD`
    pub from: Option<String>,
    /// `YYYY-MM-DD`
    pub to: Option<String>,
}

impl WindowQuery {
    pub(crate) fn window(&self, today: NaiveDate) -> Result<DateWindow, Error> {
        parse_window(self.from.as_deref(), self.to.as_deref(), || {
            DateWindow::current_month(today)
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthQuery {
    /// `YYYY-MM`; defaults to the current month.
    pub month: Option<String>,
}

impl MonthQuery {
    pub(crate) fn month(&self, today: NaiveDate) -> Result<Month, Error> {
        match self.month.as_deref() {
            Some(raw) => parse_month(raw, FieldName::new("month")),
            None => Ok(Month::containing(today)),
        }
    }
}

/// Record a payment against an active occupancy.
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = PaymentBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Occupancy not found", body = Error)
    ),
    tags = ["payments"],
    operation_id = "recordPayment"
)]
#[post("/payments")]
pub async fn record_payment(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<RecordPaymentRequest>,
) -> ApiResult<HttpResponse> {
    const ROOM_TENANT_ID: FieldName = FieldName::new("roomTenantId");
    const PAYMENT_DATE: FieldName = FieldName::new("paymentDate");

    let RecordPaymentRequest {
        room_tenant_id,
        amount,
        payment_date,
        payment_method,
        reference,
    } = payload.into_inner();
    let room_tenant_id: RoomTenantId = parse_id(
        room_tenant_id
            .as_deref()
            .ok_or_else(|| missing_field_error(ROOM_TENANT_ID))?,
        ROOM_TENANT_ID,
    )?;
    let payment_date = parse_date(
        payment_date
            .as_deref()
            .ok_or_else(|| missing_field_error(PAYMENT_DATE))?,
        PAYMENT_DATE,
    )?;
    let payment = state
        .payments
        .record_payment(
            &caller,
            NewPayment {
                room_tenant_id,
                amount: Rwf::new(amount),
                payment_date,
                payment_method,
                reference,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(PaymentBody::from(payment)))
}

/// Payments for a property dated inside the window, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}/payments",
    params(("id" = String, Path, description = "Property id"), WindowQuery),
    responses(
        (status = 200, description = "Payments", body = [PaymentBody]),
        (status = 400, description = "Invalid window", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["payments"],
    operation_id = "listPayments"
)]
#[get("/properties/{id}/payments")]
pub async fn list_payments(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    query: web::Query<WindowQuery>,
) -> ApiResult<HttpResponse> {
    let property_id: PropertyId = parse_id(&path, FieldName::new("id"))?;
    let window = query.window(state.clock.utc().date_naive())?;
    let payments = state
        .payments
        .list_payments(&caller, property_id, window)
        .await?;
    Ok(private_json(
        payments
            .into_iter()
            .map(PaymentBody::from)
            .collect::<Vec<_>>(),
    ))
}

/// Paid, partial, overdue, or pending per active tenant for one month.
#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}/payment-status",
    params(("id" = String, Path, description = "Property id"), MonthQuery),
    responses(
        (status = 200, description = "Per-tenant status", body = [PaymentSummaryBody]),
        (status = 400, description = "Invalid month", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["payments"],
    operation_id = "paymentStatus"
)]
#[get("/properties/{id}/payment-status")]
pub async fn payment_status(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    query: web::Query<MonthQuery>,
) -> ApiResult<HttpResponse> {
    let property_id: PropertyId = parse_id(&path, FieldName::new("id"))?;
    let month = query.month(state.clock.utc().date_naive())?;
    let summaries = state
        .payments
        .tenant_payment_summaries(&caller, property_id, month)
        .await?;
    Ok(private_json(
        summaries
            .into_iter()
            .map(PaymentSummaryBody::from)
            .collect::<Vec<_>>(),
    ))
}
