//! Report handlers.
//!
//! ```text
//! GET /api/v1/reports/revenue?propertyId=...&from=2024-01-01&to=2024-06-30
//! GET /api/v1/reports/outstanding?propertyId=...&month=2024-06
//! ```

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{DateWindow, Error, PropertyId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::cache_control::private_json;
use crate::inbound::http::dto::{PaymentSummaryBody, RevenueReportBody};
use crate::inbound::http::payments::MonthQuery;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_id, parse_optional_id, parse_window,
};

const PROPERTY_ID: FieldName = FieldName::new("propertyId");

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct RevenueQuery {
    /// Restrict to one property; omit for every visible property.
    pub property_id: Option<String>,
    /// `YYYY-MM-DD`
    pub from: Option<String>,
    /// `YYYY-MM-DD`
    pub to: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct OutstandingQuery {
    pub property_id: Option<String>,
}

/// Revenue grouped by month.
///
/// Without bounds the window is the current month.
#[utoipa::path(
    get,
    path = "/api/v1/reports/revenue",
    params(RevenueQuery),
    responses(
        (status = 200, description = "Revenue report", body = RevenueReportBody),
        (status = 400, description = "Invalid query", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Property not found", body = Error)
    ),
    tags = ["reports"],
    operation_id = "revenueReport"
)]
#[get("/reports/revenue")]
pub async fn revenue_report(
    state: web::Data<HttpState>,
    caller: Authenticated,
    query: web::Query<RevenueQuery>,
) -> ApiResult<HttpResponse> {
    let property_id: Option<PropertyId> =
        parse_optional_id(query.property_id.as_deref(), PROPERTY_ID)?;
    let today = state.clock.utc().date_naive();
    let window = parse_window(query.from.as_deref(), query.to.as_deref(), || {
        DateWindow::current_month(today)
    })?;
    let report = state
        .reports
        .revenue_report(&caller, property_id, window)
        .await?;
    Ok(private_json(RevenueReportBody::from(report)))
}

/// Tenants with an unpaid balance for the month.
#[utoipa::path(
    get,
    path = "/api/v1/reports/outstanding",
    params(OutstandingQuery, MonthQuery),
    responses(
        (status = 200, description = "Outstanding balances", body = [PaymentSummaryBody]),
        (status = 400, description = "Invalid query", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Property not found", body = Error)
    ),
    tags = ["reports"],
    operation_id = "outstandingBalances"
)]
#[get("/reports/outstanding")]
pub async fn outstanding_balances(
    state: web::Data<HttpState>,
    caller: Authenticated,
    query: web::Query<OutstandingQuery>,
    month: web::Query<MonthQuery>,
) -> ApiResult<HttpResponse> {
    let raw_id = query
        .property_id
        .as_deref()
        .ok_or_else(|| missing_field_error(PROPERTY_ID))?;
    let property_id: PropertyId = parse_id(raw_id, PROPERTY_ID)?;
    let month = month.month(state.clock.utc().date_naive())?;
    let balances = state
        .reports
        .outstanding_balances(&caller, property_id, month)
        .await?;
    Ok(private_json(
        balances
            .into_iter()
            .map(PaymentSummaryBody::from)
            .collect::<Vec<_>>(),
    ))
}
