//! Dashboard handlers.

use actix_web::{HttpResponse, get, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::cache_control::private_json;
use crate::inbound::http::dto::{AdminDashboardBody, LandlordDashboardBody};
use crate::inbound::http::payments::WindowQuery;
use crate::inbound::http::state::HttpState;

/// Occupancy and revenue across the caller's properties.
///
/// Revenue covers the window, which defaults to the current calendar month.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/landlord",
    params(WindowQuery),
    responses(
        (status = 200, description = "Landlord dashboard", body = LandlordDashboardBody),
        (status = 400, description = "Invalid window", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "landlordDashboard"
)]
#[get("/dashboard/landlord")]
pub async fn landlord_dashboard(
    state: web::Data<HttpState>,
    caller: Authenticated,
    query: web::Query<WindowQuery>,
) -> ApiResult<HttpResponse> {
    let window = query.window(state.clock.utc().date_naive())?;
    let dashboard = state.dashboard.landlord_dashboard(&caller, window).await?;
    Ok(private_json(LandlordDashboardBody::from(dashboard)))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/admin",
    responses(
        (status = 200, description = "Platform-wide counts", body = AdminDashboardBody),
        (status = 403, description = "Admin only", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "adminDashboard"
)]
#[get("/dashboard/admin")]
pub async fn admin_dashboard(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let dashboard = state.dashboard.admin_dashboard(&caller).await?;
    Ok(private_json(AdminDashboardBody::from(dashboard)))
}
