//! HTTP inbound adapter exposing REST endpoints.
//!
//! [`configure`] registers every route together with the extractor
//! configuration, so the server binary and the integration tests mount the
//! same surface.

pub mod auth;
pub mod bookings;
pub mod cache_control;
pub mod dashboard;
pub mod dto;
pub mod error;
pub mod health;
pub mod managers;
pub mod payments;
pub mod properties;
pub mod reports;
pub mod reset_pin;
pub mod schemas;
pub mod session;
pub mod state;
pub mod tenants;
#[cfg(test)]
pub mod test_utils;
pub mod trash;
pub mod validation;

use actix_web::web;

use crate::domain::MAX_IMAGE_BYTES;

pub use error::ApiResult;

/// Headroom above the image limit so oversized uploads reach the service
/// and fail validation with a field error instead of a bare 413.
const PAYLOAD_HEADROOM_BYTES: usize = 64 * 1024;

/// Register the `/api/v1` scope, the reset-PIN function, and extractor
/// error handlers.
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
/// use icumbi::inbound::http::{configure, state::{HttpState, HttpStatePorts}};
///
/// fn app(ports: HttpStatePorts) {
///     let _app = App::new()
///         .app_data(web::Data::new(HttpState::new(ports)))
///         .configure(configure);
/// }
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    let api = web::scope("/api/v1")
        .service(session::current_user)
        .service(session::sign_out)
        .service(properties::list_properties)
        .service(properties::create_property)
        .service(properties::get_property)
        .service(properties::update_property)
        .service(properties::upload_property_image)
        .service(properties::list_rooms)
        .service(properties::create_room)
        .service(properties::update_room_status)
        .service(tenants::list_tenants)
        .service(tenants::register_tenant)
        .service(tenants::move_out)
        .service(payments::record_payment)
        .service(payments::list_payments)
        .service(payments::payment_status)
        .service(bookings::list_bookings)
        .service(bookings::submit_booking)
        .service(bookings::review_booking)
        .service(bookings::cancel_booking)
        .service(trash::trash_view)
        .service(trash::move_to_trash)
        .service(trash::restore)
        .service(trash::purge)
        .service(dashboard::landlord_dashboard)
        .service(dashboard::admin_dashboard)
        .service(reports::revenue_report)
        .service(reports::outstanding_balances)
        .service(managers::list_managers)
        .service(managers::invite_manager);

    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .app_data(web::PayloadConfig::new(
            MAX_IMAGE_BYTES + PAYLOAD_HEADROOM_BYTES,
        ))
        .service(api)
        .service(reset_pin::send_reset_pin_email)
        .service(reset_pin::reset_pin_preflight);
}
