//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI document for the REST API. It registers:
//!
//! - **Paths**: every handler under `/api/v1`, the reset-PIN function, and
//!   the health probes
//! - **Schemas**: request and response bodies from the inbound layer, the
//!   domain [`Error`](crate::domain::Error) payload, and wrappers for the
//!   reset-PIN wire types
//! - **Security**: bearer access tokens issued by the hosted auth service
//!
//! The document backs Swagger UI in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::bookings::{ReviewBookingRequest, SubmitBookingRequest};
use crate::inbound::http::dto::{
    AdminDashboardBody, BookingBody, BookingCreatedBody, LandlordDashboardBody, ManagerBody,
    MoneyBody, OccupancyBody, PaymentBody, PaymentSummaryBody, PropertyBody, RevenueReportBody,
    RoomBody, TenancyBody, TenantBody, TrashActionBody, TrashViewBody, UserBody,
};
use crate::inbound::http::managers::InviteManagerRequest;
use crate::inbound::http::payments::RecordPaymentRequest;
use crate::inbound::http::properties::{
    CreatePropertyRequest, CreateRoomRequest, RoomStatusRequest, UpdatePropertyRequest,
};
use crate::inbound::http::schemas::{ResetPinRequestSchema, ResetPinResponseSchema};
use crate::inbound::http::tenants::{MoveOutRequest, RegisterTenantRequest};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token issued by the hosted auth service."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Icumbi backend API",
        description = "Property management for Rwandan landlords: properties, rooms, \
                       tenants, rent payments, bookings, and reports."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::session::current_user,
        crate::inbound::http::session::sign_out,
        crate::inbound::http::properties::list_properties,
        crate::inbound::http::properties::create_property,
        crate::inbound::http::properties::get_property,
        crate::inbound::http::properties::update_property,
        crate::inbound::http::properties::upload_property_image,
        crate::inbound::http::properties::list_rooms,
        crate::inbound::http::properties::create_room,
        crate::inbound::http::properties::update_room_status,
        crate::inbound::http::tenants::list_tenants,
        crate::inbound::http::tenants::register_tenant,
        crate::inbound::http::tenants::move_out,
        crate::inbound::http::payments::record_payment,
        crate::inbound::http::payments::list_payments,
        crate::inbound::http::payments::payment_status,
        crate::inbound::http::bookings::list_bookings,
        crate::inbound::http::bookings::submit_booking,
        crate::inbound::http::bookings::review_booking,
        crate::inbound::http::bookings::cancel_booking,
        crate::inbound::http::trash::trash_view,
        crate::inbound::http::trash::move_to_trash,
        crate::inbound::http::trash::restore,
        crate::inbound::http::trash::purge,
        crate::inbound::http::dashboard::landlord_dashboard,
        crate::inbound::http::dashboard::admin_dashboard,
        crate::inbound::http::reports::revenue_report,
        crate::inbound::http::reports::outstanding_balances,
        crate::inbound::http::managers::list_managers,
        crate::inbound::http::managers::invite_manager,
        crate::inbound::http::reset_pin::send_reset_pin_email,
        crate::inbound::http::reset_pin::reset_pin_preflight,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserBody,
        MoneyBody,
        PropertyBody,
        RoomBody,
        TenantBody,
        OccupancyBody,
        TenancyBody,
        PaymentBody,
        PaymentSummaryBody,
        BookingBody,
        BookingCreatedBody,
        ManagerBody,
        TrashViewBody,
        TrashActionBody,
        LandlordDashboardBody,
        AdminDashboardBody,
        RevenueReportBody,
        CreatePropertyRequest,
        UpdatePropertyRequest,
        CreateRoomRequest,
        RoomStatusRequest,
        RegisterTenantRequest,
        MoveOutRequest,
        RecordPaymentRequest,
        SubmitBookingRequest,
        ReviewBookingRequest,
        InviteManagerRequest,
        ResetPinRequestSchema,
        ResetPinResponseSchema,
    )),
    tags(
        (name = "session", description = "The signed-in user and sign-out"),
        (name = "properties", description = "Properties, rooms, and property photos"),
        (name = "tenancy", description = "Tenant registration and move-outs"),
        (name = "payments", description = "Rent payments and payment status"),
        (name = "bookings", description = "Booking requests from prospective tenants"),
        (name = "trash", description = "Soft delete, restore, and purge"),
        (name = "dashboard", description = "Landlord and admin dashboards"),
        (name = "reports", description = "Revenue and outstanding balances"),
        (name = "managers", description = "Property manager invitations"),
        (name = "functions", description = "Public functions callable without a session"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
