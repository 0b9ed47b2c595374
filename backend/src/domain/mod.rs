//! Domain primitives, aggregates, and use-case services.
//!
//! Purpose: define strongly typed entities for the rental workflow
//! (properties, rooms, tenants, payments, bookings) and the services that
//! operate on them through the traits in [`ports`]. Nothing here knows about
//! HTTP or the hosted backend's wire format.
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failure payload.
//! - Entity and value types re-exported from the submodules below.
//! - Services: [`AuthService`], [`PropertyService`], [`TenancyService`],
//!   [`PaymentService`], [`BookingService`], [`TrashService`],
//!   [`DashboardService`], [`ReportService`], [`InvitationService`], and
//!   [`ResetPinService`].

pub mod error;
pub mod ports;

mod access;
mod auth;
mod auth_service;
mod booking;
mod booking_service;
mod contact;
mod dashboard;
mod dashboard_service;
mod ids;
mod invitation_service;
mod language;
mod manager;
mod money;
mod payment;
mod payment_service;
mod property;
mod property_service;
mod report;
mod report_service;
mod reset_pin;
mod reset_pin_service;
mod service_support;
mod tenancy;
mod tenancy_service;
mod trace_id;
mod trash;
mod trash_service;
mod window;

#[cfg(test)]
pub(crate) mod fixtures;

pub use self::access::AccessPolicy;
pub use self::auth::{AccessToken, AuthUser, Caller, ParseUserRoleError, UserRole};
pub use self::auth_service::AuthService;
pub use self::booking::{
    BookingDecision, BookingOutcome, BookingPath, BookingRequest, BookingStatus,
    BookingValidationError, NewBooking, TenantBooking,
};
pub use self::booking_service::BookingService;
pub use self::contact::{
    EmailAddress, EmailValidationError, PhoneNumber, PhoneValidationError, validate_email,
    validate_phone,
};
pub use self::dashboard::{
    AdminDashboard, DashboardInputs, LandlordDashboard, PropertyStats, RoleCounts, TrashCount,
    percentage, performance_score, round_one_decimal,
};
pub use self::dashboard_service::{DashboardPorts, DashboardService};
pub use self::error::{Error, ErrorCode};
pub use self::ids::{
    BookingId, IdParseError, PaymentId, PropertyId, PropertyManagerId, RecordId, RoomId,
    RoomTenantId, TenantId, UserId,
};
pub use self::invitation_service::InvitationService;
pub use self::language::Language;
pub use self::manager::{InvitationReceipt, ManagerInvitation, ManagerStatus, PropertyManager};
pub use self::money::{Rwf, format_compact, format_currency, format_percentage};
pub use self::payment::{
    AttributedPayment, NewPayment, Payment, PaymentLedger, PaymentMethod, PaymentStatus,
    PaymentValidationError, TenantPaymentSummary, payment_status,
};
pub use self::payment_service::{DEFAULT_RENT_DUE_DAY, PaymentService};
pub use self::property::{
    ALLOWED_IMAGE_TYPES, ImageUpload, MAX_IMAGE_BYTES, NewProperty, NewRoom,
    PROPERTY_IMAGES_BUCKET, ParseRoomStatusError, Property, PropertyPatch,
    PropertyValidationError, Room, RoomStatus, sanitise_file_name,
};
pub use self::property_service::PropertyService;
pub use self::report::{MonthlyRevenue, RevenueReport};
pub use self::report_service::ReportService;
pub use self::reset_pin::{
    MailReceipt, OutgoingEmail, RESET_PIN_SENT_MESSAGE, ResetPin, ResetPinRequest,
    ResetPinResponse, ResetPinValidationError, ValidResetPinRequest,
};
pub use self::reset_pin_service::{ResetPinOutcome, ResetPinService};
pub use self::tenancy::{
    NewOccupancy, NewTenant, OccupancyDetails, RoomTenant, TenancyValidationError, Tenant,
    TenantDraft,
};
pub use self::tenancy_service::TenancyService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::trash::{TrashRecord, TrashTable, TrashView, UnknownTrashTable};
pub use self::trash_service::TrashService;
pub use self::window::{DateWindow, Month, WindowError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use icumbi::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
