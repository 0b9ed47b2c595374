//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O: swap the ports
//! in [`HttpStatePorts`] for in-memory or mocked implementations.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AuthGateway, BookingRepository, InvitationSender, ManagerRepository, ObjectStorage,
    PaymentRepository, PropertyRepository, ResetPinMailer, RoomRepository, TenantRepository,
    TrashRepository, UserDirectory,
};
use crate::domain::{
    AccessPolicy, AuthService, BookingService, DashboardPorts, DashboardService,
    InvitationService, PaymentService, PropertyService, ReportService, ResetPinService,
    TenancyService, TrashService,
};

/// Parameter object bundling every port implementation the services need.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub auth: Arc<dyn AuthGateway>,
    pub properties: Arc<dyn PropertyRepository>,
    pub rooms: Arc<dyn RoomRepository>,
    pub tenants: Arc<dyn TenantRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub managers: Arc<dyn ManagerRepository>,
    pub trash: Arc<dyn TrashRepository>,
    pub users: Arc<dyn UserDirectory>,
    pub storage: Arc<dyn ObjectStorage>,
    pub invitations: Arc<dyn InvitationSender>,
    pub mailer: Arc<dyn ResetPinMailer>,
    /// Source of "today" for default windows and overdue checks.
    pub clock: Arc<dyn Clock>,
    /// Day of the month rent falls due.
    pub rent_due_day: u32,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: AuthService,
    pub properties: PropertyService,
    pub tenancy: TenancyService,
    pub payments: PaymentService,
    pub bookings: BookingService,
    pub trash: TrashService,
    pub dashboard: DashboardService,
    pub reports: ReportService,
    pub invitations: InvitationService,
    pub reset_pin: ResetPinService,
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Wire the domain services over a set of ports.
    ///
    /// # Examples
    /// ```
    /// use actix_web::web;
    /// use icumbi::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// fn build(ports: HttpStatePorts) -> web::Data<HttpState> {
    ///     web::Data::new(HttpState::new(ports))
    /// }
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            auth,
            properties,
            rooms,
            tenants,
            payments,
            bookings,
            managers,
            trash,
            users,
            storage,
            invitations,
            mailer,
            clock,
            rent_due_day,
        } = ports;

        let access = AccessPolicy::new(properties.clone(), managers.clone());
        let payment_service = PaymentService::new(
            access.clone(),
            rooms.clone(),
            tenants.clone(),
            payments.clone(),
            clock.clone(),
            rent_due_day,
        );
        let dashboard = DashboardService::new(
            access.clone(),
            DashboardPorts {
                properties: properties.clone(),
                rooms: rooms.clone(),
                tenants: tenants.clone(),
                payments: payments.clone(),
                bookings: bookings.clone(),
                users,
                trash: trash.clone(),
            },
        );

        Self {
            auth: AuthService::new(auth),
            properties: PropertyService::new(
                access.clone(),
                properties.clone(),
                rooms.clone(),
                storage,
            ),
            tenancy: TenancyService::new(access.clone(), rooms, tenants),
            reports: ReportService::new(access.clone(), payments, payment_service.clone()),
            payments: payment_service,
            bookings: BookingService::new(access.clone(), properties, bookings, clock.clone()),
            trash: TrashService::new(trash),
            dashboard,
            invitations: InvitationService::new(access, managers, invitations),
            reset_pin: ResetPinService::new(mailer),
            clock,
        }
    }
}
