//! Booking submission, review, cancellation, and listings.
//!
//! Submission is a two-step strategy. The `create_tenant_booking` RPC is
//! tried first; only when the backend reports that function as undefined
//! (a typed [`BookingRepositoryError::FunctionMissing`]) does the service
//! insert into `tenant_bookings` directly. Every other failure is surfaced
//! unchanged, so a submission either yields a row id or an error.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::domain::access::AccessPolicy;
use crate::domain::ports::{BookingRepository, BookingRepositoryError, PropertyRepository};
use crate::domain::service_support::{invalid_field, map_booking_error, map_property_error};
use crate::domain::{
    BookingDecision, BookingId, BookingOutcome, BookingPath, BookingRequest, BookingStatus,
    Caller, Error, NewBooking, PropertyId, TenantBooking, UserRole,
};

/// Booking use cases.
#[derive(Clone)]
pub struct BookingService {
    access: AccessPolicy,
    properties: Arc<dyn PropertyRepository>,
    bookings: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    /// Create the service.
    pub fn new(
        access: AccessPolicy,
        properties: Arc<dyn PropertyRepository>,
        bookings: Arc<dyn BookingRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            access,
            properties,
            bookings,
            clock,
        }
    }

    /// Submit a booking request for the calling tenant.
    pub async fn submit_booking(
        &self,
        caller: &Caller,
        request: BookingRequest,
    ) -> Result<BookingOutcome, Error> {
        let booking = self.validate_request(caller, request).await?;

        match self.bookings.create_via_rpc(caller, &booking).await {
            Ok(booking_id) => {
                info!(booking_id = %booking_id, property_id = %booking.property_id, "booking created via rpc");
                Ok(BookingOutcome {
                    booking_id,
                    path: BookingPath::Rpc,
                })
            }
            Err(BookingRepositoryError::FunctionMissing { function }) => {
                warn!(%function, property_id = %booking.property_id, "booking rpc missing; inserting directly");
                self.insert_directly(caller, &booking).await
            }
            Err(error) => Err(map_booking_error(error)),
        }
    }

    async fn insert_directly(
        &self,
        caller: &Caller,
        booking: &NewBooking,
    ) -> Result<BookingOutcome, Error> {
        let row = self
            .bookings
            .insert(caller, booking)
            .await
            .map_err(map_booking_error)?;
        info!(booking_id = %row.id, property_id = %row.property_id, "booking created via direct insert");
        Ok(BookingOutcome {
            booking_id: row.id,
            path: BookingPath::DirectInsert,
        })
    }

    async fn validate_request(
        &self,
        caller: &Caller,
        request: BookingRequest,
    ) -> Result<NewBooking, Error> {
        let property_id = request.property_id;
        let property = self
            .properties
            .find(caller, property_id)
            .await
            .map_err(map_property_error)?;
        if !property.as_ref().is_some_and(|p| p.is_active()) {
            return Err(Error::not_found(format!("property {property_id} not found")));
        }
        let today = self.clock.utc().date_naive();
        request
            .validate(caller.id(), today)
            .map_err(|e| invalid_field(e.field(), e.to_string()))
    }

    async fn load_booking(&self, caller: &Caller, id: BookingId) -> Result<TenantBooking, Error> {
        self.bookings
            .find(caller, id)
            .await
            .map_err(map_booking_error)?
            .ok_or_else(|| Error::not_found(format!("booking {id} not found")))
    }

    /// Approve or reject a pending booking.
    pub async fn review_booking(
        &self,
        caller: &Caller,
        id: BookingId,
        decision: BookingDecision,
    ) -> Result<TenantBooking, Error> {
        caller.require_role(&[UserRole::Landlord, UserRole::Manager, UserRole::Admin])?;
        let booking = self.load_booking(caller, id).await?;
        self.access
            .accessible_property(caller, booking.property_id)
            .await?;
        if booking.status != BookingStatus::Pending {
            return Err(Error::conflict(format!(
                "booking is already {}",
                booking.status
            )));
        }
        let updated = self
            .bookings
            .update_status(caller, id, decision.target_status())
            .await
            .map_err(map_booking_error)?;
        info!(booking_id = %id, status = %updated.status, "booking reviewed");
        Ok(updated)
    }

    /// Withdraw the caller's own pending booking.
    pub async fn cancel_booking(
        &self,
        caller: &Caller,
        id: BookingId,
    ) -> Result<TenantBooking, Error> {
        let booking = self.load_booking(caller, id).await?;
        if booking.tenant_user_id != caller.id() {
            return Err(Error::forbidden("only the requesting tenant may cancel"));
        }
        if booking.status != BookingStatus::Pending {
            return Err(Error::conflict(format!(
                "booking is already {}",
                booking.status
            )));
        }
        let updated = self
            .bookings
            .update_status(caller, id, BookingStatus::Cancelled)
            .await
            .map_err(map_booking_error)?;
        info!(booking_id = %id, "booking cancelled");
        Ok(updated)
    }

    /// Bookings visible to the caller, newest first.
    pub async fn list_bookings(&self, caller: &Caller) -> Result<Vec<TenantBooking>, Error> {
        let rows = match caller.role() {
            UserRole::Tenant => self.bookings.list_for_tenant(caller, caller.id()).await,
            UserRole::Admin => self.bookings.list_all(caller).await,
            UserRole::Landlord | UserRole::Manager => {
                let ids: Vec<PropertyId> = self
                    .access
                    .visible_properties(caller)
                    .await?
                    .into_iter()
                    .map(|p| p.id)
                    .collect();
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                self.bookings.list_for_properties(caller, &ids).await
            }
        };
        let mut rows = rows.map_err(map_booking_error)?;
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}
