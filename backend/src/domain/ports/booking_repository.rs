//! Port for the `tenant_bookings` table and the `create_tenant_booking` RPC.

use async_trait::async_trait;

use crate::domain::{
    BookingId, BookingStatus, Caller, NewBooking, PropertyId, TenantBooking, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by booking repository adapters.
    pub enum BookingRepositoryError {
        /// The backend reported the RPC as undefined.
        FunctionMissing { function: String } => "backend function `{function}` is not deployed",
        /// The backend refused the booking (constraint, RLS, or RPC check).
        Rejected { message: String } => "booking rejected: {message}",
        /// Backend could not be reached.
        Connection { message: String } => "booking repository connection failed: {message}",
        /// Query or mutation failed.
        Query { message: String } => "booking repository query failed: {message}",
    }
}

/// Booking persistence.
///
/// `create_via_rpc` and `insert` are the two steps of the submission
/// strategy; only [`BookingRepositoryError::FunctionMissing`] from the first
/// step allows the second.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Create a booking through the `create_tenant_booking` RPC.
    async fn create_via_rpc(
        &self,
        caller: &Caller,
        booking: &NewBooking,
    ) -> Result<BookingId, BookingRepositoryError>;

    /// Insert directly into `tenant_bookings`.
    async fn insert(
        &self,
        caller: &Caller,
        booking: &NewBooking,
    ) -> Result<TenantBooking, BookingRepositoryError>;

    /// Fetch one booking.
    async fn find(
        &self,
        caller: &Caller,
        id: BookingId,
    ) -> Result<Option<TenantBooking>, BookingRepositoryError>;

    /// Bookings for any of `property_ids`, newest first.
    async fn list_for_properties(
        &self,
        caller: &Caller,
        property_ids: &[PropertyId],
    ) -> Result<Vec<TenantBooking>, BookingRepositoryError>;

    /// Bookings made by `tenant`, newest first.
    async fn list_for_tenant(
        &self,
        caller: &Caller,
        tenant: UserId,
    ) -> Result<Vec<TenantBooking>, BookingRepositoryError>;

    /// Every booking, newest first.
    async fn list_all(&self, caller: &Caller) -> Result<Vec<TenantBooking>, BookingRepositoryError>;

    /// Move a booking to `status`.
    async fn update_status(
        &self,
        caller: &Caller,
        id: BookingId,
        status: BookingStatus,
    ) -> Result<TenantBooking, BookingRepositoryError>;
}
