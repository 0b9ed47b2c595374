//! Port for the `payments` table.

use async_trait::async_trait;

use crate::domain::{
    AttributedPayment, Caller, DateWindow, NewPayment, Payment, PropertyId, RoomTenantId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment repository adapters.
    pub enum PaymentRepositoryError {
        /// Backend could not be reached.
        Connection { message: String } => "payment repository connection failed: {message}",
        /// Row-level security refused the operation.
        Denied { message: String } => "payment repository access denied: {message}",
        /// Query or mutation failed.
        Query { message: String } => "payment repository query failed: {message}",
    }
}

/// Reads and writes payment rows on behalf of a caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Record a payment.
    async fn insert(
        &self,
        caller: &Caller,
        payment: &NewPayment,
    ) -> Result<Payment, PaymentRepositoryError>;

    /// Active payments against `occupancies` dated inside `window`.
    async fn list_for_occupancies(
        &self,
        caller: &Caller,
        occupancies: &[RoomTenantId],
        window: &DateWindow,
    ) -> Result<Vec<Payment>, PaymentRepositoryError>;

    /// Active payments for any occupancy in `property_ids`, dated inside
    /// `window`, each tagged with its property.
    async fn list_for_properties(
        &self,
        caller: &Caller,
        property_ids: &[PropertyId],
        window: &DateWindow,
    ) -> Result<Vec<AttributedPayment>, PaymentRepositoryError>;
}
