//! Port for the `property_managers` table.

use async_trait::async_trait;

use crate::domain::{Caller, EmailAddress, PropertyId, PropertyManager, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by manager repository adapters.
    pub enum ManagerRepositoryError {
        /// Backend could not be reached.
        Connection { message: String } => "manager repository connection failed: {message}",
        /// A row for the same email and property already exists.
        Duplicate => "manager invitation already exists",
        /// Query or mutation failed.
        Query { message: String } => "manager repository query failed: {message}",
    }
}

/// Reads and writes manager assignments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ManagerRepository: Send + Sync {
    /// Managers and invitations for one property.
    async fn list_for_property(
        &self,
        caller: &Caller,
        property_id: PropertyId,
    ) -> Result<Vec<PropertyManager>, ManagerRepositoryError>;

    /// Active assignments held by `manager`.
    async fn list_active_for_manager(
        &self,
        caller: &Caller,
        manager: UserId,
    ) -> Result<Vec<PropertyManager>, ManagerRepositoryError>;

    /// Record a pending invitation.
    async fn insert_pending(
        &self,
        caller: &Caller,
        property_id: PropertyId,
        email: &EmailAddress,
    ) -> Result<PropertyManager, ManagerRepositoryError>;
}
