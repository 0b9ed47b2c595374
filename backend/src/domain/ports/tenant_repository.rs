//! Port for the `tenants` and `room_tenants` tables.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    Caller, NewOccupancy, PropertyId, RoomId, RoomTenant, RoomTenantId, Tenant, TenantDraft,
    TenantId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by tenant repository adapters.
    pub enum TenantRepositoryError {
        /// Backend could not be reached.
        Connection { message: String } => "tenant repository connection failed: {message}",
        /// Row-level security refused the operation.
        Denied { message: String } => "tenant repository access denied: {message}",
        /// A uniqueness or check constraint rejected the write.
        Constraint { message: String } => "tenant repository constraint violated: {message}",
        /// Query or mutation failed.
        Query { message: String } => "tenant repository query failed: {message}",
    }
}

/// Reads and writes tenants and their occupancies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Insert a tenant.
    async fn insert_tenant(
        &self,
        caller: &Caller,
        tenant: &TenantDraft,
    ) -> Result<Tenant, TenantRepositoryError>;

    /// Hard-delete a tenant with no occupancy history.
    async fn delete_tenant(
        &self,
        caller: &Caller,
        id: TenantId,
    ) -> Result<(), TenantRepositoryError>;

    /// Fetch tenants by id.
    async fn find_tenants(
        &self,
        caller: &Caller,
        ids: &[TenantId],
    ) -> Result<Vec<Tenant>, TenantRepositoryError>;

    /// Open an active occupancy.
    async fn insert_occupancy(
        &self,
        caller: &Caller,
        occupancy: &NewOccupancy,
    ) -> Result<RoomTenant, TenantRepositoryError>;

    /// Fetch one occupancy.
    async fn find_occupancy(
        &self,
        caller: &Caller,
        id: RoomTenantId,
    ) -> Result<Option<RoomTenant>, TenantRepositoryError>;

    /// Close an occupancy: `is_active = false` and `move_out_date` set.
    async fn end_occupancy(
        &self,
        caller: &Caller,
        id: RoomTenantId,
        move_out_date: NaiveDate,
    ) -> Result<RoomTenant, TenantRepositoryError>;

    /// Active occupancies of any of `room_ids`.
    async fn list_active_occupancies(
        &self,
        caller: &Caller,
        room_ids: &[RoomId],
    ) -> Result<Vec<RoomTenant>, TenantRepositoryError>;

    /// Active occupancies of rooms belonging to any of `property_ids`.
    async fn list_active_occupancies_for_properties(
        &self,
        caller: &Caller,
        property_ids: &[PropertyId],
    ) -> Result<Vec<RoomTenant>, TenantRepositoryError>;
}
