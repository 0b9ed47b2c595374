//! Port for the `properties` table.

use async_trait::async_trait;

use crate::domain::{Caller, NewProperty, Property, PropertyId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by property repository adapters.
    pub enum PropertyRepositoryError {
        /// Backend could not be reached.
        Connection { message: String } => "property repository connection failed: {message}",
        /// Row-level security refused the operation.
        Denied { message: String } => "property repository access denied: {message}",
        /// Query or mutation failed.
        Query { message: String } => "property repository query failed: {message}",
    }
}

/// Which active properties a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyScope {
    /// Every active property.
    All,
    /// Properties owned by one landlord.
    Landlord(UserId),
    /// An explicit id set, e.g. properties a manager looks after.
    Ids(Vec<PropertyId>),
}

/// Reads and writes property rows on behalf of a caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// List properties with `deleted_at is null` within `scope`.
    async fn list_active(
        &self,
        caller: &Caller,
        scope: &PropertyScope,
    ) -> Result<Vec<Property>, PropertyRepositoryError>;

    /// Fetch one property, trashed or not.
    async fn find(
        &self,
        caller: &Caller,
        id: PropertyId,
    ) -> Result<Option<Property>, PropertyRepositoryError>;

    /// Insert a property owned by `landlord_id`.
    async fn insert(
        &self,
        caller: &Caller,
        landlord_id: UserId,
        property: &NewProperty,
    ) -> Result<Property, PropertyRepositoryError>;

    /// Persist the mutable columns of `property`.
    async fn update(
        &self,
        caller: &Caller,
        property: &Property,
    ) -> Result<Property, PropertyRepositoryError>;
}
