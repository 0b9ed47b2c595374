//! Property-level authorisation shared by the services.
//!
//! Row-level security in the backend is the final word; these checks exist
//! so callers get a clear `forbidden` instead of an empty result set.

use std::sync::Arc;

use crate::domain::ports::{ManagerRepository, PropertyRepository, PropertyScope};
use crate::domain::service_support::{map_manager_error, map_property_error};
use crate::domain::{Caller, Error, Property, PropertyId, UserRole};

/// Decides which properties a caller may see and change.
#[derive(Clone)]
pub struct AccessPolicy {
    properties: Arc<dyn PropertyRepository>,
    managers: Arc<dyn ManagerRepository>,
}

impl AccessPolicy {
    /// Build a policy over the property and manager stores.
    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        managers: Arc<dyn ManagerRepository>,
    ) -> Self {
        Self {
            properties,
            managers,
        }
    }

    /// Listing scope for the caller's role. Tenants have none.
    pub async fn scope_for(&self, caller: &Caller) -> Result<PropertyScope, Error> {
        match caller.role() {
            UserRole::Admin => Ok(PropertyScope::All),
            UserRole::Landlord => Ok(PropertyScope::Landlord(caller.id())),
            UserRole::Manager => {
                let assignments = self
                    .managers
                    .list_active_for_manager(caller, caller.id())
                    .await
                    .map_err(map_manager_error)?;
                Ok(PropertyScope::Ids(
                    assignments
                        .into_iter()
                        .filter(|row| row.grants_access_to(caller.id()))
                        .map(|row| row.property_id)
                        .collect(),
                ))
            }
            UserRole::Tenant => Err(Error::forbidden("tenants cannot manage properties")),
        }
    }

    /// Active properties visible to the caller.
    pub async fn visible_properties(&self, caller: &Caller) -> Result<Vec<Property>, Error> {
        let scope = self.scope_for(caller).await?;
        if matches!(&scope, PropertyScope::Ids(ids) if ids.is_empty()) {
            return Ok(Vec::new());
        }
        self.properties
            .list_active(caller, &scope)
            .await
            .map_err(map_property_error)
    }

    /// Load an active property, returning `not_found` for missing or trashed rows.
    pub async fn load_property(&self, caller: &Caller, id: PropertyId) -> Result<Property, Error> {
        self.properties
            .find(caller, id)
            .await
            .map_err(map_property_error)?
            .filter(Property::is_active)
            .ok_or_else(|| Error::not_found(format!("property {id} not found")))
    }

    /// Reject callers who may not manage `property`.
    ///
    /// Admins always pass; landlords pass for their own properties; managers
    /// pass when an active `property_managers` row links them to it.
    pub async fn require_property_access(
        &self,
        caller: &Caller,
        property: &Property,
    ) -> Result<(), Error> {
        let allowed = match caller.role() {
            UserRole::Admin => true,
            UserRole::Landlord => property.landlord_id == caller.id(),
            UserRole::Manager => self
                .managers
                .list_for_property(caller, property.id)
                .await
                .map_err(map_manager_error)?
                .iter()
                .any(|row| row.grants_access_to(caller.id())),
            UserRole::Tenant => false,
        };
        if allowed {
            Ok(())
        } else {
            Err(Error::forbidden(format!(
                "no access to property {}",
                property.id
            )))
        }
    }

    /// Load a property and check access in one step.
    pub async fn accessible_property(
        &self,
        caller: &Caller,
        id: PropertyId,
    ) -> Result<Property, Error> {
        let property = self.load_property(caller, id).await?;
        self.require_property_access(caller, &property).await?;
        Ok(property)
    }
}
