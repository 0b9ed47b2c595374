//! PostgREST-backed `ManagerRepository` adapter for `property_managers`.

use async_trait::async_trait;

use super::client::SupabaseClient;
use super::dto::{ManagerInsert, ManagerRow};
use super::error::{BackendError, BackendErrorKind};
use super::error_mapping::map_backend_error;
use super::query::TableQuery;
use crate::domain::ports::{ManagerRepository, ManagerRepositoryError};
use crate::domain::{Caller, EmailAddress, ManagerStatus, PropertyId, PropertyManager, UserId};

const TABLE: &str = "property_managers";

/// Manager assignment rows read and written with the caller's token.
#[derive(Debug, Clone)]
pub struct SupabaseManagerRepository {
    client: SupabaseClient,
}

impl SupabaseManagerRepository {
    /// Create the adapter.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    async fn list(
        &self,
        caller: &Caller,
        query: TableQuery,
    ) -> Result<Vec<PropertyManager>, ManagerRepositoryError> {
        let rows: Vec<ManagerRow> = self
            .client
            .select(&caller.token, &query)
            .await
            .map_err(map_error)?;
        Ok(rows.into_iter().map(PropertyManager::from).collect())
    }
}

fn map_error(error: BackendError) -> ManagerRepositoryError {
    if error.kind() == BackendErrorKind::Conflict {
        return ManagerRepositoryError::duplicate();
    }
    map_backend_error(
        error,
        ManagerRepositoryError::connection,
        ManagerRepositoryError::query,
    )
}

#[async_trait]
impl ManagerRepository for SupabaseManagerRepository {
    async fn list_for_property(
        &self,
        caller: &Caller,
        property_id: PropertyId,
    ) -> Result<Vec<PropertyManager>, ManagerRepositoryError> {
        self.list(
            caller,
            TableQuery::table(TABLE)
                .eq("property_id", property_id)
                .order("created_at", false),
        )
        .await
    }

    async fn list_active_for_manager(
        &self,
        caller: &Caller,
        manager: UserId,
    ) -> Result<Vec<PropertyManager>, ManagerRepositoryError> {
        self.list(
            caller,
            TableQuery::table(TABLE)
                .eq("manager_id", manager)
                .eq("status", ManagerStatus::Active.as_str()),
        )
        .await
    }

    async fn insert_pending(
        &self,
        caller: &Caller,
        property_id: PropertyId,
        email: &EmailAddress,
    ) -> Result<PropertyManager, ManagerRepositoryError> {
        let body = ManagerInsert {
            property_id,
            email: email.as_str(),
            status: ManagerStatus::Pending,
        };
        let rows: Vec<ManagerRow> = self
            .client
            .insert(&caller.token, TABLE, &body)
            .await
            .map_err(map_error)?;
        rows.into_iter()
            .next()
            .map(PropertyManager::from)
            .ok_or_else(|| ManagerRepositoryError::query("insert property_managers returned no row"))
    }
}
