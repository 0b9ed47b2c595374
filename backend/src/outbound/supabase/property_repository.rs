//! PostgREST-backed `PropertyRepository` adapter.

use async_trait::async_trait;

use super::client::SupabaseClient;
use super::dto::{PropertyRow, PropertyWrite};
use super::error::{BackendError, BackendErrorKind};
use super::error_mapping::map_basic_backend_error;
use super::query::TableQuery;
use crate::domain::ports::{PropertyRepository, PropertyRepositoryError, PropertyScope};
use crate::domain::{Caller, NewProperty, Property, PropertyId, UserId};

const TABLE: &str = "properties";

/// Property rows read and written with the caller's token.
#[derive(Debug, Clone)]
pub struct SupabasePropertyRepository {
    client: SupabaseClient,
}

impl SupabasePropertyRepository {
    /// Create the adapter.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

fn map_error(error: BackendError) -> PropertyRepositoryError {
    map_basic_backend_error(
        error,
        PropertyRepositoryError::connection,
        PropertyRepositoryError::denied,
        PropertyRepositoryError::query,
    )
}

/// `None` when the scope cannot match any row.
fn active_query(scope: &PropertyScope) -> Option<TableQuery> {
    let query = TableQuery::table(TABLE)
        .is_null("deleted_at")
        .order("created_at", false);
    match scope {
        PropertyScope::All => Some(query),
        PropertyScope::Landlord(landlord) => Some(query.eq("landlord_id", landlord)),
        PropertyScope::Ids(ids) if ids.is_empty() => None,
        PropertyScope::Ids(ids) => Some(query.in_("id", ids)),
    }
}

fn single(rows: Vec<PropertyRow>, operation: &str) -> Result<Property, PropertyRepositoryError> {
    rows.into_iter().next().map(Property::from).ok_or_else(|| {
        map_error(BackendError::new(
            BackendErrorKind::Decode,
            operation,
            "no row returned; check row-level security policies",
        ))
    })
}

#[async_trait]
impl PropertyRepository for SupabasePropertyRepository {
    async fn list_active(
        &self,
        caller: &Caller,
        scope: &PropertyScope,
    ) -> Result<Vec<Property>, PropertyRepositoryError> {
        let Some(query) = active_query(scope) else {
            return Ok(Vec::new());
        };
        let rows: Vec<PropertyRow> = self
            .client
            .select(&caller.token, &query)
            .await
            .map_err(map_error)?;
        Ok(rows.into_iter().map(Property::from).collect())
    }

    async fn find(
        &self,
        caller: &Caller,
        id: PropertyId,
    ) -> Result<Option<Property>, PropertyRepositoryError> {
        let query = TableQuery::table(TABLE).eq("id", id).limit(1);
        let rows: Vec<PropertyRow> = self
            .client
            .select(&caller.token, &query)
            .await
            .map_err(map_error)?;
        Ok(rows.into_iter().next().map(Property::from))
    }

    async fn insert(
        &self,
        caller: &Caller,
        landlord_id: UserId,
        property: &NewProperty,
    ) -> Result<Property, PropertyRepositoryError> {
        let rows: Vec<PropertyRow> = self
            .client
            .insert(
                &caller.token,
                TABLE,
                &PropertyWrite::insert(landlord_id, property),
            )
            .await
            .map_err(map_error)?;
        single(rows, "insert properties")
    }

    async fn update(
        &self,
        caller: &Caller,
        property: &Property,
    ) -> Result<Property, PropertyRepositoryError> {
        let query = TableQuery::table(TABLE).eq("id", property.id);
        let rows: Vec<PropertyRow> = self
            .client
            .update(&caller.token, &query, &PropertyWrite::update(property))
            .await
            .map_err(map_error)?;
        single(rows, "update properties")
    }
}
