//! PostgREST-backed `TenantRepository` adapter for `tenants` and
//! `room_tenants`.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::client::SupabaseClient;
use super::dto::{OccupancyEnd, OccupancyInsert, RoomTenantRow, TenantInsert, TenantRow};
use super::error::{BackendError, BackendErrorKind};
use super::error_mapping::{is_constraint, map_basic_backend_error};
use super::query::TableQuery;
use crate::domain::ports::{TenantRepository, TenantRepositoryError};
use crate::domain::{
    Caller, NewOccupancy, PropertyId, RoomId, RoomTenant, RoomTenantId, Tenant, TenantDraft,
    TenantId,
};

const TENANTS: &str = "tenants";
const OCCUPANCIES: &str = "room_tenants";
const OCCUPANCY_COLUMNS: &str = "id,room_id,tenant_id,move_in_date,move_out_date,is_active";

/// Tenant and occupancy rows read and written with the caller's token.
#[derive(Debug, Clone)]
pub struct SupabaseTenantRepository {
    client: SupabaseClient,
}

impl SupabaseTenantRepository {
    /// Create the adapter.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

fn map_error(error: BackendError) -> TenantRepositoryError {
    if is_constraint(&error) {
        return TenantRepositoryError::constraint(error.message());
    }
    map_basic_backend_error(
        error,
        TenantRepositoryError::connection,
        TenantRepositoryError::denied,
        TenantRepositoryError::query,
    )
}

fn missing_row(operation: &str) -> TenantRepositoryError {
    map_error(BackendError::new(
        BackendErrorKind::Decode,
        operation,
        "no row returned",
    ))
}

fn occupancies_for_properties_query(property_ids: &[PropertyId]) -> TableQuery {
    TableQuery::table(OCCUPANCIES)
        .select(format!("{OCCUPANCY_COLUMNS},rooms!inner(property_id)"))
        .eq("is_active", true)
        .in_("rooms.property_id", property_ids)
        .order("move_in_date", true)
}

#[async_trait]
impl TenantRepository for SupabaseTenantRepository {
    async fn insert_tenant(
        &self,
        caller: &Caller,
        tenant: &TenantDraft,
    ) -> Result<Tenant, TenantRepositoryError> {
        let rows: Vec<TenantRow> = self
            .client
            .insert(&caller.token, TENANTS, &TenantInsert::from(tenant))
            .await
            .map_err(map_error)?;
        rows.into_iter()
            .next()
            .map(Tenant::from)
            .ok_or_else(|| missing_row("insert tenants"))
    }

    async fn delete_tenant(
        &self,
        caller: &Caller,
        id: TenantId,
    ) -> Result<(), TenantRepositoryError> {
        let query = TableQuery::table(TENANTS).eq("id", id);
        self.client
            .delete(&caller.token, &query)
            .await
            .map_err(map_error)
    }

    async fn find_tenants(
        &self,
        caller: &Caller,
        ids: &[TenantId],
    ) -> Result<Vec<Tenant>, TenantRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = TableQuery::table(TENANTS).in_("id", ids);
        let rows: Vec<TenantRow> = self
            .client
            .select(&caller.token, &query)
            .await
            .map_err(map_error)?;
        Ok(rows.into_iter().map(Tenant::from).collect())
    }

    async fn insert_occupancy(
        &self,
        caller: &Caller,
        occupancy: &NewOccupancy,
    ) -> Result<RoomTenant, TenantRepositoryError> {
        let rows: Vec<RoomTenantRow> = self
            .client
            .insert(&caller.token, OCCUPANCIES, &OccupancyInsert::from(occupancy))
            .await
            .map_err(map_error)?;
        rows.into_iter()
            .next()
            .map(RoomTenant::from)
            .ok_or_else(|| missing_row("insert room_tenants"))
    }

    async fn find_occupancy(
        &self,
        caller: &Caller,
        id: RoomTenantId,
    ) -> Result<Option<RoomTenant>, TenantRepositoryError> {
        let query = TableQuery::table(OCCUPANCIES)
            .select(OCCUPANCY_COLUMNS)
            .eq("id", id)
            .limit(1);
        let rows: Vec<RoomTenantRow> = self
            .client
            .select(&caller.token, &query)
            .await
            .map_err(map_error)?;
        Ok(rows.into_iter().next().map(RoomTenant::from))
    }

    async fn end_occupancy(
        &self,
        caller: &Caller,
        id: RoomTenantId,
        move_out_date: NaiveDate,
    ) -> Result<RoomTenant, TenantRepositoryError> {
        let query = TableQuery::table(OCCUPANCIES)
            .select(OCCUPANCY_COLUMNS)
            .eq("id", id);
        let patch = OccupancyEnd {
            is_active: false,
            move_out_date,
        };
        let rows: Vec<RoomTenantRow> = self
            .client
            .update(&caller.token, &query, &patch)
            .await
            .map_err(map_error)?;
        rows.into_iter()
            .next()
            .map(RoomTenant::from)
            .ok_or_else(|| missing_row("update room_tenants"))
    }

    async fn list_active_occupancies(
        &self,
        caller: &Caller,
        room_ids: &[RoomId],
    ) -> Result<Vec<RoomTenant>, TenantRepositoryError> {
        if room_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = TableQuery::table(OCCUPANCIES)
            .select(OCCUPANCY_COLUMNS)
            .eq("is_active", true)
            .in_("room_id", room_ids);
        let rows: Vec<RoomTenantRow> = self
            .client
            .select(&caller.token, &query)
            .await
            .map_err(map_error)?;
        Ok(rows.into_iter().map(RoomTenant::from).collect())
    }

    async fn list_active_occupancies_for_properties(
        &self,
        caller: &Caller,
        property_ids: &[PropertyId],
    ) -> Result<Vec<RoomTenant>, TenantRepositoryError> {
        if property_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<RoomTenantRow> = self
            .client
            .select(
                &caller.token,
                &occupancies_for_properties_query(property_ids),
            )
            .await
            .map_err(map_error)?;
        Ok(rows.into_iter().map(RoomTenant::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(BackendErrorKind::Conflict)]
    #[case(BackendErrorKind::InvalidRequest)]
    fn constraint_failures_are_distinct(#[case] kind: BackendErrorKind) {
        let error = map_error(BackendError::new(kind, "insert tenants", "duplicate phone"));
        assert_eq!(error, TenantRepositoryError::constraint("duplicate phone"));
    }

    #[test]
    fn property_scoped_occupancies_filter_through_the_room_embed() {
        let property = PropertyId::random();
        let params = occupancies_for_properties_query(&[property]).params();
        assert!(params.contains(&(
            "rooms.property_id".to_owned(),
            format!("in.(\"{property}\")")
        )));
        assert!(params.contains(&("is_active".to_owned(), "eq.true".to_owned())));
    }
}
