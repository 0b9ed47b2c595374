//! PostgREST-backed `BookingRepository` adapter.
//!
//! `create_via_rpc` reports [`BookingRepositoryError::FunctionMissing`]
//! only for [`BackendErrorKind::FunctionNotFound`], which is derived from the
//! backend's structured error code. No other failure enables the service's
//! direct-insert fallback.

use async_trait::async_trait;

use super::client::SupabaseClient;
use super::dto::{BookingInsert, BookingRow, BookingStatusPatch, CreateBookingArgs, CreatedBooking};
use super::error::{BackendError, BackendErrorKind};
use super::error_mapping::is_constraint;
use super::query::TableQuery;
use crate::domain::ports::{BookingRepository, BookingRepositoryError};
use crate::domain::{
    BookingId, BookingStatus, Caller, NewBooking, PropertyId, TenantBooking, UserId,
};

const TABLE: &str = "tenant_bookings";
const CREATE_FUNCTION: &str = "create_tenant_booking";

/// Booking rows and the booking RPC, called with the caller's token.
#[derive(Debug, Clone)]
pub struct SupabaseBookingRepository {
    client: SupabaseClient,
}

impl SupabaseBookingRepository {
    /// Create the adapter.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    async fn list(
        &self,
        caller: &Caller,
        query: TableQuery,
    ) -> Result<Vec<TenantBooking>, BookingRepositoryError> {
        let rows: Vec<BookingRow> = self
            .client
            .select(&caller.token, &query.order("created_at", false))
            .await
            .map_err(map_error)?;
        Ok(rows.into_iter().map(TenantBooking::from).collect())
    }
}

fn map_error(error: BackendError) -> BookingRepositoryError {
    if error.is_unavailable() {
        BookingRepositoryError::connection(error.to_string())
    } else if error.is_denied() || is_constraint(&error) {
        BookingRepositoryError::rejected(error.message())
    } else {
        BookingRepositoryError::query(error.to_string())
    }
}

fn map_rpc_error(error: BackendError) -> BookingRepositoryError {
    if error.kind() == BackendErrorKind::FunctionNotFound {
        BookingRepositoryError::function_missing(CREATE_FUNCTION)
    } else {
        map_error(error)
    }
}

fn single(rows: Vec<BookingRow>, operation: &str) -> Result<TenantBooking, BookingRepositoryError> {
    rows.into_iter()
        .next()
        .map(TenantBooking::from)
        .ok_or_else(|| BookingRepositoryError::query(format!("{operation} returned no row")))
}

#[async_trait]
impl BookingRepository for SupabaseBookingRepository {
    async fn create_via_rpc(
        &self,
        caller: &Caller,
        booking: &NewBooking,
    ) -> Result<BookingId, BookingRepositoryError> {
        let created: Option<CreatedBooking> = self
            .client
            .rpc(&caller.token, CREATE_FUNCTION, &CreateBookingArgs::from(booking))
            .await
            .map_err(map_rpc_error)?;
        created.and_then(CreatedBooking::id).ok_or_else(|| {
            BookingRepositoryError::query(format!("{CREATE_FUNCTION} returned no booking id"))
        })
    }

    async fn insert(
        &self,
        caller: &Caller,
        booking: &NewBooking,
    ) -> Result<TenantBooking, BookingRepositoryError> {
        let rows: Vec<BookingRow> = self
            .client
            .insert(&caller.token, TABLE, &BookingInsert::from(booking))
            .await
            .map_err(map_error)?;
        single(rows, "insert tenant_bookings")
    }

    async fn find(
        &self,
        caller: &Caller,
        id: BookingId,
    ) -> Result<Option<TenantBooking>, BookingRepositoryError> {
        let query = TableQuery::table(TABLE).eq("id", id).limit(1);
        let rows: Vec<BookingRow> = self
            .client
            .select(&caller.token, &query)
            .await
            .map_err(map_error)?;
        Ok(rows.into_iter().next().map(TenantBooking::from))
    }

    async fn list_for_properties(
        &self,
        caller: &Caller,
        property_ids: &[PropertyId],
    ) -> Result<Vec<TenantBooking>, BookingRepositoryError> {
        if property_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.list(caller, TableQuery::table(TABLE).in_("property_id", property_ids))
            .await
    }

    async fn list_for_tenant(
        &self,
        caller: &Caller,
        tenant: UserId,
    ) -> Result<Vec<TenantBooking>, BookingRepositoryError> {
        self.list(caller, TableQuery::table(TABLE).eq("tenant_user_id", tenant))
            .await
    }

    async fn list_all(&self, caller: &Caller) -> Result<Vec<TenantBooking>, BookingRepositoryError> {
        self.list(caller, TableQuery::table(TABLE)).await
    }

    async fn update_status(
        &self,
        caller: &Caller,
        id: BookingId,
        status: BookingStatus,
    ) -> Result<TenantBooking, BookingRepositoryError> {
        let query = TableQuery::table(TABLE).eq("id", id);
        let rows: Vec<BookingRow> = self
            .client
            .update(&caller.token, &query, &BookingStatusPatch { status })
            .await
            .map_err(map_error)?;
        single(rows, "update tenant_bookings")
    }
}
