//! `TrashRepository` adapter over the `soft_delete_record` and
//! `restore_from_trash` RPCs plus raw deletes for purge.

use async_trait::async_trait;
use serde_json::Value;

use super::client::SupabaseClient;
use super::dto::{TrashArgs, TrashRow, trash_select};
use super::error::BackendError;
use super::error_mapping::map_basic_backend_error;
use super::query::TableQuery;
use crate::domain::ports::{TrashRepository, TrashRepositoryError};
use crate::domain::{Caller, RecordId, TrashRecord, TrashTable};

const SOFT_DELETE_FUNCTION: &str = "soft_delete_record";
const RESTORE_FUNCTION: &str = "restore_from_trash";

/// Trash operations called with the caller's token.
#[derive(Debug, Clone)]
pub struct SupabaseTrashRepository {
    client: SupabaseClient,
}

impl SupabaseTrashRepository {
    /// Create the adapter.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    async fn call(
        &self,
        caller: &Caller,
        function: &str,
        table: TrashTable,
        id: RecordId,
    ) -> Result<(), TrashRepositoryError> {
        let _: Value = self
            .client
            .rpc(&caller.token, function, &TrashArgs::new(table, id))
            .await
            .map_err(map_error)?;
        Ok(())
    }
}

fn map_error(error: BackendError) -> TrashRepositoryError {
    map_basic_backend_error(
        error,
        TrashRepositoryError::connection,
        TrashRepositoryError::denied,
        TrashRepositoryError::query,
    )
}

fn records_query(table: TrashTable) -> TableQuery {
    TableQuery::table(table.as_str()).select(trash_select(table))
}

#[async_trait]
impl TrashRepository for SupabaseTrashRepository {
    async fn soft_delete(
        &self,
        caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<(), TrashRepositoryError> {
        self.call(caller, SOFT_DELETE_FUNCTION, table, id).await
    }

    async fn restore(
        &self,
        caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<(), TrashRepositoryError> {
        self.call(caller, RESTORE_FUNCTION, table, id).await
    }

    async fn purge(
        &self,
        caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<(), TrashRepositoryError> {
        let query = TableQuery::table(table.as_str()).eq("id", id);
        self.client
            .delete(&caller.token, &query)
            .await
            .map_err(map_error)
    }

    async fn find_record(
        &self,
        caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<Option<TrashRecord>, TrashRepositoryError> {
        let query = records_query(table).eq("id", id).limit(1);
        let rows: Vec<TrashRow> = self
            .client
            .select(&caller.token, &query)
            .await
            .map_err(map_error)?;
        Ok(rows.into_iter().next().map(|row| row.into_record(table)))
    }

    async fn list_records(
        &self,
        caller: &Caller,
        table: TrashTable,
    ) -> Result<Vec<TrashRecord>, TrashRepositoryError> {
        let rows: Vec<TrashRow> = self
            .client
            .select(&caller.token, &records_query(table))
            .await
            .map_err(map_error)?;
        Ok(rows.into_iter().map(|row| row.into_record(table)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TrashTable::Properties, "id,deleted_at,name")]
    #[case(TrashTable::TenantBookings, "id,deleted_at,full_name")]
    #[case(TrashTable::Payments, "id,deleted_at,amount,payment_date")]
    fn records_select_their_label_columns(#[case] table: TrashTable, #[case] select: &str) {
        let params = records_query(table).params();
        assert_eq!(params, vec![("select".to_owned(), select.to_owned())]);
    }

    #[test]
    fn rpc_arguments_name_the_table() {
        let id = RecordId::random();
        let args = serde_json::to_value(TrashArgs::new(TrashTable::TenantBookings, id))
            .expect("serialises");
        assert_eq!(
            args,
            serde_json::json!({ "table_name": "tenant_bookings", "record_id": id.to_string() })
        );
    }
}
