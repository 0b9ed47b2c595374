//! Port for soft delete, restore, and purge across trashable tables.

use async_trait::async_trait;

use crate::domain::{Caller, RecordId, TrashRecord, TrashTable};

use super::define_port_error;

define_port_error! {
    /// Errors raised by trash repository adapters.
    pub enum TrashRepositoryError {
        /// Backend could not be reached.
        Connection { message: String } => "trash repository connection failed: {message}",
        /// Row-level security or the RPC refused the operation.
        Denied { message: String } => "trash operation denied: {message}",
        /// Query, RPC, or delete failed.
        Query { message: String } => "trash repository query failed: {message}",
    }
}

/// Trash operations backed by the `soft_delete_record` and
/// `restore_from_trash` RPCs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrashRepository: Send + Sync {
    /// Set `deleted_at` on a row.
    async fn soft_delete(
        &self,
        caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<(), TrashRepositoryError>;

    /// Clear `deleted_at` on a row.
    async fn restore(
        &self,
        caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<(), TrashRepositoryError>;

    /// Delete a row permanently.
    async fn purge(
        &self,
        caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<(), TrashRepositoryError>;

    /// Fetch one row's trash state.
    async fn find_record(
        &self,
        caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<Option<TrashRecord>, TrashRepositoryError>;

    /// Every row of `table`, trashed or not.
    async fn list_records(
        &self,
        caller: &Caller,
        table: TrashTable,
    ) -> Result<Vec<TrashRecord>, TrashRepositoryError>;
}
