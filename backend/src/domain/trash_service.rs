//! Admin trash: soft delete, restore, purge, and the partitioned view.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::ports::TrashRepository;
use crate::domain::service_support::map_trash_error;
use crate::domain::{Caller, Error, RecordId, TrashRecord, TrashTable, TrashView, UserRole};

/// Admin-only trash operations.
#[derive(Clone)]
pub struct TrashService {
    trash: Arc<dyn TrashRepository>,
}

impl TrashService {
    /// Create the service.
    pub fn new(trash: Arc<dyn TrashRepository>) -> Self {
        Self { trash }
    }

    async fn record(
        &self,
        caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<TrashRecord, Error> {
        self.trash
            .find_record(caller, table, id)
            .await
            .map_err(map_trash_error)?
            .ok_or_else(|| Error::not_found(format!("{table} record {id} not found")))
    }

    /// Soft-delete a live record; returns the new `deleted_at`.
    pub async fn move_to_trash(
        &self,
        caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<Option<DateTime<Utc>>, Error> {
        caller.require_role(&[UserRole::Admin])?;
        if self.record(caller, table, id).await?.is_trashed() {
            return Err(Error::conflict(format!("{table} record {id} is already in the trash")));
        }
        self.trash
            .soft_delete(caller, table, id)
            .await
            .map_err(map_trash_error)?;
        let updated = self.record(caller, table, id).await?;
        info!(%table, record_id = %id, "record moved to trash");
        Ok(updated.deleted_at)
    }

    /// Restore a trashed record; returns the new `deleted_at` (normally `None`).
    pub async fn restore(
        &self,
        caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<Option<DateTime<Utc>>, Error> {
        caller.require_role(&[UserRole::Admin])?;
        if !self.record(caller, table, id).await?.is_trashed() {
            return Err(Error::conflict(format!("{table} record {id} is not in the trash")));
        }
        self.trash
            .restore(caller, table, id)
            .await
            .map_err(map_trash_error)?;
        let updated = self.record(caller, table, id).await?;
        info!(%table, record_id = %id, "record restored from trash");
        Ok(updated.deleted_at)
    }

    /// Permanently delete a record that is already in the trash.
    pub async fn purge_permanently(
        &self,
        caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<(), Error> {
        caller.require_role(&[UserRole::Admin])?;
        if !self.record(caller, table, id).await?.is_trashed() {
            return Err(Error::conflict(format!(
                "{table} record {id} must be moved to the trash before purging"
            )));
        }
        self.trash
            .purge(caller, table, id)
            .await
            .map_err(map_trash_error)?;
        info!(%table, record_id = %id, "record purged");
        Ok(())
    }

    /// Records of `table` split into live and trashed.
    pub async fn trash_view(&self, caller: &Caller, table: TrashTable) -> Result<TrashView, Error> {
        caller.require_role(&[UserRole::Admin])?;
        let records = self
            .trash
            .list_records(caller, table)
            .await
            .map_err(map_trash_error)?;
        Ok(TrashView::partition(records))
    }

    /// Trashed row count per table.
    pub(crate) async fn trashed_counts(
        &self,
        caller: &Caller,
    ) -> Result<Vec<(TrashTable, usize)>, Error> {
        let mut counts = Vec::with_capacity(TrashTable::ALL.len());
        for table in TrashTable::ALL {
            let view = self.trash_view(caller, table).await?;
            counts.push((table, view.trashed.len()));
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::fixtures::caller;
    use crate::domain::ports::MockTrashRepository;
    use mockall::Sequence;
    use rstest::rstest;

    fn record(id: RecordId, trashed: bool) -> TrashRecord {
        TrashRecord {
            id,
            label: "Room B4".to_owned(),
            deleted_at: trashed.then(Utc::now),
        }
    }

    #[rstest]
    #[case(UserRole::Landlord)]
    #[case(UserRole::Manager)]
    #[case(UserRole::Tenant)]
    #[tokio::test]
    async fn non_admins_are_forbidden(#[case] role: UserRole) {
        let mut trash = MockTrashRepository::new();
        trash.expect_find_record().never();
        let err = TrashService::new(Arc::new(trash))
            .move_to_trash(&caller(role), TrashTable::Rooms, RecordId::random())
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn soft_delete_then_restore_clears_deleted_at() {
        let id = RecordId::random();
        let mut seq = Sequence::new();
        let mut trash = MockTrashRepository::new();
        trash
            .expect_find_record()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(move |_, _, _| Ok(Some(record(id, false))));
        trash
            .expect_soft_delete()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_, _, _| Ok(()));
        trash
            .expect_find_record()
            .times(2)
            .in_sequence(&mut seq)
            .returning(move |_, _, _| Ok(Some(record(id, true))));
        trash
            .expect_restore()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_, _, _| Ok(()));
        trash
            .expect_find_record()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(move |_, _, _| Ok(Some(record(id, false))));

        let service = TrashService::new(Arc::new(trash));
        let admin = caller(UserRole::Admin);
        let deleted = service
            .move_to_trash(&admin, TrashTable::Rooms, id)
            .await
            .expect("trashed");
        assert!(deleted.is_some());
        let restored = service
            .restore(&admin, TrashTable::Rooms, id)
            .await
            .expect("restored");
        assert!(restored.is_none());
    }

    #[rstest]
    #[case(true, "trash")]
    #[case(false, "restore")]
    #[tokio::test]
    async fn wrong_state_is_a_conflict(#[case] trashed: bool, #[case] action: &str) {
        let id = RecordId::random();
        let mut trash = MockTrashRepository::new();
        trash
            .expect_find_record()
            .return_once(move |_, _, _| Ok(Some(record(id, trashed))));
        trash.expect_soft_delete().never();
        trash.expect_restore().never();
        let service = TrashService::new(Arc::new(trash));
        let admin = caller(UserRole::Admin);
        let result = if action == "trash" {
            service.move_to_trash(&admin, TrashTable::Payments, id).await
        } else {
            service.restore(&admin, TrashTable::Payments, id).await
        };
        assert_eq!(result.expect_err("conflict").code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn unknown_record_is_not_found() {
        let mut trash = MockTrashRepository::new();
        trash.expect_find_record().return_once(|_, _, _| Ok(None));
        let err = TrashService::new(Arc::new(trash))
            .restore(&caller(UserRole::Admin), TrashTable::Tenants, RecordId::random())
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn purge_requires_trashed_record() {
        let id = RecordId::random();
        let mut trash = MockTrashRepository::new();
        trash
            .expect_find_record()
            .return_once(move |_, _, _| Ok(Some(record(id, false))));
        trash.expect_purge().never();
        let err = TrashService::new(Arc::new(trash))
            .purge_permanently(&caller(UserRole::Admin), TrashTable::Properties, id)
            .await
            .expect_err("conflict");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }
}
