use super::*;
use crate::domain::{
    AccessToken, AuthUser, Caller, RecordId, TrashRecord, TrashTable, UserId, UserRole,
};
use actix_rt::System;
use async_trait::async_trait;
use chrono::Utc;
use rstest::{fixture, rstest};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct InMemoryTrash {
    rows: Mutex<HashMap<(TrashTable, RecordId), TrashRecord>>,
}

impl InMemoryTrash {
    fn with(table: TrashTable, record: TrashRecord) -> Self {
        let repo = Self::default();
        repo.rows
            .lock()
            .expect("rows poisoned")
            .insert((table, record.id), record);
        repo
    }

    fn set_deleted(
        &self,
        table: TrashTable,
        id: RecordId,
        trashed: bool,
    ) -> Result<(), TrashRepositoryError> {
        let mut guard = self.rows.lock().expect("rows poisoned");
        let row = guard
            .get_mut(&(table, id))
            .ok_or_else(|| TrashRepositoryError::query("record not found"))?;
        row.deleted_at = trashed.then(Utc::now);
        Ok(())
    }
}

#[async_trait]
impl TrashRepository for InMemoryTrash {
    async fn soft_delete(
        &self,
        _caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<(), TrashRepositoryError> {
        self.set_deleted(table, id, true)
    }

    async fn restore(
        &self,
        _caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<(), TrashRepositoryError> {
        self.set_deleted(table, id, false)
    }

    async fn purge(
        &self,
        _caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<(), TrashRepositoryError> {
        self.rows.lock().expect("rows poisoned").remove(&(table, id));
        Ok(())
    }

    async fn find_record(
        &self,
        _caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<Option<TrashRecord>, TrashRepositoryError> {
        Ok(self.rows.lock().expect("rows poisoned").get(&(table, id)).cloned())
    }

    async fn list_records(
        &self,
        _caller: &Caller,
        table: TrashTable,
    ) -> Result<Vec<TrashRecord>, TrashRepositoryError> {
        let guard = self.rows.lock().expect("rows poisoned");
        Ok(guard
            .iter()
            .filter(|((t, _), _)| *t == table)
            .map(|(_, record)| record.clone())
            .collect())
    }
}

#[fixture]
fn admin() -> Caller {
    Caller::new(
        AuthUser {
            id: UserId::random(),
            email: None,
            full_name: None,
            role: UserRole::Admin,
        },
        AccessToken::new("admin-jwt").expect("token"),
    )
}

#[rstest]
fn trash_round_trip_clears_deleted_at(admin: Caller) {
    let record = TrashRecord {
        id: RecordId::random(),
        label: "Room A1".to_owned(),
        deleted_at: None,
    };
    let id = record.id;
    let repo = InMemoryTrash::with(TrashTable::Rooms, record);

    System::new().block_on(async move {
        repo.soft_delete(&admin, TrashTable::Rooms, id)
            .await
            .expect("soft delete");
        let trashed = repo
            .find_record(&admin, TrashTable::Rooms, id)
            .await
            .expect("lookup")
            .expect("present");
        assert!(trashed.is_trashed());

        repo.restore(&admin, TrashTable::Rooms, id)
            .await
            .expect("restore");
        let restored = repo
            .list_records(&admin, TrashTable::Rooms)
            .await
            .expect("list");
        assert_eq!(restored.len(), 1);
        assert!(restored.iter().all(|r| r.deleted_at.is_none()));
    });
}

#[test]
fn port_errors_format_their_context() {
    assert_eq!(
        BookingRepositoryError::function_missing("create_tenant_booking").to_string(),
        "backend function `create_tenant_booking` is not deployed"
    );
    assert_eq!(
        InvitationError::status(502_u16, "bad gateway").to_string(),
        "invitation endpoint returned 502: bad gateway"
    );
}

#[test]
fn property_scope_compares_by_value() {
    let landlord = UserId::random();
    assert_eq!(
        PropertyScope::Landlord(landlord),
        PropertyScope::Landlord(landlord)
    );
    assert_ne!(PropertyScope::All, PropertyScope::Ids(Vec::new()));
}
