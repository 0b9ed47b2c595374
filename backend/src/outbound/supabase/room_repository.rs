//! PostgREST-backed `RoomRepository` adapter.

use async_trait::async_trait;

use super::client::SupabaseClient;
use super::dto::{RoomInsert, RoomRow, RoomStatusPatch};
use super::error::{BackendError, BackendErrorKind};
use super::error_mapping::map_basic_backend_error;
use super::query::TableQuery;
use crate::domain::ports::{RoomRepository, RoomRepositoryError};
use crate::domain::{Caller, NewRoom, PropertyId, Room, RoomId, RoomStatus};

const TABLE: &str = "rooms";

/// Room rows read and written with the caller's token.
#[derive(Debug, Clone)]
pub struct SupabaseRoomRepository {
    client: SupabaseClient,
}

impl SupabaseRoomRepository {
    /// Create the adapter.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

fn map_error(error: BackendError) -> RoomRepositoryError {
    map_basic_backend_error(
        error,
        RoomRepositoryError::connection,
        RoomRepositoryError::denied,
        RoomRepositoryError::query,
    )
}

fn single(rows: Vec<RoomRow>, operation: &str) -> Result<Room, RoomRepositoryError> {
    rows.into_iter().next().map(Room::from).ok_or_else(|| {
        map_error(BackendError::new(
            BackendErrorKind::Decode,
            operation,
            "no row returned",
        ))
    })
}

fn rooms_query(property_ids: &[PropertyId]) -> TableQuery {
    TableQuery::table(TABLE)
        .in_("property_id", property_ids)
        .is_null("deleted_at")
        .order("room_number", true)
}

#[async_trait]
impl RoomRepository for SupabaseRoomRepository {
    async fn list_for_properties(
        &self,
        caller: &Caller,
        property_ids: &[PropertyId],
    ) -> Result<Vec<Room>, RoomRepositoryError> {
        if property_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<RoomRow> = self
            .client
            .select(&caller.token, &rooms_query(property_ids))
            .await
            .map_err(map_error)?;
        Ok(rows.into_iter().map(Room::from).collect())
    }

    async fn find(&self, caller: &Caller, id: RoomId) -> Result<Option<Room>, RoomRepositoryError> {
        let query = TableQuery::table(TABLE).eq("id", id).limit(1);
        let rows: Vec<RoomRow> = self
            .client
            .select(&caller.token, &query)
            .await
            .map_err(map_error)?;
        Ok(rows.into_iter().next().map(Room::from))
    }

    async fn insert(&self, caller: &Caller, room: &NewRoom) -> Result<Room, RoomRepositoryError> {
        let rows: Vec<RoomRow> = self
            .client
            .insert(&caller.token, TABLE, &RoomInsert::from(room))
            .await
            .map_err(map_error)?;
        single(rows, "insert rooms")
    }

    async fn set_status(
        &self,
        caller: &Caller,
        id: RoomId,
        status: RoomStatus,
    ) -> Result<Room, RoomRepositoryError> {
        let query = TableQuery::table(TABLE).eq("id", id);
        let rows: Vec<RoomRow> = self
            .client
            .update(&caller.token, &query, &RoomStatusPatch { status })
            .await
            .map_err(map_error)?;
        single(rows, "update rooms")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooms_are_listed_per_property_in_number_order() {
        let property = PropertyId::random();
        let params = rooms_query(&[property]).params();
        assert_eq!(
            params,
            vec![
                ("property_id".to_owned(), format!("in.(\"{property}\")")),
                ("deleted_at".to_owned(), "is.null".to_owned()),
                ("order".to_owned(), "room_number.asc".to_owned()),
            ]
        );
    }

    #[test]
    fn forbidden_updates_are_denied() {
        let error = map_error(BackendError::new(
            BackendErrorKind::Forbidden,
            "update rooms",
            "row-level security",
        ));
        assert_eq!(error, RoomRepositoryError::denied("row-level security"));
    }
}
