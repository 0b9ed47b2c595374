//! Port for the `rooms` table.

use async_trait::async_trait;

use crate::domain::{Caller, NewRoom, PropertyId, Room, RoomId, RoomStatus};

use super::define_port_error;

define_port_error! {
    /// Errors raised by room repository adapters.
    pub enum RoomRepositoryError {
        /// Backend could not be reached.
        Connection { message: String } => "room repository connection failed: {message}",
        /// Row-level security refused the operation.
        Denied { message: String } => "room repository access denied: {message}",
        /// Query or mutation failed.
        Query { message: String } => "room repository query failed: {message}",
    }
}

/// Reads and writes room rows on behalf of a caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Active rooms belonging to any of `property_ids`.
    async fn list_for_properties(
        &self,
        caller: &Caller,
        property_ids: &[PropertyId],
    ) -> Result<Vec<Room>, RoomRepositoryError>;

    /// Fetch one room.
    async fn find(&self, caller: &Caller, id: RoomId) -> Result<Option<Room>, RoomRepositoryError>;

    /// Insert a room.
    async fn insert(&self, caller: &Caller, room: &NewRoom) -> Result<Room, RoomRepositoryError>;

    /// Change a room's status.
    async fn set_status(
        &self,
        caller: &Caller,
        id: RoomId,
        status: RoomStatus,
    ) -> Result<Room, RoomRepositoryError>;
}
