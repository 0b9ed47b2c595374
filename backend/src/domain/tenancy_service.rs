//! Tenant registration, move-out, and occupancy listings.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::access::AccessPolicy;
use crate::domain::ports::{RoomRepository, TenantRepository};
use crate::domain::service_support::{invalid_field, map_room_error, map_tenant_error};
use crate::domain::{
    Caller, Error, NewOccupancy, NewTenant, OccupancyDetails, PropertyId, Room, RoomId,
    RoomStatus, RoomTenant, RoomTenantId, TenancyValidationError, TenantId,
};

fn validation_error(error: &TenancyValidationError) -> Error {
    invalid_field(error.field(), error.to_string())
}

/// Tenancy management.
#[derive(Clone)]
pub struct TenancyService {
    access: AccessPolicy,
    rooms: Arc<dyn RoomRepository>,
    tenants: Arc<dyn TenantRepository>,
}

impl TenancyService {
    /// Create the service.
    pub fn new(
        access: AccessPolicy,
        rooms: Arc<dyn RoomRepository>,
        tenants: Arc<dyn TenantRepository>,
    ) -> Self {
        Self {
            access,
            rooms,
            tenants,
        }
    }

    async fn accessible_room(&self, caller: &Caller, room_id: RoomId) -> Result<Room, Error> {
        let room = self
            .rooms
            .find(caller, room_id)
            .await
            .map_err(map_room_error)?
            .filter(|room| room.deleted_at.is_none())
            .ok_or_else(|| Error::not_found(format!("room {room_id} not found")))?;
        self.access
            .accessible_property(caller, room.property_id)
            .await?;
        Ok(room)
    }

    /// Register a tenant and move them into an available room.
    pub async fn register_tenant(
        &self,
        caller: &Caller,
        input: NewTenant,
        room_id: RoomId,
        move_in_date: NaiveDate,
    ) -> Result<OccupancyDetails, Error> {
        let draft = input.validate().map_err(|e| validation_error(&e))?;
        let room = self.accessible_room(caller, room_id).await?;
        if room.status != RoomStatus::Available {
            return Err(Error::conflict(format!(
                "room {} is {}",
                room.room_number, room.status
            )));
        }

        let tenant = self
            .tenants
            .insert_tenant(caller, &draft)
            .await
            .map_err(map_tenant_error)?;
        let occupancy = match self
            .tenants
            .insert_occupancy(
                caller,
                &NewOccupancy {
                    room_id,
                    tenant_id: tenant.id,
                    move_in_date,
                },
            )
            .await
        {
            Ok(occupancy) => occupancy,
            Err(error) => {
                warn!(tenant_id = %tenant.id, %room_id, %error, "occupancy insert failed");
                self.remove_tenant(caller, tenant.id).await;
                return Err(map_tenant_error(error));
            }
        };
        let room = match self
            .rooms
            .set_status(caller, room_id, RoomStatus::Occupied)
            .await
        {
            Ok(room) => room,
            Err(error) => {
                warn!(
                    occupancy_id = %occupancy.id,
                    %room_id,
                    %error,
                    "room status update failed"
                );
                self.close_occupancy(caller, &occupancy).await;
                return Err(map_room_error(error));
            }
        };
        info!(
            tenant_id = %tenant.id,
            room_id = %room_id,
            occupancy_id = %occupancy.id,
            "tenant registered"
        );
        Ok(OccupancyDetails {
            occupancy,
            tenant,
            room,
        })
    }

    // Rollback helpers for a registration that failed part-way. Failures
    // here are logged and the original error is what the caller sees.

    async fn remove_tenant(&self, caller: &Caller, tenant_id: TenantId) {
        if let Err(error) = self.tenants.delete_tenant(caller, tenant_id).await {
            warn!(%tenant_id, %error, "orphaned tenant left after failed registration");
        }
    }

    async fn close_occupancy(&self, caller: &Caller, occupancy: &RoomTenant) {
        if let Err(error) = self
            .tenants
            .end_occupancy(caller, occupancy.id, occupancy.move_in_date)
            .await
        {
            warn!(
                occupancy_id = %occupancy.id,
                room_id = %occupancy.room_id,
                %error,
                "active occupancy left on an available room"
            );
        }
    }

    /// End an occupancy and free its room.
    pub async fn move_out(
        &self,
        caller: &Caller,
        occupancy_id: RoomTenantId,
        move_out_date: NaiveDate,
    ) -> Result<RoomTenant, Error> {
        let occupancy = self
            .tenants
            .find_occupancy(caller, occupancy_id)
            .await
            .map_err(map_tenant_error)?
            .ok_or_else(|| Error::not_found(format!("occupancy {occupancy_id} not found")))?;
        if !occupancy.is_active {
            return Err(Error::conflict("tenant has already moved out"));
        }
        occupancy
            .check_move_out(move_out_date)
            .map_err(|e| validation_error(&e))?;
        self.accessible_room(caller, occupancy.room_id).await?;

        let ended = self
            .tenants
            .end_occupancy(caller, occupancy_id, move_out_date)
            .await
            .map_err(map_tenant_error)?;
        if let Err(error) = self
            .rooms
            .set_status(caller, occupancy.room_id, RoomStatus::Available)
            .await
        {
            warn!(room_id = %occupancy.room_id, %error, "occupancy ended but room status not reset");
            return Err(map_room_error(error));
        }
        info!(occupancy_id = %occupancy_id, %move_out_date, "tenant moved out");
        Ok(ended)
    }

    /// Active occupancies of a property, joined with tenant and room.
    pub async fn list_tenants(
        &self,
        caller: &Caller,
        property_id: PropertyId,
    ) -> Result<Vec<OccupancyDetails>, Error> {
        self.access.accessible_property(caller, property_id).await?;
        let rooms = self
            .rooms
            .list_for_properties(caller, &[property_id])
            .await
            .map_err(map_room_error)?;
        self.occupancies_for_rooms(caller, rooms).await
    }

    /// Join active occupancies of `rooms` with their tenants.
    pub(crate) async fn occupancies_for_rooms(
        &self,
        caller: &Caller,
        rooms: Vec<Room>,
    ) -> Result<Vec<OccupancyDetails>, Error> {
        if rooms.is_empty() {
            return Ok(Vec::new());
        }
        let room_ids: Vec<RoomId> = rooms.iter().map(|room| room.id).collect();
        let occupancies = self
            .tenants
            .list_active_occupancies(caller, &room_ids)
            .await
            .map_err(map_tenant_error)?;
        let tenant_ids: Vec<_> = occupancies.iter().map(|o| o.tenant_id).collect();
        let tenants = if tenant_ids.is_empty() {
            Vec::new()
        } else {
            self.tenants
                .find_tenants(caller, &tenant_ids)
                .await
                .map_err(map_tenant_error)?
        };

        let rooms: HashMap<_, _> = rooms.into_iter().map(|room| (room.id, room)).collect();
        let tenants: HashMap<_, _> = tenants.into_iter().map(|t| (t.id, t)).collect();
        let mut details: Vec<OccupancyDetails> = occupancies
            .into_iter()
            .filter_map(|occupancy| {
                let room = rooms.get(&occupancy.room_id)?.clone();
                let tenant = tenants.get(&occupancy.tenant_id)?.clone();
                Some(OccupancyDetails {
                    occupancy,
                    tenant,
                    room,
                })
            })
            .collect();
        details.sort_by(|a, b| a.room.room_number.cmp(&b.room.room_number));
        Ok(details)
    }
}
