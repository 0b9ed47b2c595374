//! Property, room, and property image use cases.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::access::AccessPolicy;
use crate::domain::ports::{ObjectStorage, PropertyRepository, RoomRepository};
use crate::domain::service_support::{
    invalid_field, map_property_error, map_room_error, map_storage_error,
};
use crate::domain::{
    Caller, Error, ImageUpload, NewProperty, NewRoom, PROPERTY_IMAGES_BUCKET, Property,
    PropertyId, PropertyPatch, PropertyValidationError, Room, RoomId, RoomStatus, UserRole,
};

fn validation_error(error: &PropertyValidationError) -> Error {
    invalid_field(error.field(), error.to_string())
}

/// Property and room management.
#[derive(Clone)]
pub struct PropertyService {
    access: AccessPolicy,
    properties: Arc<dyn PropertyRepository>,
    rooms: Arc<dyn RoomRepository>,
    storage: Arc<dyn ObjectStorage>,
}

impl PropertyService {
    /// Create the service.
    pub fn new(
        access: AccessPolicy,
        properties: Arc<dyn PropertyRepository>,
        rooms: Arc<dyn RoomRepository>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            access,
            properties,
            rooms,
            storage,
        }
    }

    /// Active properties visible to the caller. Tenants are refused.
    pub async fn list_properties(&self, caller: &Caller) -> Result<Vec<Property>, Error> {
        self.access.visible_properties(caller).await
    }

    /// One property the caller may manage.
    pub async fn get_property(&self, caller: &Caller, id: PropertyId) -> Result<Property, Error> {
        self.access.accessible_property(caller, id).await
    }

    /// Create a property owned by the caller.
    pub async fn create_property(
        &self,
        caller: &Caller,
        input: NewProperty,
    ) -> Result<Property, Error> {
        caller.require_role(&[UserRole::Landlord, UserRole::Admin])?;
        let input = input.validated().map_err(|e| validation_error(&e))?;
        let property = self
            .properties
            .insert(caller, caller.id(), &input)
            .await
            .map_err(map_property_error)?;
        info!(property_id = %property.id, landlord_id = %property.landlord_id, "property created");
        Ok(property)
    }

    /// Apply a partial update, re-validating the merged price range.
    pub async fn update_property(
        &self,
        caller: &Caller,
        id: PropertyId,
        patch: PropertyPatch,
    ) -> Result<Property, Error> {
        let current = self.access.accessible_property(caller, id).await?;
        let merged = patch.apply(&current).map_err(|e| validation_error(&e))?;
        let saved = self
            .properties
            .update(caller, &merged)
            .await
            .map_err(map_property_error)?;
        info!(property_id = %id, "property updated");
        Ok(saved)
    }

    /// Store a photo and append its public URL to the property.
    pub async fn upload_property_image(
        &self,
        caller: &Caller,
        id: PropertyId,
        upload: ImageUpload,
    ) -> Result<Property, Error> {
        upload.validate().map_err(|e| validation_error(&e))?;
        let mut property = self.access.accessible_property(caller, id).await?;
        let path = upload.object_path(id, Uuid::new_v4());
        let content_type = upload.content_type.trim().to_ascii_lowercase();
        self.storage
            .upload(
                caller,
                PROPERTY_IMAGES_BUCKET,
                &path,
                upload.bytes,
                &content_type,
            )
            .await
            .map_err(map_storage_error)?;
        let url = self.storage.public_url(PROPERTY_IMAGES_BUCKET, &path);
        property.image_urls.push(url);
        let saved = self
            .properties
            .update(caller, &property)
            .await
            .map_err(map_property_error)?;
        info!(property_id = %id, object_path = %path, "property image stored");
        Ok(saved)
    }

    /// Active rooms of a property.
    pub async fn list_rooms(
        &self,
        caller: &Caller,
        property_id: PropertyId,
    ) -> Result<Vec<Room>, Error> {
        self.access.accessible_property(caller, property_id).await?;
        let mut rooms = self
            .rooms
            .list_for_properties(caller, &[property_id])
            .await
            .map_err(map_room_error)?;
        rooms.sort_by(|a, b| a.room_number.cmp(&b.room_number));
        Ok(rooms)
    }

    /// Add a room to a property.
    pub async fn create_room(&self, caller: &Caller, input: NewRoom) -> Result<Room, Error> {
        let input = input.validated().map_err(|e| validation_error(&e))?;
        self.access
            .accessible_property(caller, input.property_id)
            .await?;
        let room = self
            .rooms
            .insert(caller, &input)
            .await
            .map_err(map_room_error)?;
        info!(room_id = %room.id, property_id = %room.property_id, "room created");
        Ok(room)
    }

    /// Load a room and check access to its property.
    pub async fn accessible_room(&self, caller: &Caller, room_id: RoomId) -> Result<Room, Error> {
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

    /// Change a room's status.
    pub async fn update_room_status(
        &self,
        caller: &Caller,
        room_id: RoomId,
        status: RoomStatus,
    ) -> Result<Room, Error> {
        self.accessible_room(caller, room_id).await?;
        let room = self
            .rooms
            .set_status(caller, room_id, status)
            .await
            .map_err(map_room_error)?;
        info!(room_id = %room_id, status = %status, "room status changed");
        Ok(room)
    }
}
