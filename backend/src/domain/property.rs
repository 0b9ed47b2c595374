//! Properties, rooms, and property image uploads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PropertyId, RoomId, Rwf, UserId};

/// Storage bucket that holds property photos.
pub const PROPERTY_IMAGES_BUCKET: &str = "property-images";

/// Largest accepted image upload in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Content types accepted for property photos.
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Validation failures for property and room input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertyValidationError {
    /// Property name is blank.
    #[error("property name must not be empty")]
    EmptyName,
    /// Address is blank.
    #[error("property address must not be empty")]
    EmptyAddress,
    /// A price bound is negative.
    #[error("price range values must be zero or greater")]
    NegativePrice,
    /// `min` exceeds `max`.
    #[error("price range minimum {min} exceeds maximum {max}")]
    InvertedPriceRange {
        /// Lower bound supplied.
        min: Rwf,
        /// Upper bound supplied.
        max: Rwf,
    },
    /// Room number is blank.
    #[error("room number must not be empty")]
    EmptyRoomNumber,
    /// Rent is zero or negative.
    #[error("rent amount must be greater than zero")]
    NonPositiveRent,
    /// Upload content type is not an accepted image type.
    #[error("unsupported image type `{0}`; use JPEG, PNG, or WebP")]
    UnsupportedImageType(String),
    /// Upload is empty or larger than [`MAX_IMAGE_BYTES`].
    #[error("image must be between 1 byte and 5 MiB, got {0} bytes")]
    ImageSize(usize),
}

impl PropertyValidationError {
    /// Request field the failure refers to, for error details.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyAddress => "address",
            Self::NegativePrice | Self::InvertedPriceRange { .. } => "priceRange",
            Self::EmptyRoomNumber => "roomNumber",
            Self::NonPositiveRent => "rentAmount",
            Self::UnsupportedImageType(_) => "contentType",
            Self::ImageSize(_) => "body",
        }
    }
}

/// A row in `properties`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Primary key.
    pub id: PropertyId,
    /// Owning landlord.
    pub landlord_id: UserId,
    /// Display name.
    pub name: String,
    /// Street address or neighbourhood.
    pub address: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Kind of property, e.g. `apartment` or `hostel`.
    pub property_type: String,
    /// Cheapest room rent advertised.
    pub price_range_min: Rwf,
    /// Most expensive room rent advertised.
    pub price_range_max: Rwf,
    /// Public URLs of uploaded photos.
    pub image_urls: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Property {
    /// True when the property has not been moved to the trash.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Price range for listings, e.g. `RWF 50,000 - RWF 80,000`.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use icumbi::domain::{Property, PropertyId, Rwf, UserId};
    ///
    /// let property = Property {
    ///     id: PropertyId::random(),
    ///     landlord_id: UserId::random(),
    ///     name: "Kacyiru Heights".into(),
    ///     address: "KG 7 Ave".into(),
    ///     description: None,
    ///     property_type: "apartment".into(),
    ///     price_range_min: Rwf::new(50_000),
    ///     price_range_max: Rwf::new(80_000),
    ///     image_urls: vec![],
    ///     created_at: Utc::now(),
    ///     deleted_at: None,
    /// };
    /// assert_eq!(property.display_price_range(), "RWF 50,000 - RWF 80,000");
    /// ```
    #[must_use]
    pub fn display_price_range(&self) -> String {
        if self.price_range_min == self.price_range_max {
            self.price_range_min.formatted()
        } else {
            format!(
                "{} - {}",
                self.price_range_min.formatted(),
                self.price_range_max.formatted()
            )
        }
    }
}

fn check_price_range(min: Rwf, max: Rwf) -> Result<(), PropertyValidationError> {
    if min.amount() < 0 || max.amount() < 0 {
        return Err(PropertyValidationError::NegativePrice);
    }
    if min > max {
        return Err(PropertyValidationError::InvertedPriceRange { min, max });
    }
    Ok(())
}

fn required(value: &str, error: PropertyValidationError) -> Result<String, PropertyValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(error)
    } else {
        Ok(trimmed.to_owned())
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// Input for creating a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Optional description.
    pub description: Option<String>,
    /// Kind of property.
    pub property_type: String,
    /// Lower advertised rent.
    pub price_range_min: Rwf,
    /// Upper advertised rent.
    pub price_range_max: Rwf,
}

impl NewProperty {
    /// Trim text fields and check the price range.
    pub fn validated(self) -> Result<Self, PropertyValidationError> {
        let name = required(&self.name, PropertyValidationError::EmptyName)?;
        let address = required(&self.address, PropertyValidationError::EmptyAddress)?;
        check_price_range(self.price_range_min, self.price_range_max)?;
        let property_type = optional_text(Some(self.property_type))
            .unwrap_or_else(|| "apartment".to_owned())
            .to_lowercase();
        Ok(Self {
            name,
            address,
            description: optional_text(self.description),
            property_type,
            price_range_min: self.price_range_min,
            price_range_max: self.price_range_max,
        })
    }
}

/// Partial update for a property; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPatch {
    /// New name.
    pub name: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New description; an empty string clears it.
    pub description: Option<String>,
    /// New property type.
    pub property_type: Option<String>,
    /// New lower bound.
    pub price_range_min: Option<Rwf>,
    /// New upper bound.
    pub price_range_max: Option<Rwf>,
}

impl PropertyPatch {
    /// Merge the patch into `property`, re-validating the result.
    pub fn apply(self, property: &Property) -> Result<Property, PropertyValidationError> {
        let mut merged = property.clone();
        if let Some(name) = self.name {
            merged.name = required(&name, PropertyValidationError::EmptyName)?;
        }
        if let Some(address) = self.address {
            merged.address = required(&address, PropertyValidationError::EmptyAddress)?;
        }
        if let Some(description) = self.description {
            merged.description = optional_text(Some(description));
        }
        if let Some(kind) = optional_text(self.property_type) {
            merged.property_type = kind.to_lowercase();
        }
        merged.price_range_min = self.price_range_min.unwrap_or(merged.price_range_min);
        merged.price_range_max = self.price_range_max.unwrap_or(merged.price_range_max);
        check_price_range(merged.price_range_min, merged.price_range_max)?;
        Ok(merged)
    }
}

/// Occupancy state of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// Free to let.
    Available,
    /// Has an active tenant.
    Occupied,
    /// Temporarily unavailable.
    Maintenance,
}

impl RoomStatus {
    /// Database string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown room status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown room status: {0}")]
pub struct ParseRoomStatusError(pub String);

impl FromStr for RoomStatus {
    type Err = ParseRoomStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "available" => Ok(Self::Available),
            "occupied" => Ok(Self::Occupied),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(ParseRoomStatusError(other.to_owned())),
        }
    }
}

/// A row in `rooms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Primary key.
    pub id: RoomId,
    /// Parent property.
    pub property_id: PropertyId,
    /// Label shown to tenants, e.g. `A3`.
    pub room_number: String,
    /// Monthly rent.
    pub rent_amount: Rwf,
    /// Current occupancy state.
    pub status: RoomStatus,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for creating a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    /// Parent property.
    pub property_id: PropertyId,
    /// Room label.
    pub room_number: String,
    /// Monthly rent.
    pub rent_amount: Rwf,
}

impl NewRoom {
    /// Trim the room number and require a positive rent.
    pub fn validated(self) -> Result<Self, PropertyValidationError> {
        let room_number = required(&self.room_number, PropertyValidationError::EmptyRoomNumber)?;
        if !self.rent_amount.is_positive() {
            return Err(PropertyValidationError::NonPositiveRent);
        }
        Ok(Self {
            property_id: self.property_id,
            room_number,
            rent_amount: self.rent_amount,
        })
    }
}

/// A photo waiting to be stored for a property.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Name supplied by the client.
    pub file_name: String,
    /// MIME type supplied by the client.
    pub content_type: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Check the content type and size limits.
    pub fn validate(&self) -> Result<(), PropertyValidationError> {
        let content_type = self.content_type.trim().to_ascii_lowercase();
        if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err(PropertyValidationError::UnsupportedImageType(
                self.content_type.clone(),
            ));
        }
        if self.bytes.is_empty() || self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(PropertyValidationError::ImageSize(self.bytes.len()));
        }
        Ok(())
    }

    /// Object path `{property_id}/{unique}-{sanitised file name}`.
    #[must_use]
    pub fn object_path(&self, property_id: PropertyId, unique: Uuid) -> String {
        format!(
            "{property_id}/{unique}-{}",
            sanitise_file_name(&self.file_name)
        )
    }
}

/// Reduce a client file name to `[a-z0-9._-]`, defaulting to `image`.
#[must_use]
pub fn sanitise_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(|ch| ch == '.' || ch == '_');
    if cleaned.is_empty() {
        "image".to_owned()
    } else {
        cleaned.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn property() -> Property {
        Property {
            id: PropertyId::random(),
            landlord_id: UserId::random(),
            name: "Kacyiru Heights".to_owned(),
            address: "KG 7 Ave".to_owned(),
            description: None,
            property_type: "apartment".to_owned(),
            price_range_min: Rwf::new(50_000),
            price_range_max: Rwf::new(80_000),
            image_urls: Vec::new(),
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn new_property(min: i64, max: i64) -> NewProperty {
        NewProperty {
            name: "  Nyamirambo Flats ".to_owned(),
            address: "KN 2 St".to_owned(),
            description: Some("   ".to_owned()),
            property_type: String::new(),
            price_range_min: Rwf::new(min),
            price_range_max: Rwf::new(max),
        }
    }

    #[rstest]
    fn price_range_shows_both_bounds(property: Property) {
        assert_eq!(property.display_price_range(), "RWF 50,000 - RWF 80,000");
    }

    #[rstest]
    fn price_range_collapses_equal_bounds(mut property: Property) {
        property.price_range_max = property.price_range_min;
        assert_eq!(property.display_price_range(), "RWF 50,000");
    }

    #[test]
    fn new_property_is_normalised() {
        let valid = new_property(40_000, 60_000).validated().expect("valid");
        assert_eq!(valid.name, "Nyamirambo Flats");
        assert_eq!(valid.description, None);
        assert_eq!(valid.property_type, "apartment");
    }

    #[rstest]
    #[case(-1, 10, PropertyValidationError::NegativePrice)]
    #[case(90_000, 60_000, PropertyValidationError::InvertedPriceRange {
        min: Rwf::new(90_000),
        max: Rwf::new(60_000),
    })]
    fn new_property_rejects_bad_ranges(
        #[case] min: i64,
        #[case] max: i64,
        #[case] expected: PropertyValidationError,
    ) {
        assert_eq!(new_property(min, max).validated(), Err(expected));
    }

    #[rstest]
    fn patch_revalidates_merged_range(property: Property) {
        let patch = PropertyPatch {
            price_range_min: Some(Rwf::new(100_000)),
            ..PropertyPatch::default()
        };
        let err = patch.apply(&property).expect_err("min above existing max");
        assert_eq!(err.field(), "priceRange");
    }

    #[rstest]
    fn patch_updates_only_supplied_fields(property: Property) {
        let patch = PropertyPatch {
            name: Some("Remera Court".to_owned()),
            description: Some("Quiet street".to_owned()),
            ..PropertyPatch::default()
        };
        let merged = patch.apply(&property).expect("valid patch");
        assert_eq!(merged.name, "Remera Court");
        assert_eq!(merged.description.as_deref(), Some("Quiet street"));
        assert_eq!(merged.address, property.address);
    }

    #[rstest]
    #[case(0)]
    #[case(-5_000)]
    fn room_requires_positive_rent(#[case] rent: i64) {
        let room = NewRoom {
            property_id: PropertyId::random(),
            room_number: "A1".to_owned(),
            rent_amount: Rwf::new(rent),
        };
        assert_eq!(room.validated(), Err(PropertyValidationError::NonPositiveRent));
    }

    #[rstest]
    #[case("image/png", 10, true)]
    #[case("IMAGE/JPEG", 10, true)]
    #[case("image/gif", 10, false)]
    #[case("image/webp", 0, false)]
    #[case("image/webp", MAX_IMAGE_BYTES + 1, false)]
    fn image_limits(#[case] content_type: &str, #[case] len: usize, #[case] ok: bool) {
        let upload = ImageUpload {
            file_name: "room.png".to_owned(),
            content_type: content_type.to_owned(),
            bytes: vec![0; len],
        };
        assert_eq!(upload.validate().is_ok(), ok);
    }

    #[rstest]
    #[case("Front View.JPG", "front_view.jpg")]
    #[case("../../etc/passwd", "passwd")]
    #[case("...", "image")]
    #[case("ifoto y'icyumba.png", "ifoto_y_icyumba.png")]
    fn sanitises_file_names(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(sanitise_file_name(raw), expected);
    }

    #[test]
    fn object_path_is_scoped_by_property() {
        let property_id = PropertyId::from_uuid(Uuid::nil());
        let upload = ImageUpload {
            file_name: "a.png".to_owned(),
            content_type: "image/png".to_owned(),
            bytes: vec![1],
        };
        let path = upload.object_path(property_id, Uuid::nil());
        assert_eq!(
            path,
            "00000000-0000-0000-0000-000000000000/00000000-0000-0000-0000-000000000000-a.png"
        );
    }
}
