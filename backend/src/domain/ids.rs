//! Strongly typed row identifiers.
//!
//! Every table in the managed backend uses UUID primary keys. Wrapping them
//! per table stops a room id from being passed where a property id is
//! expected; on the wire they are plain hyphenated strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when an identifier string is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be a valid UUID, got `{value}`")]
pub struct IdParseError {
    /// Human-readable identifier kind, e.g. `property id`.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| IdParseError {
                        kind: $kind,
                        value: s.to_owned(),
                    })
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

define_id!(
    /// Identifier of a row in `users` (same as the auth user id).
    UserId,
    "user id"
);
define_id!(
    /// Identifier of a row in `properties`.
    PropertyId,
    "property id"
);
define_id!(
    /// Identifier of a row in `rooms`.
    RoomId,
    "room id"
);
define_id!(
    /// Identifier of a row in `tenants`.
    TenantId,
    "tenant id"
);
define_id!(
    /// Identifier of a row in `room_tenants`, i.e. one occupancy.
    RoomTenantId,
    "occupancy id"
);
define_id!(
    /// Identifier of a row in `payments`.
    PaymentId,
    "payment id"
);
define_id!(
    /// Identifier of a row in `tenant_bookings`.
    BookingId,
    "booking id"
);
define_id!(
    /// Identifier of a row in `property_managers`.
    PropertyManagerId,
    "property manager id"
);
define_id!(
    /// Identifier of a row in any trashable table.
    RecordId,
    "record id"
);
