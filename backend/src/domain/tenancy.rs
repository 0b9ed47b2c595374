//! Tenants and their room occupancies.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{
    EmailAddress, EmailValidationError, PhoneNumber, PhoneValidationError, Room, RoomId,
    RoomTenantId, TenantId,
};

/// Validation failures for tenant input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TenancyValidationError {
    /// Full name is blank.
    #[error("tenant full name must not be empty")]
    EmptyName,
    /// Phone number failed validation.
    #[error(transparent)]
    Phone(#[from] PhoneValidationError),
    /// Email failed validation.
    #[error(transparent)]
    Email(#[from] EmailValidationError),
    /// Move-out precedes move-in.
    #[error("move-out date {move_out} is before move-in date {move_in}")]
    MoveOutBeforeMoveIn {
        /// Recorded move-in date.
        move_in: NaiveDate,
        /// Requested move-out date.
        move_out: NaiveDate,
    },
}

impl TenancyValidationError {
    /// Request field the failure refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "fullName",
            Self::Phone(_) => "phone",
            Self::Email(_) => "email",
            Self::MoveOutBeforeMoveIn { .. } => "moveOutDate",
        }
    }
}

/// A row in `tenants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    /// Primary key.
    pub id: TenantId,
    /// Legal name.
    pub full_name: String,
    /// Phone in E.164 form.
    pub phone: String,
    /// Contact email.
    pub email: Option<String>,
    /// National ID or passport number.
    pub id_number: Option<String>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Raw tenant details as submitted by a landlord or manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTenant {
    /// Legal name.
    pub full_name: String,
    /// Phone in any accepted local form.
    pub phone: String,
    /// Optional email.
    pub email: Option<String>,
    /// Optional national ID.
    pub id_number: Option<String>,
}

/// Tenant details after validation, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantDraft {
    /// Trimmed legal name.
    pub full_name: String,
    /// Normalised phone.
    pub phone: PhoneNumber,
    /// Normalised email.
    pub email: Option<EmailAddress>,
    /// Trimmed national ID.
    pub id_number: Option<String>,
}

impl NewTenant {
    /// Validate and normalise the tenant fields.
    ///
    /// # Examples
    /// ```
    /// use icumbi::domain::NewTenant;
    ///
    /// let draft = NewTenant {
    ///     full_name: " Aline Mukamana ".into(),
    ///     phone: "0788 123 456".into(),
    ///     email: None,
    ///     id_number: None,
    /// }
    /// .validate()
    /// .unwrap();
    /// assert_eq!(draft.phone.e164(), "+250788123456");
    /// ```
    pub fn validate(self) -> Result<TenantDraft, TenancyValidationError> {
        let full_name = self.full_name.trim().to_owned();
        if full_name.is_empty() {
            return Err(TenancyValidationError::EmptyName);
        }
        let phone = PhoneNumber::parse(&self.phone)?;
        let email = self
            .email
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| EmailAddress::parse(&raw))
            .transpose()?;
        let id_number = self
            .id_number
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty());
        Ok(TenantDraft {
            full_name,
            phone,
            email,
            id_number,
        })
    }
}

/// A row in `room_tenants`: one tenant's stay in one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTenant {
    /// Primary key.
    pub id: RoomTenantId,
    /// Occupied room.
    pub room_id: RoomId,
    /// Occupying tenant.
    pub tenant_id: TenantId,
    /// First day of the stay.
    pub move_in_date: NaiveDate,
    /// Last day of the stay, once known.
    pub move_out_date: Option<NaiveDate>,
    /// False once the tenant has moved out.
    pub is_active: bool,
}

impl RoomTenant {
    /// Check that `move_out` does not precede the move-in date.
    pub fn check_move_out(&self, move_out: NaiveDate) -> Result<(), TenancyValidationError> {
        if move_out < self.move_in_date {
            return Err(TenancyValidationError::MoveOutBeforeMoveIn {
                move_in: self.move_in_date,
                move_out,
            });
        }
        Ok(())
    }
}

/// Input for opening an occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOccupancy {
    /// Room being let.
    pub room_id: RoomId,
    /// Tenant moving in.
    pub tenant_id: TenantId,
    /// First day of the stay.
    pub move_in_date: NaiveDate,
}

/// An active occupancy joined with its tenant and room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyDetails {
    /// The occupancy row.
    pub occupancy: RoomTenant,
    /// Tenant details.
    pub tenant: Tenant,
    /// Room details.
    pub room: Room,
}
