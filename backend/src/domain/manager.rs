//! Property managers and the invitations that create them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EmailAddress, Language, PropertyId, PropertyManagerId, UserId};

/// Whether a manager has accepted their invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagerStatus {
    /// Invited, not yet accepted.
    Pending,
    /// Accepted; grants access to the property.
    Active,
}

impl ManagerStatus {
    /// Database string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
        }
    }
}

/// A row in `property_managers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyManager {
    /// Primary key.
    pub id: PropertyManagerId,
    /// Managed property.
    pub property_id: PropertyId,
    /// Manager's user id, set once the invitation is accepted.
    pub manager_id: Option<UserId>,
    /// Invited address.
    pub email: EmailAddress,
    /// Invitation state.
    pub status: ManagerStatus,
    /// When the invitation was issued.
    pub invited_at: DateTime<Utc>,
}

impl PropertyManager {
    /// True when this row grants `user` access.
    #[must_use]
    pub fn grants_access_to(&self, user: UserId) -> bool {
        self.status == ManagerStatus::Active && self.manager_id == Some(user)
    }
}

/// Payload posted to the invitation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerInvitation {
    /// Invitee.
    pub email: EmailAddress,
    /// Property being shared.
    pub property_id: PropertyId,
    /// Property name for the email body.
    pub property_name: String,
    /// Who sent the invitation.
    pub inviter_name: String,
    /// Email language.
    pub language: Language,
}

/// Acknowledgement from the invitation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationReceipt {
    /// Message returned by the endpoint, if any.
    pub message: Option<String>,
}
