//! Manager invitations.

use std::sync::Arc;

use tracing::info;

use crate::domain::access::AccessPolicy;
use crate::domain::ports::{InvitationSender, ManagerRepository};
use crate::domain::service_support::{invalid_field, map_invitation_error, map_manager_error};
use crate::domain::{
    Caller, EmailAddress, Error, Language, ManagerInvitation, PropertyId, PropertyManager,
    UserRole,
};

/// Invites managers and lists who manages a property.
#[derive(Clone)]
pub struct InvitationService {
    access: AccessPolicy,
    managers: Arc<dyn ManagerRepository>,
    sender: Arc<dyn InvitationSender>,
}

impl InvitationService {
    /// Create the service.
    pub fn new(
        access: AccessPolicy,
        managers: Arc<dyn ManagerRepository>,
        sender: Arc<dyn InvitationSender>,
    ) -> Self {
        Self {
            access,
            managers,
            sender,
        }
    }

    /// Email an invitation and record a pending `property_managers` row.
    ///
    /// Only the property's landlord or an admin may invite. The pending row
    /// is written only after the endpoint accepts the invitation.
    pub async fn invite_manager(
        &self,
        caller: &Caller,
        property_id: PropertyId,
        email: &str,
        language: Language,
    ) -> Result<PropertyManager, Error> {
        caller.require_role(&[UserRole::Landlord, UserRole::Admin])?;
        let email = EmailAddress::parse(email).map_err(|e| invalid_field("email", e.to_string()))?;
        let property = self.access.load_property(caller, property_id).await?;
        if !caller.is_admin() && property.landlord_id != caller.id() {
            return Err(Error::forbidden(
                "only the property's landlord can invite managers",
            ));
        }
        if caller.user.email.as_ref() == Some(&email) {
            return Err(invalid_field("email", "you cannot invite yourself"));
        }

        let existing = self
            .managers
            .list_for_property(caller, property_id)
            .await
            .map_err(map_manager_error)?;
        if existing.iter().any(|row| row.email == email) {
            return Err(Error::conflict(format!(
                "{email} is already invited to this property"
            )));
        }

        let invitation = ManagerInvitation {
            email: email.clone(),
            property_id,
            property_name: property.name.clone(),
            inviter_name: caller.display_name(),
            language,
        };
        let receipt = self
            .sender
            .send(&caller.token, &invitation)
            .await
            .map_err(map_invitation_error)?;
        let manager = self
            .managers
            .insert_pending(caller, property_id, &email)
            .await
            .map_err(map_manager_error)?;
        info!(
            %property_id,
            manager_row = %manager.id,
            endpoint_message = receipt.message.as_deref().unwrap_or_default(),
            "manager invitation sent"
        );
        Ok(manager)
    }

    /// Pending and active managers of a property.
    pub async fn list_managers(
        &self,
        caller: &Caller,
        property_id: PropertyId,
    ) -> Result<Vec<PropertyManager>, Error> {
        self.access
            .accessible_property(caller, property_id)
            .await?;
        let mut rows = self
            .managers
            .list_for_property(caller, property_id)
            .await
            .map_err(map_manager_error)?;
        rows.sort_by(|a, b| b.invited_at.cmp(&a.invited_at));
        Ok(rows)
    }
}
