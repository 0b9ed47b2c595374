//! Port for the manager invitation endpoint.

use async_trait::async_trait;

use crate::domain::{AccessToken, InvitationReceipt, ManagerInvitation};

use super::define_port_error;

define_port_error! {
    /// Errors raised by invitation sender adapters.
    pub enum InvitationError {
        /// Endpoint answered `{success: false}`.
        Rejected { message: String } => "invitation rejected: {message}",
        /// Endpoint answered with a non-success status.
        Status { status: u16, message: String } => "invitation endpoint returned {status}: {message}",
        /// Request timed out.
        Timeout { message: String } => "invitation endpoint timed out: {message}",
        /// Network failure.
        Transport { message: String } => "invitation endpoint unreachable: {message}",
        /// Response body could not be decoded.
        Decode { message: String } => "invitation response malformed: {message}",
    }
}

/// Delivers manager invitations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvitationSender: Send + Sync {
    /// Send `invitation`, authenticating as the holder of `token`.
    async fn send(
        &self,
        token: &AccessToken,
        invitation: &ManagerInvitation,
    ) -> Result<InvitationReceipt, InvitationError>;
}
