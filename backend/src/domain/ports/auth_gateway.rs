//! Port for resolving and revoking access tokens.

use async_trait::async_trait;

use crate::domain::{AccessToken, AuthUser};

use super::define_port_error;

define_port_error! {
    /// Errors raised by auth gateway adapters.
    pub enum AuthGatewayError {
        /// Token is malformed, expired, or revoked.
        InvalidToken { message: String } => "access token rejected: {message}",
        /// Auth service could not be reached.
        Connection { message: String } => "auth service connection failed: {message}",
        /// Auth service answered with something unexpected.
        Query { message: String } => "auth service request failed: {message}",
    }
}

/// Resolves bearer tokens into identities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Resolve `token` into a user, including their role from `users`.
    ///
    /// Users without a `users` row are reported with the `tenant` role.
    async fn current_user(&self, token: &AccessToken) -> Result<AuthUser, AuthGatewayError>;

    /// Revoke the session behind `token`.
    async fn sign_out(&self, token: &AccessToken) -> Result<(), AuthGatewayError>;
}
