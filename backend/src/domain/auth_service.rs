//! Session resolution and sign-out.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::AuthGateway;
use crate::domain::service_support::map_auth_error;
use crate::domain::{AccessToken, Caller, Error};

/// Turns bearer tokens into [`Caller`]s.
#[derive(Clone)]
pub struct AuthService {
    gateway: Arc<dyn AuthGateway>,
}

impl AuthService {
    /// Create a service over an auth gateway.
    pub fn new(gateway: Arc<dyn AuthGateway>) -> Self {
        Self { gateway }
    }

    /// Resolve a raw bearer token.
    ///
    /// Missing, blank, invalid, and expired tokens all yield `unauthorized`.
    pub async fn authenticate(&self, raw_token: Option<&str>) -> Result<Caller, Error> {
        let token = AccessToken::new(raw_token.unwrap_or_default())?;
        let user = self
            .gateway
            .current_user(&token)
            .await
            .map_err(map_auth_error)?;
        debug!(user_id = %user.id, role = %user.role, "session resolved");
        Ok(Caller::new(user, token))
    }

    /// Revoke the caller's session.
    pub async fn sign_out(&self, caller: &Caller) -> Result<(), Error> {
        self.gateway
            .sign_out(&caller.token)
            .await
            .map_err(map_auth_error)?;
        debug!(user_id = %caller.id(), "session revoked");
        Ok(())
    }
}
