//! GoTrue-backed `AuthGateway` adapter.
//!
//! The token is resolved through `/auth/v1/user`, then the role and display
//! name are read from the caller's own `users` row.

use std::str::FromStr;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::client::SupabaseClient;
use super::dto::{AuthUserDto, UserRow};
use super::error::{BackendError, BackendErrorKind};
use super::error_mapping::map_backend_error;
use super::query::TableQuery;
use crate::domain::ports::{AuthGateway, AuthGatewayError};
use crate::domain::{AccessToken, AuthUser, EmailAddress, UserId, UserRole};

/// Resolves bearer tokens against the hosted auth service.
#[derive(Debug, Clone)]
pub struct SupabaseAuthGateway {
    client: SupabaseClient,
}

impl SupabaseAuthGateway {
    /// Create the adapter.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

fn user_row_query(id: UserId) -> TableQuery {
    TableQuery::table("users")
        .select("role,full_name")
        .eq("id", id)
        .limit(1)
}

fn map_token_error(error: BackendError) -> AuthGatewayError {
    match error.kind() {
        BackendErrorKind::Unauthorized | BackendErrorKind::Forbidden | BackendErrorKind::NotFound => {
            AuthGatewayError::invalid_token(error.message())
        }
        _ => map_backend_error(
            error,
            AuthGatewayError::connection,
            AuthGatewayError::query,
        ),
    }
}

fn resolve_role(row: Option<&UserRow>) -> Result<UserRole, AuthGatewayError> {
    match row.and_then(|row| row.role.as_deref()) {
        Some(raw) => UserRole::from_str(raw).map_err(|error| {
            warn!(role = raw, "users row carries an unknown role");
            AuthGatewayError::query(error.to_string())
        }),
        None => Ok(UserRole::Tenant),
    }
}

#[async_trait]
impl AuthGateway for SupabaseAuthGateway {
    async fn current_user(&self, token: &AccessToken) -> Result<AuthUser, AuthGatewayError> {
        let user: AuthUserDto = self
            .client
            .auth_user(token)
            .await
            .map_err(map_token_error)?;
        let rows: Vec<UserRow> = self
            .client
            .select(token, &user_row_query(user.id))
            .await
            .map_err(|error| {
                map_backend_error(error, AuthGatewayError::connection, AuthGatewayError::query)
            })?;
        let row = rows.first();
        if row.is_none() {
            debug!(user_id = %user.id, "no users row; defaulting to tenant");
        }
        let role = resolve_role(row)?;
        let full_name = row
            .and_then(|row| row.full_name.clone())
            .filter(|name| !name.trim().is_empty())
            .or_else(|| user.metadata_name());
        let email = user
            .email
            .as_deref()
            .and_then(|raw| EmailAddress::parse(raw).ok());
        Ok(AuthUser {
            id: user.id,
            email,
            full_name,
            role,
        })
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), AuthGatewayError> {
        self.client.sign_out(token).await.map_err(map_token_error)
    }
}
