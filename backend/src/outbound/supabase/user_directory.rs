//! PostgREST-backed `UserDirectory` adapter.

use std::str::FromStr;

use async_trait::async_trait;
use tracing::warn;

use super::client::SupabaseClient;
use super::dto::RoleRow;
use super::error_mapping::map_backend_error;
use super::query::TableQuery;
use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{Caller, UserRole};

/// Reads roles from `users` with the caller's token.
#[derive(Debug, Clone)]
pub struct SupabaseUserDirectory {
    client: SupabaseClient,
}

impl SupabaseUserDirectory {
    /// Create the adapter.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

/// Rows without a role count as tenants; unknown roles are skipped.
fn roles(rows: Vec<RoleRow>) -> Vec<UserRole> {
    rows.into_iter()
        .filter_map(|row| match row.role.as_deref() {
            None => Some(UserRole::Tenant),
            Some(raw) => UserRole::from_str(raw)
                .inspect_err(|_| warn!(role = raw, "skipping users row with unknown role"))
                .ok(),
        })
        .collect()
}

#[async_trait]
impl UserDirectory for SupabaseUserDirectory {
    async fn list_roles(&self, caller: &Caller) -> Result<Vec<UserRole>, UserDirectoryError> {
        let query = TableQuery::table("users").select("role");
        let rows: Vec<RoleRow> = self
            .client
            .select(&caller.token, &query)
            .await
            .map_err(|error| {
                map_backend_error(error, UserDirectoryError::connection, UserDirectoryError::query)
            })?;
        Ok(roles(rows))
    }
}
