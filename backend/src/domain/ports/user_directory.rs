//! Port for reading the `users` table.

use async_trait::async_trait;

use crate::domain::{Caller, UserRole};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// Backend could not be reached.
        Connection { message: String } => "user directory connection failed: {message}",
        /// Query failed.
        Query { message: String } => "user directory query failed: {message}",
    }
}

/// Read access to user roles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// The role of every user row.
    async fn list_roles(&self, caller: &Caller) -> Result<Vec<UserRole>, UserDirectoryError>;
}
