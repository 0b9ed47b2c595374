//! Authenticated caller identity.
//!
//! The managed backend issues JWT access tokens; this service never inspects
//! them. A token is resolved into an [`AuthUser`] through the
//! [`crate::domain::ports::AuthGateway`] port and the pair travels through
//! every use case as a [`Caller`], so adapters can forward the token and the
//! backend's row-level security still applies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{EmailAddress, Error, UserId};

/// Role stored in the `users.role` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Platform administrator with access to trash and global dashboards.
    Admin,
    /// Owns properties.
    Landlord,
    /// Manages properties on behalf of a landlord.
    Manager,
    /// Rents, or wants to rent, a room.
    #[default]
    Tenant,
}

impl UserRole {
    /// Database string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Landlord => "landlord",
            Self::Manager => "manager",
            Self::Tenant => "tenant",
        }
    }

    /// All roles, in display order.
    pub const ALL: [Self; 4] = [Self::Admin, Self::Landlord, Self::Manager, Self::Tenant];
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown user role: {0}")]
pub struct ParseUserRoleError(pub String);

impl FromStr for UserRole {
    type Err = ParseUserRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "landlord" => Ok(Self::Landlord),
            "manager" => Ok(Self::Manager),
            "tenant" => Ok(Self::Tenant),
            other => Err(ParseUserRoleError(other.to_owned())),
        }
    }
}

/// Bearer token issued by the managed backend's auth service.
///
/// The token is zeroed on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a raw token. Blank tokens are rejected as unauthorised.
    pub fn new(raw: impl Into<String>) -> Result<Self, Error> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::unauthorized("missing access token"));
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Borrow the raw token for forwarding to the backend.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Identity resolved from an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    /// Auth user id; also the primary key of `users`.
    pub id: UserId,
    /// Login email, when the account has one.
    pub email: Option<EmailAddress>,
    /// Display name from the `users` row.
    pub full_name: Option<String>,
    /// Role from the `users` row; `tenant` when no row exists yet.
    pub role: UserRole,
}

/// The authenticated party behind a request.
#[derive(Debug, Clone)]
pub struct Caller {
    /// Resolved identity.
    pub user: AuthUser,
    /// Token forwarded to the backend so RLS applies.
    pub token: AccessToken,
}

impl Caller {
    /// Bundle an identity with the token it was resolved from.
    #[must_use]
    pub fn new(user: AuthUser, token: AccessToken) -> Self {
        Self { user, token }
    }

    /// Shortcut for the caller's user id.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.user.id
    }

    /// Shortcut for the caller's role.
    #[must_use]
    pub fn role(&self) -> UserRole {
        self.user.role
    }

    /// True for administrators.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.role == UserRole::Admin
    }

    /// Reject the caller unless their role is one of `allowed`.
    ///
    /// # Examples
    /// ```
    /// use icumbi::domain::{AccessToken, AuthUser, Caller, UserId, UserRole};
    ///
    /// let caller = Caller::new(
    ///     AuthUser { id: UserId::random(), email: None, full_name: None, role: UserRole::Tenant },
    ///     AccessToken::new("token").unwrap(),
    /// );
    /// assert!(caller.require_role(&[UserRole::Tenant]).is_ok());
    /// assert!(caller.require_role(&[UserRole::Admin]).is_err());
    /// ```
    pub fn require_role(&self, allowed: &[UserRole]) -> Result<(), Error> {
        if allowed.contains(&self.user.role) {
            Ok(())
        } else {
            Err(Error::forbidden(format!(
                "role `{}` may not perform this action",
                self.user.role
            )))
        }
    }

    /// Display name for emails and invitations, falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.user
            .full_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.user.email.as_ref().map(ToString::to_string))
            .unwrap_or_else(|| "Icumbi user".to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn caller(role: UserRole) -> Caller {
        Caller::new(
            AuthUser {
                id: UserId::random(),
                email: None,
                full_name: None,
                role,
            },
            AccessToken::new("jwt").expect("token"),
        )
    }

    #[rstest]
    #[case("admin", UserRole::Admin)]
    #[case(" Landlord ", UserRole::Landlord)]
    #[case("MANAGER", UserRole::Manager)]
    #[case("tenant", UserRole::Tenant)]
    fn parses_roles(#[case] raw: &str, #[case] expected: UserRole) {
        assert_eq!(raw.parse::<UserRole>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_role() {
        assert!("owner".parse::<UserRole>().is_err());
    }

    #[test]
    fn blank_token_is_unauthorised() {
        let err = AccessToken::new("   ").expect_err("blank");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = AccessToken::new("secret-jwt").expect("token");
        assert!(!format!("{token:?}").contains("secret"));
    }

    #[test]
    fn require_role_reports_forbidden() {
        let err = caller(UserRole::Tenant)
            .require_role(&[UserRole::Landlord, UserRole::Admin])
            .expect_err("tenant rejected");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let mut c = caller(UserRole::Landlord);
        c.user.email = Some(EmailAddress::parse("owner@icumbi.rw").expect("email"));
        assert_eq!(c.display_name(), "owner@icumbi.rw");
        c.user.full_name = Some("Jean Uwimana".to_owned());
        assert_eq!(c.display_name(), "Jean Uwimana");
    }
}
