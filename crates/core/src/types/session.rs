//! Authentication session types.
//!
//! A [`Session`] is the unit persisted under the `"auth"` storage key: the
//! logged-in user's summary plus the bearer token the API expects. An
//! anonymous session has no user and an empty token.

use serde::{Deserialize, Serialize};

use crate::types::email::Email;

/// Account role, carried as an integer code on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(into = "u8", try_from = "u8")]
pub enum Role {
    /// Regular customer account (wire code 0).
    #[default]
    Customer,
    /// Administrator account (wire code 1).
    Admin,
}

/// Error produced when an unknown role code arrives on the wire.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown role code {0}")]
pub struct RoleError(pub u8);

impl From<Role> for u8 {
    fn from(role: Role) -> Self {
        match role {
            Role::Customer => 0,
            Role::Admin => 1,
        }
    }
}

impl TryFrom<u8> for Role {
    type Error = RoleError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Customer),
            1 => Ok(Self::Admin),
            other => Err(RoleError(other)),
        }
    }
}

/// Profile summary of the logged-in user, as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Display name.
    pub name: String,
    /// Account email address.
    pub email: Email,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
    /// Shipping address.
    #[serde(default)]
    pub address: String,
    /// Account role.
    #[serde(default)]
    pub role: Role,
}

/// Authentication session state.
///
/// Persisted as a single JSON blob; created on login, mutated on profile
/// update, reset to [`Session::anonymous`] on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The logged-in user, if any.
    pub user: Option<UserSummary>,
    /// Bearer token for the API; empty when logged out.
    pub token: String,
}

impl Session {
    /// The logged-out session: no user, empty token.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            user: None,
            token: String::new(),
        }
    }

    /// Whether this session carries a usable token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::anonymous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_codes() {
        assert_eq!(serde_json::to_string(&Role::Customer).expect("serialize"), "0");
        assert_eq!(serde_json::to_string(&Role::Admin).expect("serialize"), "1");

        let admin: Role = serde_json::from_str("1").expect("deserialize");
        assert_eq!(admin, Role::Admin);
    }

    #[test]
    fn test_unknown_role_code_rejected() {
        let result: Result<Role, _> = serde_json::from_str("7");
        assert!(result.is_err());
    }

    #[test]
    fn test_session_round_trip() {
        let session = Session {
            user: Some(UserSummary {
                name: "Ada".to_owned(),
                email: Email::parse("ada@example.com").expect("valid email"),
                phone: "555-0100".to_owned(),
                address: "1 Loop Rd".to_owned(),
                role: Role::Admin,
            }),
            token: "token-abc".to_owned(),
        };

        let json = serde_json::to_string(&session).expect("serialize");
        let back: Session = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, session);
        assert!(back.is_authenticated());
    }

    #[test]
    fn test_anonymous_session() {
        let session = Session::default();
        assert!(session.user.is_none());
        assert!(!session.is_authenticated());
    }
}
