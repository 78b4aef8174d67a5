//! User and session entities.

use serde::{Deserialize, Serialize};

use crate::constants::{ROLE_GERENTE, ROLE_USUARIO};
use crate::id::EntityId;

/// Roles enumeration. Role is the sole authorization dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Usuario,
    Gerente,
}

impl Role {
    /// Check if this role has manager privileges
    pub fn is_manager(&self) -> bool {
        matches!(self, Role::Gerente)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Usuario => ROLE_USUARIO,
            Role::Gerente => ROLE_GERENTE,
        }
    }
}

impl std::str::FromStr for Role {
    type Err = crate::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_USUARIO => Ok(Role::Usuario),
            ROLE_GERENTE => Ok(Role::Gerente),
            other => Err(crate::DomainError::validation(format!(
                "Invalid role '{}'. Must be '{}' or '{}'",
                other, ROLE_USUARIO, ROLE_GERENTE
            ))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User record as stored in the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn is_manager(&self) -> bool {
        self.role.is_manager()
    }

    /// Email comparison used for uniqueness and login (case-insensitive).
    pub fn has_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.trim().to_lowercase()
    }

    /// Project the user into a session, dropping the credential.
    pub fn to_session(&self) -> Session {
        Session {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Authenticated identity: a projection of [`User`] without the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Session {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn is_manager(&self) -> bool {
        self.role.is_manager()
    }
}

/// Payload for creating a user. `password` must already be hashed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Full replacement of a user's editable fields (PUT semantics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    /// New plain password, hashed before storage; `None` keeps the current one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
}

/// User as returned to gateway clients (no credential).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: EntityId::from(3u64),
            name: "Ana".to_string(),
            email: "Ana@Example.com".to_string(),
            password: "$argon2id$...".to_string(),
            role: Role::Gerente,
        }
    }

    #[test]
    fn role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Usuario).unwrap(), "\"usuario\"");
        assert_eq!(serde_json::to_string(&Role::Gerente).unwrap(), "\"gerente\"");
        assert_eq!("gerente".parse::<Role>().unwrap(), Role::Gerente);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn email_match_ignores_case() {
        assert!(user().has_email("ana@example.COM"));
        assert!(!user().has_email("ana@example.org"));
    }

    #[test]
    fn session_drops_password() {
        let session = user().to_session();
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(session.role, Role::Gerente);
    }

    #[test]
    fn missing_role_defaults_to_usuario() {
        let user: User =
            serde_json::from_str(r#"{"id":1,"name":"x","email":"x@y.z","password":"p"}"#).unwrap();
        assert_eq!(user.role, Role::Usuario);
    }
}
