use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

/// Closed set of user roles. Stored as lowercase TEXT; parsed
/// case-insensitively at the boundary so legacy payloads keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "client" => Ok(Role::Client),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full user row. Never serialized directly; responses go through
/// [`UserPublic`] so the password hash cannot leak.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Result<Role, String> {
        Role::from_str(&self.role)
    }

    pub fn to_public(&self) -> UserPublic {
        UserPublic {
            user_id: self.user_id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            created_at: self.created_at,
        }
    }
}

/// Public projection of a user record.
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!(Role::from_str("client").unwrap(), Role::Client);
        assert_eq!(Role::from_str("Admin").unwrap(), Role::Admin);
        assert_eq!(Role::from_str("ADMIN").unwrap(), Role::Admin);
        assert!(Role::from_str("superuser").is_err());
    }

    #[test]
    fn public_projection_has_no_hash() {
        let user = User {
            user_id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$2b$12$secret".into(),
            role: "client".into(),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(user.to_public()).unwrap();
        assert!(value.get("password_hash").is_none());
        assert!(value.get("password").is_none());
        assert_eq!(value["username"], "alice");
    }
}
