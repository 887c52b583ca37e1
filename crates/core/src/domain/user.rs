use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Client,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_client(&self) -> bool {
        self.role == Role::Client
    }
}

/// Registration payload. The password never appears in `Debug` output.
#[derive(Clone, Serialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub company: Option<String>,
    pub password: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("company", &self.company)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{NewUser, Role, User};

    #[test]
    fn user_role_decodes_from_snake_case() {
        let user: User = serde_json::from_str(
            r#"{"id":"u-1","email":"admin@techstock.com","name":"Admin User","role":"admin","company":null}"#,
        )
        .expect("user payload should decode");

        assert!(user.is_admin());
        assert!(!user.is_client());
        assert_eq!(user.created_at, None);
    }

    #[test]
    fn new_user_debug_redacts_password() {
        let new_user = NewUser {
            email: "buyer@example.com".to_owned(),
            name: "Buyer".to_owned(),
            role: Role::Client,
            company: Some("Acme".to_owned()),
            password: "hunter2".to_owned(),
        };

        let debug = format!("{new_user:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("buyer@example.com"));
    }
}
