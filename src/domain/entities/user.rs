use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Employee,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Employee => "employee",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for UserRole {
    fn from(s: String) -> Self {
        match s.as_str() {
            "admin" => UserRole::Admin,
            _ => UserRole::Employee,
        }
    }
}

/// Balance-relevant projection of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub vacation_balance: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    pub fn new(
        email: String,
        name: String,
        role: UserRole,
        vacation_balance: i64,
        created_at: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            name,
            role,
            vacation_balance: vacation_balance.max(0),
            created_at: created_at.clone(),
            updated_at: created_at,
        }
    }
}
