use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::types::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub name: String,
    pub role: Role,
}

impl User {
    /// Only admins and editors may publish posts.
    #[must_use]
    pub fn can_publish(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Editor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    User,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => f.write_str("admin"),
            Self::Editor => f.write_str("editor"),
            Self::User => f.write_str("user"),
        }
    }
}
