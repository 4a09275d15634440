//! User entity model and DTOs.

use std::fmt;

use payhere_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// How an account uses the service. Only places (shops) exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseType {
    Place,
}

impl UseType {
    pub fn as_str(self) -> &'static str {
        match self {
            UseType::Place => "PLACE",
        }
    }
}

impl fmt::Display for UseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown use type: {0}")]
pub struct UnknownUseType(String);

impl TryFrom<String> for UseType {
    type Error = UnknownUseType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "PLACE" => Ok(UseType::Place),
            _ => Err(UnknownUseType(value)),
        }
    }
}

/// Full user row from the `users` table.
///
/// Contains the password hash -- never serialize this to API responses.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    /// Canonical 11-digit phone number.
    pub mobile_id: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub use_type: UseType,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub mobile_id: String,
    pub password_hash: String,
    pub use_type: UseType,
}
