use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::roles::Role;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                   // unique user ID
    pub email: String,              // unique, lowercased
    #[serde(skip_serializing)]
    pub password_hash: String,      // Argon2 hash, not exposed in JSON
    pub name: Option<String>,       // display name
    pub role: Role,
    pub is_email_verified: bool,
    pub created_at: OffsetDateTime, // creation timestamp
    pub updated_at: OffsetDateTime,
}
