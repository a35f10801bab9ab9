use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Credential/role entity. Seeded at startup, never mutated through the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2id PHC string; never serialized into responses
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
}

/// Insert payload used by startup seeding.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: String,
}
