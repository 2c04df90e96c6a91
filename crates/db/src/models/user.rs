//! User entity model and DTOs.

use careerkey_core::profile::SignupMetadata;
use careerkey_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    /// Role and display name captured at sign-up.
    pub metadata: Json<SignupMetadata>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub metadata: SignupMetadata,
}
