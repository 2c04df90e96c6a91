//! Repository for the `profiles` table.

use careerkey_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::{ProfileRow, UpsertProfile};

const COLUMNS: &str = "user_id, role, display_name, created_at, updated_at";

/// Provides reads and writes for profiles keyed by `user_id`.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Find the profile for an identity.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<ProfileRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1");
        sqlx::query_as::<_, ProfileRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Plain insert. Fails with a unique violation if the identity already
    /// has a profile.
    pub async fn insert(pool: &PgPool, input: &UpsertProfile) -> Result<ProfileRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (user_id, role, display_name)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProfileRow>(&query)
            .bind(input.user_id)
            .bind(&input.role)
            .bind(&input.display_name)
            .fetch_one(pool)
            .await
    }

    /// Insert or overwrite the profile for an identity in one statement.
    pub async fn upsert(pool: &PgPool, input: &UpsertProfile) -> Result<ProfileRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (user_id, role, display_name)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id) DO UPDATE SET
                role = EXCLUDED.role,
                display_name = EXCLUDED.display_name
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProfileRow>(&query)
            .bind(input.user_id)
            .bind(&input.role)
            .bind(&input.display_name)
            .fetch_one(pool)
            .await
    }
}
