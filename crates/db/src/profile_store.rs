//! PostgreSQL-backed [`ProfileStore`].

use async_trait::async_trait;
use careerkey_core::profile::{NewProfile, Profile, ProfileStore, StoreError};
use careerkey_core::types::DbId;
use sqlx::PgPool;

use crate::is_unique_violation;
use crate::models::profile::UpsertProfile;
use crate::repositories::ProfileRepo;

/// Runs profile resolution against the `profiles` table.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn find(&self, user_id: DbId) -> Result<Option<Profile>, StoreError> {
        let row = ProfileRepo::find_by_user_id(&self.pool, user_id)
            .await
            .map_err(|e| StoreError::Other(e.to_string()))?;
        row.map(Profile::try_from)
            .transpose()
            .map_err(StoreError::Other)
    }

    async fn insert(&self, profile: &NewProfile) -> Result<(), StoreError> {
        match ProfileRepo::insert(&self.pool, &UpsertProfile::from(profile)).await {
            Ok(_) => {
                tracing::info!(user_id = %profile.user_id, role = %profile.role, "Profile created");
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => {
                tracing::warn!(user_id = %profile.user_id, "Profile already exists, re-reading");
                Err(StoreError::Duplicate(e.to_string()))
            }
            Err(e) => Err(StoreError::Other(e.to_string())),
        }
    }
}
