//! Profile entity model and DTOs.

use careerkey_core::profile::{NewProfile, Profile};
use careerkey_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `profiles` table. `role` is kept as text here and parsed
/// into [`Role`](careerkey_core::roles::Role) at the store boundary.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub user_id: DbId,
    pub role: String,
    pub display_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = String;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(Profile {
            user_id: row.user_id,
            role: row.role.parse()?,
            display_name: row.display_name,
        })
    }
}

/// DTO for inserting or upserting a profile.
#[derive(Debug, Clone)]
pub struct UpsertProfile {
    pub user_id: DbId,
    pub role: String,
    pub display_name: Option<String>,
}

impl From<&NewProfile> for UpsertProfile {
    fn from(p: &NewProfile) -> Self {
        Self {
            user_id: p.user_id,
            role: p.role.as_str().to_string(),
            display_name: p.display_name.clone(),
        }
    }
}
