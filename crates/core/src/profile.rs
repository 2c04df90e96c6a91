//! Profile resolution for an authenticated identity.
//!
//! Every identity owns at most one profile (role + display name). The profile
//! is created lazily the first time the identity visits an authenticated
//! area, using the metadata captured at sign-up as defaults.
//!
//! The algorithm is written against [`ProfileStore`] so the service can run it
//! over PostgreSQL and tests can run it over an in-memory map.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::roles::Role;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Metadata recorded with the identity at sign-up.
///
/// Both fields are optional because identities created outside the sign-up
/// form (or before roles existed) carry no metadata at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupMetadata {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl SignupMetadata {
    /// Build metadata from sign-up form input. Blank display names become `None`.
    pub fn new(role: Role, display_name: Option<&str>) -> Self {
        Self {
            role: Some(role.as_str().to_string()),
            display_name: normalize_display_name(display_name),
        }
    }

    /// Role and display name to use when creating a profile.
    ///
    /// Missing or unrecognised roles fall back to [`Role::Student`].
    pub fn defaults(&self) -> (Role, Option<String>) {
        let role = self
            .role
            .as_deref()
            .and_then(|r| r.parse().ok())
            .unwrap_or_default();
        (role, normalize_display_name(self.display_name.as_deref()))
    }
}

/// The authenticated identity a profile is resolved for.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: DbId,
    pub metadata: SignupMetadata,
}

/// A stored profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub user_id: DbId,
    pub role: Role,
    pub display_name: Option<String>,
}

/// Values written when a profile is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub user_id: DbId,
    pub role: Role,
    pub display_name: Option<String>,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedProfile {
    pub role: Role,
    pub display_name: Option<String>,
    /// `true` when this call inserted the profile.
    pub created: bool,
    /// Non-fatal notice, e.g. the initial read failed but creation succeeded.
    pub warning: Option<String>,
}

/// Failure reported by a [`ProfileStore`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The insert collided with an existing profile for the same identity.
    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    Other(String),
}

/// Fatal resolution outcomes. Role and display name are unknown in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("Not signed in")]
    Unauthenticated,

    #[error("Profile could not be created: {0}")]
    Unavailable(String),

    #[error("Profile created but could not be read: {0}")]
    CreatedButUnreadable(String),
}

/// Storage seam for profiles keyed by identity.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Read the profile for `user_id`; `Ok(None)` when none exists.
    async fn find(&self, user_id: DbId) -> Result<Option<Profile>, StoreError>;

    /// Insert a new profile. Must report a key collision as [`StoreError::Duplicate`].
    async fn insert(&self, profile: &NewProfile) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve `(role, display_name)` for the current identity.
///
/// 1. No identity: [`ProfileError::Unauthenticated`].
/// 2. Read the profile. A read error is kept as a warning and resolution
///    continues as if the profile were absent.
/// 3. Absent: insert one using the sign-up metadata defaults. A duplicate-key
///    failure means a concurrent first visit won the race, so fall through to
///    the re-read. Any other failure is [`ProfileError::Unavailable`].
/// 4. Re-read to pick up the stored (possibly normalised) values; failure is
///    [`ProfileError::CreatedButUnreadable`].
pub async fn resolve_profile<S>(
    store: &S,
    identity: Option<&Identity>,
) -> Result<ResolvedProfile, ProfileError>
where
    S: ProfileStore + ?Sized,
{
    let identity = identity.ok_or(ProfileError::Unauthenticated)?;

    let mut warning = None;
    match store.find(identity.user_id).await {
        Ok(Some(profile)) => {
            return Ok(ResolvedProfile {
                role: profile.role,
                display_name: profile.display_name,
                created: false,
                warning: None,
            });
        }
        Ok(None) => {}
        Err(err) => warning = Some(format!("Profile read failed: {err}")),
    }

    let (role, display_name) = identity.metadata.defaults();
    let new_profile = NewProfile {
        user_id: identity.user_id,
        role,
        display_name,
    };

    let created = match store.insert(&new_profile).await {
        Ok(()) => true,
        Err(StoreError::Duplicate(_)) => false,
        Err(StoreError::Other(msg)) => return Err(ProfileError::Unavailable(msg)),
    };

    match store.find(identity.user_id).await {
        Ok(Some(profile)) => Ok(ResolvedProfile {
            role: profile.role,
            display_name: profile.display_name,
            created,
            warning,
        }),
        Ok(None) => Err(ProfileError::CreatedButUnreadable(
            "no profile row returned".to_string(),
        )),
        Err(err) => Err(ProfileError::CreatedButUnreadable(err.to_string())),
    }
}

fn normalize_display_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use assert_matches::assert_matches;

    use super::*;

    /// In-memory store with scriptable failures.
    #[derive(Default)]
    struct MemoryProfiles {
        rows: Mutex<HashMap<DbId, Profile>>,
        reads: AtomicUsize,
        inserts: AtomicUsize,
        /// Fail this many reads (from the first one) before succeeding.
        failing_reads: AtomicUsize,
        /// Fail every read that happens after an insert attempt.
        fail_reads_after_insert: bool,
        insert_error: Option<StoreError>,
        /// Row a concurrent visitor managed to insert first.
        racing_row: Option<Profile>,
    }

    #[async_trait]
    impl ProfileStore for MemoryProfiles {
        async fn find(&self, user_id: DbId) -> Result<Option<Profile>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail_reads_after_insert && self.inserts.load(Ordering::SeqCst) > 0 {
                return Err(StoreError::Other("connection reset".into()));
            }
            if self
                .failing_reads
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(StoreError::Other("permission denied".into()));
            }
            Ok(self.rows.lock().unwrap().get(&user_id).cloned())
        }

        async fn insert(&self, profile: &NewProfile) -> Result<(), StoreError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            if let Some(racing) = &self.racing_row {
                self.rows
                    .lock()
                    .unwrap()
                    .insert(racing.user_id, racing.clone());
                return Err(StoreError::Duplicate(
                    "duplicate key value violates unique constraint".into(),
                ));
            }
            if let Some(err) = &self.insert_error {
                return Err(err.clone());
            }
            let mut rows = self.rows.lock().unwrap();
            if rows.contains_key(&profile.user_id) {
                return Err(StoreError::Duplicate("duplicate key".into()));
            }
            rows.insert(
                profile.user_id,
                Profile {
                    user_id: profile.user_id,
                    role: profile.role,
                    display_name: profile.display_name.clone(),
                },
            );
            Ok(())
        }
    }

    fn identity(role: Option<&str>, name: Option<&str>) -> Identity {
        Identity {
            user_id: DbId::new_v4(),
            metadata: SignupMetadata {
                role: role.map(str::to_string),
                display_name: name.map(str::to_string),
            },
        }
    }

    #[tokio::test]
    async fn missing_identity_is_unauthenticated() {
        let store = MemoryProfiles::default();
        let result = resolve_profile(&store, None).await;
        assert_matches!(result, Err(ProfileError::Unauthenticated));
        assert_eq!(store.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn creates_profile_from_signup_metadata_then_rereads() {
        let store = MemoryProfiles::default();
        let id = identity(Some("company"), Some("Acme Recruiting"));

        let resolved = resolve_profile(&store, Some(&id)).await.unwrap();

        assert_eq!(resolved.role, Role::Company);
        assert_eq!(resolved.display_name.as_deref(), Some("Acme Recruiting"));
        assert!(resolved.created);
        assert!(resolved.warning.is_none());
        assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
        assert_eq!(store.reads.load(Ordering::SeqCst), 2);

        let stored = store.rows.lock().unwrap().get(&id.user_id).cloned().unwrap();
        assert_eq!(stored.role, Role::Company);
        assert_eq!(stored.display_name.as_deref(), Some("Acme Recruiting"));
    }

    #[tokio::test]
    async fn existing_profile_is_returned_without_writes() {
        let store = MemoryProfiles::default();
        let id = identity(Some("company"), None);
        store.rows.lock().unwrap().insert(
            id.user_id,
            Profile {
                user_id: id.user_id,
                role: Role::Student,
                display_name: Some("Jordan".into()),
            },
        );

        let resolved = resolve_profile(&store, Some(&id)).await.unwrap();

        assert_eq!(resolved.role, Role::Student);
        assert_eq!(resolved.display_name.as_deref(), Some("Jordan"));
        assert!(!resolved.created);
        assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_metadata_defaults_to_student() {
        let store = MemoryProfiles::default();
        let id = identity(None, Some("   "));

        let resolved = resolve_profile(&store, Some(&id)).await.unwrap();

        assert_eq!(resolved.role, Role::Student);
        assert_eq!(resolved.display_name, None);
    }

    #[tokio::test]
    async fn read_failure_is_a_warning_and_creation_continues() {
        let store = MemoryProfiles {
            failing_reads: AtomicUsize::new(1),
            ..Default::default()
        };
        let id = identity(Some("student"), None);

        let resolved = resolve_profile(&store, Some(&id)).await.unwrap();

        assert!(resolved.created);
        assert_eq!(
            resolved.warning.as_deref(),
            Some("Profile read failed: permission denied")
        );
    }

    #[tokio::test]
    async fn insert_failure_is_fatal() {
        let store = MemoryProfiles {
            insert_error: Some(StoreError::Other("new row violates row-level security".into())),
            ..Default::default()
        };
        let id = identity(Some("student"), None);

        let err = resolve_profile(&store, Some(&id)).await.unwrap_err();

        assert_matches!(err, ProfileError::Unavailable(_));
        assert_eq!(
            err.to_string(),
            "Profile could not be created: new row violates row-level security"
        );
        assert_eq!(store.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn duplicate_insert_falls_back_to_existing_profile() {
        let user_id = DbId::new_v4();
        let store = MemoryProfiles {
            racing_row: Some(Profile {
                user_id,
                role: Role::Company,
                display_name: Some("Created elsewhere".into()),
            }),
            ..Default::default()
        };
        let id = Identity {
            user_id,
            metadata: SignupMetadata::new(Role::Student, None),
        };

        let resolved = resolve_profile(&store, Some(&id)).await.unwrap();

        assert_eq!(resolved.role, Role::Company);
        assert_eq!(resolved.display_name.as_deref(), Some("Created elsewhere"));
        assert!(!resolved.created);
    }

    #[tokio::test]
    async fn reread_failure_is_distinguished_from_creation_failure() {
        let store = MemoryProfiles {
            fail_reads_after_insert: true,
            ..Default::default()
        };
        let id = identity(Some("company"), None);

        let err = resolve_profile(&store, Some(&id)).await.unwrap_err();

        assert_eq!(
            err,
            ProfileError::CreatedButUnreadable("connection reset".into())
        );
        assert!(err.to_string().starts_with("Profile created but could not be read"));
    }

    #[test]
    fn unknown_metadata_role_falls_back_to_student() {
        let meta = SignupMetadata {
            role: Some("recruiter".into()),
            display_name: Some(" Dana ".into()),
        };
        assert_eq!(meta.defaults(), (Role::Student, Some("Dana".into())));
    }
}
