//! The service as seen by the client views.

use async_trait::async_trait;
use careerkey_core::availability::{BookableSlot, SlotAvailability};
use careerkey_core::profile::{ResolvedProfile, SignupMetadata};
use careerkey_core::roles::Role;
use careerkey_core::student::AnonymousStudentId;
use careerkey_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// A company offering slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: DbId,
    pub company_name: String,
}

/// A bookable time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: DbId,
    pub company_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub capacity: i32,
}

impl BookableSlot for Slot {
    fn slot_id(&self) -> DbId {
        self.id
    }

    fn capacity(&self) -> i32 {
        self.capacity
    }

    fn start_time(&self) -> Timestamp {
        self.start_time
    }
}

/// A slot with its derived booked count.
pub type SlotView = SlotAvailability<Slot>;

/// The identity a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: DbId,
    pub email: String,
    #[serde(default)]
    pub metadata: SignupMetadata,
}

/// An authenticated session issued by the identity endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: SessionUser,
}

/// Sign-up form input.
#[derive(Debug, Clone, Serialize)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub display_name: Option<String>,
}

/// Remote operations used by the views.
///
/// Every method is one request; implementations never retry.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn sign_up(&self, form: &SignUpForm) -> Result<Session, ClientError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ClientError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), ClientError>;

    /// Read the caller's profile, creating it on first visit.
    async fn resolve_profile(&self, access_token: &str) -> Result<ResolvedProfile, ClientError>;

    /// Companies ordered by name.
    async fn list_companies(&self) -> Result<Vec<Company>, ClientError>;

    async fn get_company(&self, id: DbId) -> Result<Company, ClientError>;

    /// A company's slots ordered by start time, with availability attached.
    async fn list_slots(&self, company_id: DbId) -> Result<Vec<SlotView>, ClientError>;

    async fn get_slot(&self, id: DbId) -> Result<Slot, ClientError>;

    /// Book one seat. The service is the only authority on capacity.
    async fn book_slot(
        &self,
        slot_id: DbId,
        student_id: &AnonymousStudentId,
    ) -> Result<DbId, ClientError>;
}
