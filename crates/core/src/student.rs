//! Anonymous student identifier.
//!
//! A random token generated once per client and persisted locally. It stands
//! in for a student when booking and is unrelated to the authenticated
//! identity; the service stores it verbatim on the appointment.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound accepted by the booking endpoint.
pub const MAX_STUDENT_ID_LEN: usize = 128;

/// Opaque client-generated student token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnonymousStudentId(String);

impl AnonymousStudentId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wrap a previously persisted value. Returns `None` for blank or
    /// oversized input.
    pub fn from_stored(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.len() > MAX_STUDENT_ID_LEN {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnonymousStudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(AnonymousStudentId::generate(), AnonymousStudentId::generate());
    }

    #[test]
    fn stored_value_is_kept_verbatim() {
        let id = AnonymousStudentId::from_stored("abc-123").unwrap();
        assert_eq!(id.as_str(), "abc-123");
    }

    #[test]
    fn blank_or_oversized_values_are_rejected() {
        assert!(AnonymousStudentId::from_stored("  ").is_none());
        assert!(AnonymousStudentId::from_stored("x".repeat(MAX_STUDENT_ID_LEN + 1)).is_none());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = AnonymousStudentId::from_stored("s-1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"s-1\"");
    }
}
