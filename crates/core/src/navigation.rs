//! Hand-off between the booking flow and the confirmation view.
//!
//! Three string parameters travel as URL-encoded query parameters:
//! `appointmentId`, `slotId` and `tz`.

use serde::{Deserialize, Serialize};

/// Path of the confirmation view.
pub const CONFIRMATION_PATH: &str = "/schedule/confirmation";

/// Query parameters of the confirmation view. Any of them may be missing when
/// the page is opened by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tz: Option<String>,
}

impl ConfirmationParams {
    pub fn new(
        appointment_id: impl Into<String>,
        slot_id: impl Into<String>,
        tz: impl Into<String>,
    ) -> Self {
        Self {
            appointment_id: Some(appointment_id.into()),
            slot_id: Some(slot_id.into()),
            tz: Some(tz.into()),
        }
    }

    /// Parse a raw query string (without the leading `?`).
    ///
    /// Empty values are treated as absent.
    pub fn from_query(query: &str) -> Result<Self, serde_urlencoded::de::Error> {
        let mut params: Self = serde_urlencoded::from_str(query)?;
        for field in [&mut params.appointment_id, &mut params.slot_id, &mut params.tz] {
            if field.as_deref().is_some_and(str::is_empty) {
                *field = None;
            }
        }
        Ok(params)
    }

    pub fn to_query(&self) -> String {
        // Only `Option<String>` fields, so serialization cannot fail.
        serde_urlencoded::to_string(self).unwrap_or_default()
    }

    /// Full confirmation URL path including the query string.
    pub fn to_path(&self) -> String {
        format!("{CONFIRMATION_PATH}?{}", self.to_query())
    }
}
