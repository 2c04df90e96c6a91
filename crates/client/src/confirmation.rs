//! Confirmation view: appointment details and calendar export.

use std::fs;
use std::path::{Path, PathBuf};

use careerkey_core::ics::{self, AppointmentEvent};
use careerkey_core::navigation::ConfirmationParams;
use careerkey_core::timezone::{format_full, resolve_time_zone};
use careerkey_core::types::{DbId, Timestamp};
use chrono::Utc;
use chrono_tz::Tz;

use crate::backend::{Backend, Company, Slot};
use crate::error::ClientError;

/// Placeholder for details that have not arrived.
pub const LOADING: &str = "Loading…";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationView {
    /// The hand-off lacked an id; the user should book again.
    MissingIdentifier,
    Details(ConfirmationDetails),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationDetails {
    pub appointment_id: String,
    pub slot_id: DbId,
    pub time_zone: Tz,
    pub slot: Option<Slot>,
    pub company: Option<Company>,
    /// First fetch failure. Fields it would have filled stay on [`LOADING`].
    pub error: Option<String>,
}

impl ConfirmationView {
    /// Fetch the slot, then its company. Nothing is fetched when an id is
    /// missing, and the company is not fetched when the slot fetch fails.
    ///
    /// The zone falls back from `params.tz` to `local_time_zone` to UTC.
    pub async fn load<B>(
        backend: &B,
        params: &ConfirmationParams,
        local_time_zone: Option<&str>,
    ) -> Self
    where
        B: Backend + ?Sized,
    {
        let (Some(appointment_id), Some(slot_id)) = (
            params.appointment_id.as_deref(),
            params.slot_id.as_deref().and_then(|s| s.parse::<DbId>().ok()),
        ) else {
            return ConfirmationView::MissingIdentifier;
        };

        let mut details = ConfirmationDetails {
            appointment_id: appointment_id.to_string(),
            slot_id,
            time_zone: resolve_time_zone(params.tz.as_deref(), local_time_zone),
            slot: None,
            company: None,
            error: None,
        };

        let slot = match backend.get_slot(slot_id).await {
            Ok(slot) => slot,
            Err(e) => {
                tracing::warn!(slot_id = %slot_id, error = %e, "Failed to load slot");
                details.error = Some(e.to_string());
                return ConfirmationView::Details(details);
            }
        };

        let company_id = slot.company_id;
        details.slot = Some(slot);

        match backend.get_company(company_id).await {
            Ok(company) => details.company = Some(company),
            Err(e) => {
                tracing::warn!(company_id = %company_id, error = %e, "Failed to load company");
                details.error = Some(e.to_string());
            }
        }

        ConfirmationView::Details(details)
    }
}

impl ConfirmationDetails {
    pub fn company_name(&self) -> &str {
        self.company
            .as_ref()
            .map_or(LOADING, |c| c.company_name.as_str())
    }

    pub fn start_display(&self) -> String {
        self.display(|s| s.start_time)
    }

    pub fn end_display(&self) -> String {
        self.display(|s| s.end_time)
    }

    fn display(&self, pick: impl Fn(&Slot) -> Timestamp) -> String {
        self.slot
            .as_ref()
            .map_or_else(|| LOADING.to_string(), |s| format_full(pick(s), self.time_zone))
    }

    /// The calendar document, once both slot and company are present.
    pub fn calendar(&self, now: Timestamp) -> Option<String> {
        let slot = self.slot.as_ref()?;
        let company = self.company.as_ref()?;
        Some(ics::build_calendar(
            &AppointmentEvent {
                appointment_id: &self.appointment_id,
                company_name: &company.company_name,
                start: slot.start_time,
                end: slot.end_time,
                time_zone: self.time_zone.name(),
            },
            now,
        ))
    }

    pub fn file_name(&self) -> String {
        ics::file_name(&self.appointment_id)
    }

    /// Save the calendar file into `dir`. Returns `None` while details are
    /// still loading.
    pub fn write_calendar(&self, dir: &Path) -> Result<Option<PathBuf>, ClientError> {
        let Some(body) = self.calendar(Utc::now()) else {
            return Ok(None);
        };
        let path = dir.join(self.file_name());
        fs::write(&path, body)
            .map_err(|e| ClientError::Store(format!("{}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), "Calendar file written");
        Ok(Some(path))
    }
}
