//! Schedule view: browse companies and slots, book a slot.
//!
//! Availability shown here is whatever the last fetch returned. The service
//! decides capacity; the view only refuses slots it has already seen full
//! and slots with a booking still outstanding.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use careerkey_core::navigation::ConfirmationParams;
use careerkey_core::timezone::{format_medium, resolve_time_zone, TIME_ZONE_CHOICES};
use careerkey_core::types::DbId;
use chrono_tz::Tz;

use crate::backend::{Backend, Company, SlotView};
use crate::error::ClientError;
use crate::store::{self, LocalStore};

/// Label of the choice that follows the machine's own zone.
pub const AUTO_TIME_ZONE_LABEL: &str = "My time zone (auto)";

/// Snapshot of what the view shows.
#[derive(Debug, Clone, Default)]
pub struct ScheduleState {
    pub companies: Vec<Company>,
    pub selected_company_id: Option<DbId>,
    pub slots: Vec<SlotView>,
    /// IANA name all times are shown in.
    pub time_zone: String,
    /// Last failure, shown inline.
    pub error: Option<String>,
    /// Non-fatal follow-up message.
    pub notice: Option<String>,
}

impl ScheduleState {
    pub fn selected_company(&self) -> Option<&Company> {
        let id = self.selected_company_id?;
        self.companies.iter().find(|c| c.id == id)
    }
}

pub struct ScheduleView<B: ?Sized> {
    backend: Arc<B>,
    store: Arc<dyn LocalStore>,
    local_time_zone: Option<String>,
    state: Mutex<ScheduleState>,
    in_flight: Mutex<HashSet<DbId>>,
}

/// Marks a slot as having a booking outstanding until dropped.
struct InFlightGuard<'a> {
    slots: &'a Mutex<HashSet<DbId>>,
    slot_id: DbId,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(slots: &'a Mutex<HashSet<DbId>>, slot_id: DbId) -> Option<Self> {
        let inserted = lock(slots).insert(slot_id);
        inserted.then_some(Self { slots, slot_id })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        lock(self.slots).remove(&self.slot_id);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<B> ScheduleView<B>
where
    B: Backend + ?Sized,
{
    /// Start with the persisted time zone, else this machine's zone.
    pub fn new(backend: Arc<B>, store: Arc<dyn LocalStore>) -> Self {
        Self::with_local_time_zone(backend, store, store::local_time_zone())
    }

    /// As [`new`](Self::new) with an explicit machine zone.
    pub fn with_local_time_zone(
        backend: Arc<B>,
        store: Arc<dyn LocalStore>,
        local_time_zone: Option<String>,
    ) -> Self {
        let preferred = store::preferred_time_zone(store.as_ref());
        let tz = resolve_time_zone(preferred.as_deref(), local_time_zone.as_deref());
        Self {
            backend,
            store,
            local_time_zone,
            state: Mutex::new(ScheduleState {
                time_zone: tz.name().to_string(),
                ..ScheduleState::default()
            }),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn state(&self) -> ScheduleState {
        lock(&self.state).clone()
    }

    pub fn time_zone(&self) -> Tz {
        let current = lock(&self.state).time_zone.clone();
        resolve_time_zone(Some(current.as_str()), self.local_time_zone.as_deref())
    }

    /// `(zone name, label)` pairs for the picker, the machine's zone first.
    pub fn time_zone_choices(&self) -> Vec<(String, String)> {
        let auto = resolve_time_zone(None, self.local_time_zone.as_deref());
        std::iter::once((auto.name().to_string(), AUTO_TIME_ZONE_LABEL.to_string()))
            .chain(
                TIME_ZONE_CHOICES
                    .iter()
                    .map(|(name, label)| (name.to_string(), label.to_string())),
            )
            .collect()
    }

    /// Switch the display zone and persist the choice.
    pub fn set_time_zone(&self, name: &str) {
        let tz = resolve_time_zone(Some(name), self.local_time_zone.as_deref());
        if let Err(e) = store::save_time_zone(self.store.as_ref(), tz.name()) {
            tracing::warn!(error = %e, "Could not persist time zone");
        }
        lock(&self.state).time_zone = tz.name().to_string();
    }

    /// `start – end` in medium style and the current zone.
    pub fn slot_label(&self, view: &SlotView) -> String {
        let tz = self.time_zone();
        format!(
            "{} – {}",
            format_medium(view.slot.start_time, tz),
            format_medium(view.slot.end_time, tz)
        )
    }

    /// Whether the book action for `slot_id` should be enabled.
    pub fn can_book(&self, slot_id: DbId) -> bool {
        let observed_full = lock(&self.state)
            .slots
            .iter()
            .any(|v| v.slot.id == slot_id && v.is_full);
        !observed_full && !lock(&self.in_flight).contains(&slot_id)
    }

    /// Fetch companies; select the first one if nothing is selected yet,
    /// then load its slots.
    pub async fn load_companies(&self) {
        lock(&self.state).error = None;

        let companies = match self.backend.list_companies().await {
            Ok(companies) => companies,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load companies");
                lock(&self.state).error = Some(e.to_string());
                return;
            }
        };

        let selected = {
            let mut state = lock(&self.state);
            if state.selected_company_id.is_none() {
                state.selected_company_id = companies.first().map(|c| c.id);
            }
            state.companies = companies;
            state.selected_company_id
        };

        if selected.is_some() {
            self.load_slots().await;
        }
    }

    pub async fn select_company(&self, company_id: DbId) {
        {
            let mut state = lock(&self.state);
            if state.selected_company_id != Some(company_id) {
                state.slots.clear();
            }
            state.selected_company_id = Some(company_id);
        }
        self.load_slots().await;
    }

    /// Reload availability for the selected company. On failure the
    /// previous list is left untouched.
    pub async fn load_slots(&self) {
        let selected = {
            let mut state = lock(&self.state);
            state.error = None;
            state.selected_company_id
        };
        let Some(company_id) = selected else {
            return;
        };

        if let Err(e) = self.fetch_slots(company_id).await {
            tracing::warn!(company_id = %company_id, error = %e, "Failed to load slots");
            lock(&self.state).error = Some(e.to_string());
        }
    }

    async fn fetch_slots(&self, company_id: DbId) -> Result<(), ClientError> {
        let slots = self.backend.list_slots(company_id).await?;
        tracing::debug!(company_id = %company_id, count = slots.len(), "Loaded slots");

        let mut state = lock(&self.state);
        // Ignore results for a company the user has since navigated away from.
        if state.selected_company_id == Some(company_id) {
            state.slots = slots;
        }
        Ok(())
    }

    /// Book one seat in `slot_id` for this client's anonymous student id.
    ///
    /// Refused locally when the slot was last seen full or a booking for it
    /// is still outstanding. Otherwise makes exactly one backend call. On
    /// success availability is refreshed and the confirmation hand-off is
    /// returned; a failed refresh is kept as a notice and does not undo the
    /// booking. On failure the message is kept and nothing is refreshed.
    pub async fn book(&self, slot_id: DbId) -> Result<ConfirmationParams, ClientError> {
        let observed_full = lock(&self.state)
            .slots
            .iter()
            .any(|v| v.slot.id == slot_id && v.is_full);
        if observed_full {
            return Err(ClientError::SlotFull);
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, slot_id) else {
            return Err(ClientError::BookingInFlight);
        };

        {
            let mut state = lock(&self.state);
            state.error = None;
            state.notice = None;
        }

        let result = self.book_once(slot_id).await;
        if let Err(e) = &result {
            tracing::info!(slot_id = %slot_id, error = %e, "Booking rejected");
            lock(&self.state).error = Some(e.to_string());
        }
        result
    }

    async fn book_once(&self, slot_id: DbId) -> Result<ConfirmationParams, ClientError> {
        let student_id = store::student_id(self.store.as_ref())?;
        let appointment_id = self.backend.book_slot(slot_id, &student_id).await?;
        tracing::info!(slot_id = %slot_id, appointment_id = %appointment_id, "Slot booked");

        let company_id = lock(&self.state).selected_company_id;
        if let Some(company_id) = company_id {
            if let Err(e) = self.fetch_slots(company_id).await {
                tracing::warn!(company_id = %company_id, error = %e, "Availability refresh failed");
                lock(&self.state).notice = Some(format!(
                    "Booked, but availability could not be refreshed: {e}"
                ));
            }
        }

        let tz = lock(&self.state).time_zone.clone();
        Ok(ConfirmationParams::new(
            appointment_id.to_string(),
            slot_id.to_string(),
            tz,
        ))
    }
}
