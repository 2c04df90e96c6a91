//! In-memory [`Backend`] for view tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use careerkey_core::availability::is_full;
use careerkey_core::profile::ResolvedProfile;
use careerkey_core::student::AnonymousStudentId;
use careerkey_core::types::DbId;
use chrono::{Duration, TimeZone, Utc};
use tokio::sync::Notify;
use uuid::Uuid;

use crate::backend::{Backend, Company, Session, SignUpForm, Slot, SlotView};
use crate::error::ClientError;

/// Holds `book_slot` until released, so tests can observe an in-flight booking.
#[derive(Default)]
pub(crate) struct BookingGate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    pub companies: Mutex<Vec<Company>>,
    pub slots: Mutex<Vec<SlotView>>,
    pub profile: Mutex<Option<ResolvedProfile>>,
    pub calls: Mutex<Vec<&'static str>>,
    pub bookings: Mutex<Vec<(DbId, String)>>,
    failures: Mutex<HashMap<&'static str, String>>,
    gate: Option<Arc<BookingGate>>,
}

impl FakeBackend {
    pub fn gated(gate: Arc<BookingGate>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    /// Make every later call to `op` fail with `message`.
    pub fn fail(&self, op: &'static str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(op, message.to_string());
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn add_company(&self, name: &str) -> Company {
        let company = Company {
            id: Uuid::new_v4(),
            company_name: name.to_string(),
        };
        self.companies.lock().unwrap().push(company.clone());
        company
    }

    /// Add a 30-minute slot starting `offset_mins` after 2024-03-01 14:00 UTC.
    pub fn add_slot(&self, company: &Company, offset_mins: i64, capacity: i32, booked: i64) -> Slot {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap()
            + Duration::minutes(offset_mins);
        let slot = Slot {
            id: Uuid::new_v4(),
            company_id: company.id,
            start_time: start,
            end_time: start + Duration::minutes(30),
            capacity,
        };
        self.slots.lock().unwrap().push(SlotView {
            slot: slot.clone(),
            booked_count: booked,
            is_full: is_full(booked, capacity),
        });
        slot
    }

    fn enter(&self, op: &'static str) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(op);
        match self.failures.lock().unwrap().get(op) {
            Some(message) => Err(ClientError::Api {
                status: 500,
                code: "TEST_FAILURE".to_string(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn not_found(entity: &str, id: DbId) -> ClientError {
    ClientError::Api {
        status: 404,
        code: "NOT_FOUND".to_string(),
        message: format!("{entity} with id {id} not found"),
    }
}

/// Rejection shape of the booking endpoint.
fn booking_failed(message: &str) -> ClientError {
    ClientError::Api {
        status: 409,
        code: "BOOKING_FAILED".to_string(),
        message: message.to_string(),
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn sign_up(&self, _: &SignUpForm) -> Result<Session, ClientError> {
        unimplemented!("not used by view tests")
    }

    async fn sign_in(&self, _: &str, _: &str) -> Result<Session, ClientError> {
        unimplemented!("not used by view tests")
    }

    async fn sign_out(&self, _: &str) -> Result<(), ClientError> {
        self.enter("sign_out")
    }

    async fn resolve_profile(&self, _: &str) -> Result<ResolvedProfile, ClientError> {
        self.enter("resolve_profile")?;
        Ok(self.profile.lock().unwrap().clone().unwrap_or(ResolvedProfile {
            role: Default::default(),
            display_name: None,
            created: false,
            warning: None,
        }))
    }

    async fn list_companies(&self) -> Result<Vec<Company>, ClientError> {
        self.enter("list_companies")?;
        let mut companies = self.companies.lock().unwrap().clone();
        companies.sort_by(|a, b| a.company_name.cmp(&b.company_name));
        Ok(companies)
    }

    async fn get_company(&self, id: DbId) -> Result<Company, ClientError> {
        self.enter("get_company")?;
        self.companies
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| not_found("Company", id))
    }

    async fn list_slots(&self, company_id: DbId) -> Result<Vec<SlotView>, ClientError> {
        self.enter("list_slots")?;
        let mut slots: Vec<SlotView> = self
            .slots
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.slot.company_id == company_id)
            .cloned()
            .collect();
        slots.sort_by_key(|v| v.slot.start_time);
        Ok(slots)
    }

    async fn get_slot(&self, id: DbId) -> Result<Slot, ClientError> {
        self.enter("get_slot")?;
        self.slots
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.slot.id == id)
            .map(|v| v.slot.clone())
            .ok_or_else(|| not_found("TimeSlot", id))
    }

    async fn book_slot(
        &self,
        slot_id: DbId,
        student_id: &AnonymousStudentId,
    ) -> Result<DbId, ClientError> {
        self.enter("book_slot")?;
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let mut slots = self.slots.lock().unwrap();
        let view = slots
            .iter_mut()
            .find(|v| v.slot.id == slot_id)
            .ok_or_else(|| booking_failed("Time slot not found"))?;
        if view.booked_count >= i64::from(view.slot.capacity) {
            return Err(booking_failed("This time slot is full"));
        }
        view.booked_count += 1;
        view.is_full = is_full(view.booked_count, view.slot.capacity);

        self.bookings
            .lock()
            .unwrap()
            .push((slot_id, student_id.as_str().to_string()));
        Ok(Uuid::new_v4())
    }
}
