//! Derived slot availability.
//!
//! A slot's booked count is never stored. It is computed per request by
//! grouping the `booked` appointments that reference each slot and attaching
//! the count (zero when there are none) to every slot of the company.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Appointment status that counts against a slot's capacity.
pub const STATUS_BOOKED: &str = "booked";

/// Minimal view of a time slot needed to derive availability.
pub trait BookableSlot {
    fn slot_id(&self) -> DbId;
    fn capacity(&self) -> i32;
    fn start_time(&self) -> Timestamp;
}

/// A slot annotated with its booked count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotAvailability<S> {
    #[serde(flatten)]
    pub slot: S,
    pub booked_count: i64,
    pub is_full: bool,
}

/// A slot is full once the booked count reaches capacity.
///
/// Counts above capacity are reported as full; enforcement happens in the
/// booking procedure, not here.
pub fn is_full(booked_count: i64, capacity: i32) -> bool {
    booked_count >= i64::from(capacity)
}

/// Attach booked counts to `slots`.
///
/// `booked_slot_ids` holds one entry per `booked` appointment. Ids that do
/// not belong to any slot in `slots` are ignored. The result is ordered by
/// start time; slots sharing a start time keep their input order.
pub fn attach_booked_counts<S, I>(slots: Vec<S>, booked_slot_ids: I) -> Vec<SlotAvailability<S>>
where
    S: BookableSlot,
    I: IntoIterator<Item = DbId>,
{
    let mut counts: HashMap<DbId, i64> = HashMap::with_capacity(slots.len());
    for slot_id in booked_slot_ids {
        *counts.entry(slot_id).or_insert(0) += 1;
    }

    let mut merged: Vec<SlotAvailability<S>> = slots
        .into_iter()
        .map(|slot| {
            let booked_count = counts.get(&slot.slot_id()).copied().unwrap_or(0);
            let is_full = is_full(booked_count, slot.capacity());
            SlotAvailability {
                slot,
                booked_count,
                is_full,
            }
        })
        .collect();

    merged.sort_by_key(|s| s.slot.start_time());
    merged
}
