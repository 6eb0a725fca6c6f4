use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::time_slot::TimeSlot;

/// A visitor's request to book one slot. Consumed once by the scheduler;
/// the external calendar is the system of record, nothing is kept locally.
#[derive(Debug, Clone)]
pub struct MeetingRequest {
    pub requester_name: String,
    pub requester_email: String,
    pub purpose: String,
    pub slot: TimeSlot,
}

/// Outcome of a scheduling attempt.
///
/// A conflicting booking is an expected outcome, not an error; transport,
/// authorization, and submission failures travel as
/// [`AssistantError`](crate::errors::AssistantError) instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BookingResult {
    /// The event was created; carries the external event identifier.
    Confirmed { event_id: String },
    /// The slot gained a conflicting event between display and submission.
    SlotUnavailable,
}

/// One busy interval reported by the calendar's free/busy query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
