use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::Serialize;

/// A bookable half-open time window `[start, start + duration)` in the
/// configured timezone. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub start: DateTime<Tz>,
    /// Slot length in minutes (fixed by configuration, default 30)
    pub duration_minutes: i64,
}

impl TimeSlot {
    pub fn new(start: DateTime<Tz>, duration_minutes: i64) -> Self {
        Self {
            start,
            duration_minutes,
        }
    }

    /// Exclusive end of the window.
    pub fn end(&self) -> DateTime<Tz> {
        self.start + Duration::minutes(self.duration_minutes)
    }
}
