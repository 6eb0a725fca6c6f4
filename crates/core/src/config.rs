//! Scheduling configuration.
//!
//! A fixed-field struct rather than an open-ended map: the set of knobs is
//! known (timezone, business hours, slot granularity, scan horizon, calendar
//! id) and every consumer gets the same typed view.

use chrono::{DateTime, Datelike, Duration, Timelike, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::{AssistantError, AssistantResult};

/// Scheduling policy for the meeting booking core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingConfig {
    /// Timezone all slots are generated and booked in
    pub timezone: Tz,
    /// First bookable hour of the day (inclusive)
    pub business_start_hour: u32,
    /// Hour the business day ends (exclusive)
    pub business_end_hour: u32,
    /// Slot granularity in minutes
    pub slot_minutes: i64,
    /// How far ahead the slot scan may look before giving up
    pub horizon_days: i64,
    /// Identifier of the calendar bookings land on
    pub calendar_id: String,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::New_York,
            business_start_hour: 9,
            business_end_hour: 17,
            slot_minutes: 30,
            horizon_days: 30,
            calendar_id: "primary".to_string(),
        }
    }
}

impl SchedulingConfig {
    /// Duration of a single slot.
    pub fn slot_duration(&self) -> Duration {
        Duration::minutes(self.slot_minutes)
    }

    /// Whether the given weekday is a business day (Monday through Friday).
    pub fn is_business_day(&self, weekday: Weekday) -> bool {
        !matches!(weekday, Weekday::Sat | Weekday::Sun)
    }

    /// Whether an instant falls inside business hours on a business day.
    pub fn is_within_business_hours(&self, instant: &DateTime<Tz>) -> bool {
        self.is_business_day(instant.weekday())
            && instant.hour() >= self.business_start_hour
            && instant.hour() < self.business_end_hour
    }

    /// Whether an instant sits exactly on a slot-granularity boundary.
    pub fn is_on_slot_boundary(&self, instant: &DateTime<Tz>) -> bool {
        instant.second() == 0
            && instant.nanosecond() == 0
            && i64::from(instant.minute()) % self.slot_minutes == 0
    }

    /// Validate that `start` is a legal slot start: on a boundary, inside
    /// business hours, on a weekday.
    pub fn validate_slot_start(&self, start: &DateTime<Tz>) -> AssistantResult<()> {
        if !self.is_on_slot_boundary(start) {
            return Err(AssistantError::Validation(format!(
                "Slot start {} is not on a {}-minute boundary",
                start.to_rfc3339(),
                self.slot_minutes
            )));
        }
        if !self.is_business_day(start.weekday()) {
            return Err(AssistantError::Validation(format!(
                "Slot start {} falls on a weekend",
                start.to_rfc3339()
            )));
        }
        if !self.is_within_business_hours(start) {
            return Err(AssistantError::Validation(format!(
                "Slot start {} is outside business hours ({:02}:00-{:02}:00)",
                start.to_rfc3339(),
                self.business_start_hour,
                self.business_end_hour
            )));
        }
        Ok(())
    }
}
