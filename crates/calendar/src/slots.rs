//! Enumeration of free meeting slots inside business hours.
//!
//! The scan starts at "now" in the configured timezone, advances in
//! slot-granularity increments, skips weekends and out-of-hours stretches,
//! and asks the availability oracle about each candidate. The scan is
//! bounded by the configured horizon so a fully booked (or permanently
//! erroring) calendar terminates instead of looping.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use tracing::debug;

use portfolio_core::config::SchedulingConfig;
use portfolio_core::errors::{AssistantError, AssistantResult};
use portfolio_core::models::time_slot::TimeSlot;

use crate::oracle::AvailabilityOracle;

/// Finds the next free business-hour slots on the configured calendar.
pub struct SlotFinder {
    oracle: Arc<dyn AvailabilityOracle>,
    config: SchedulingConfig,
}

impl SlotFinder {
    pub fn new(oracle: Arc<dyn AvailabilityOracle>, config: SchedulingConfig) -> Self {
        Self { oracle, config }
    }

    /// The next `count` free slots starting from now.
    ///
    /// # Errors
    ///
    /// `HorizonExhausted` when the scan passes the configured horizon before
    /// collecting `count` slots; oracle failures propagate immediately.
    pub async fn next_available_slots(&self, count: usize) -> AssistantResult<Vec<TimeSlot>> {
        let now = Utc::now().with_timezone(&self.config.timezone);
        self.next_available_slots_from(now, count).await
    }

    /// Same scan with an explicit starting instant.
    pub async fn next_available_slots_from(
        &self,
        from: DateTime<Tz>,
        count: usize,
    ) -> AssistantResult<Vec<TimeSlot>> {
        let horizon = from + Duration::days(self.config.horizon_days);
        let mut cursor = self.align_to_boundary(from);
        let mut slots = Vec::with_capacity(count);

        while slots.len() < count {
            if cursor >= horizon {
                debug!(
                    collected = slots.len(),
                    wanted = count,
                    "Slot scan hit the horizon"
                );
                return Err(AssistantError::HorizonExhausted {
                    days: self.config.horizon_days,
                });
            }

            if !self.config.is_within_business_hours(&cursor) {
                cursor = self.next_business_open(cursor)?;
                continue;
            }

            let candidate = TimeSlot::new(cursor, self.config.slot_minutes);
            if self.oracle.is_free(&candidate).await? {
                slots.push(candidate);
            }
            cursor += self.config.slot_duration();
        }

        Ok(slots)
    }

    /// Round an instant up to the next slot boundary (no-op if already on
    /// one).
    fn align_to_boundary(&self, instant: DateTime<Tz>) -> DateTime<Tz> {
        let mut aligned = instant;

        let sub_minute =
            Duration::seconds(i64::from(aligned.second())) + Duration::nanoseconds(i64::from(aligned.nanosecond()));
        if !sub_minute.is_zero() {
            aligned = aligned - sub_minute + Duration::minutes(1);
        }

        let remainder = i64::from(aligned.minute()) % self.config.slot_minutes;
        if remainder != 0 {
            aligned += Duration::minutes(self.config.slot_minutes - remainder);
        }

        aligned
    }

    /// The next instant the business day opens: same-day open when the
    /// cursor sits before opening on a weekday, otherwise the next
    /// weekday's opening time.
    fn next_business_open(&self, cursor: DateTime<Tz>) -> AssistantResult<DateTime<Tz>> {
        if self.config.is_business_day(cursor.weekday())
            && cursor.hour() < self.config.business_start_hour
        {
            return self.business_open(cursor.date_naive());
        }

        let mut date = cursor.date_naive();
        loop {
            date = date
                .succ_opt()
                .ok_or_else(|| AssistantError::Validation("date overflow in slot scan".into()))?;
            if self.config.is_business_day(date.weekday()) {
                return self.business_open(date);
            }
        }
    }

    fn business_open(&self, date: NaiveDate) -> AssistantResult<DateTime<Tz>> {
        let naive = date
            .and_hms_opt(self.config.business_start_hour, 0, 0)
            .ok_or_else(|| {
                AssistantError::Validation(format!(
                    "invalid business start hour {}",
                    self.config.business_start_hour
                ))
            })?;

        self.config
            .timezone
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| {
                AssistantError::Validation(format!("business open does not exist on {date}"))
            })
    }
}
