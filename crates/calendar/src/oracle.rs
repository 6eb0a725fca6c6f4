//! Availability oracle: answers "is this slot free?" for exactly one slot
//! window via the calendar's free/busy query.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use portfolio_core::errors::AssistantResult;
use portfolio_core::models::time_slot::TimeSlot;

use crate::client::CalendarApi;

/// Availability check for a single slot.
///
/// Transport or authorization failures surface as errors, never as "busy":
/// callers must be able to tell "slot taken" from "cannot determine
/// availability".
#[async_trait]
pub trait AvailabilityOracle: Send + Sync {
    async fn is_free(&self, slot: &TimeSlot) -> AssistantResult<bool>;
}

/// Oracle backed by the calendar free/busy query against one configured
/// calendar identifier.
pub struct FreeBusyOracle {
    api: Arc<dyn CalendarApi>,
    calendar_id: String,
}

impl FreeBusyOracle {
    pub fn new(api: Arc<dyn CalendarApi>, calendar_id: impl Into<String>) -> Self {
        Self {
            api,
            calendar_id: calendar_id.into(),
        }
    }
}

#[async_trait]
impl AvailabilityOracle for FreeBusyOracle {
    async fn is_free(&self, slot: &TimeSlot) -> AssistantResult<bool> {
        let busy = self
            .api
            .free_busy(
                &self.calendar_id,
                slot.start.with_timezone(&Utc),
                slot.end().with_timezone(&Utc),
            )
            .await?;

        Ok(busy.is_empty())
    }
}
