//! Check-then-act meeting booking.
//!
//! The availability re-check immediately before the insert narrows, but
//! cannot eliminate, the race against concurrent external bookings: the
//! calendar service exposes no conditional-create primitive, so the window
//! between check and insert is accepted as best effort.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use portfolio_core::config::SchedulingConfig;
use portfolio_core::errors::{AssistantError, AssistantResult};
use portfolio_core::models::meeting::{BookingResult, MeetingRequest};

use crate::client::{
    CalendarApi, ConferenceCreateRequest, ConferenceData, ConferenceSolutionKey, EventAttendee,
    EventDateTime, EventRequest, EventReminders, ReminderOverride,
};
use crate::oracle::AvailabilityOracle;

/// Books confirmed meetings on the external calendar.
pub struct Scheduler {
    oracle: Arc<dyn AvailabilityOracle>,
    api: Arc<dyn CalendarApi>,
    config: SchedulingConfig,
}

impl Scheduler {
    pub fn new(
        oracle: Arc<dyn AvailabilityOracle>,
        api: Arc<dyn CalendarApi>,
        config: SchedulingConfig,
    ) -> Self {
        Self {
            oracle,
            api,
            config,
        }
    }

    /// Attempt to confirm one requested slot.
    ///
    /// Availability is always re-verified first, even when the caller just
    /// displayed the slot as free: the window between display and
    /// submission is where concurrent bookings land. A busy slot yields
    /// `SlotUnavailable` without ever touching the create-event boundary.
    ///
    /// # Errors
    ///
    /// * `Validation` - the requested slot violates the business-hour
    ///   invariant
    /// * `BookingFailed` - the availability check passed but the insert
    ///   failed
    /// * `Transient` / `Authorization` - the availability check itself
    ///   could not be answered
    pub async fn schedule(&self, request: &MeetingRequest) -> AssistantResult<BookingResult> {
        self.config.validate_slot_start(&request.slot.start)?;

        if !self.oracle.is_free(&request.slot).await? {
            info!(
                slot = %request.slot.start.to_rfc3339(),
                "Requested slot gained a conflicting event"
            );
            return Ok(BookingResult::SlotUnavailable);
        }

        let event = self.build_event(request);
        let event_id = match self.api.insert_event(&self.config.calendar_id, &event).await {
            Ok(id) => id,
            Err(err @ AssistantError::Authorization(_)) => return Err(err),
            Err(err) => {
                warn!(error = %err, "Event creation failed after a passing availability check");
                return Err(AssistantError::BookingFailed(err.to_string()));
            }
        };

        info!(
            event_id = %event_id,
            attendee = %request.requester_email,
            slot = %request.slot.start.to_rfc3339(),
            "Meeting booked"
        );
        Ok(BookingResult::Confirmed { event_id })
    }

    fn build_event(&self, request: &MeetingRequest) -> EventRequest {
        let time_zone = self.config.timezone.name().to_string();

        EventRequest {
            summary: format!("Meeting with {}", request.requester_name),
            description: request.purpose.clone(),
            start: EventDateTime {
                date_time: request.slot.start.to_rfc3339(),
                time_zone: time_zone.clone(),
            },
            end: EventDateTime {
                date_time: request.slot.end().to_rfc3339(),
                time_zone,
            },
            attendees: vec![EventAttendee {
                email: request.requester_email.clone(),
            }],
            reminders: EventReminders {
                use_default: false,
                overrides: vec![
                    ReminderOverride {
                        method: "email".to_string(),
                        minutes: 24 * 60,
                    },
                    ReminderOverride {
                        method: "popup".to_string(),
                        minutes: 30,
                    },
                ],
            },
            conference_data: ConferenceData {
                create_request: ConferenceCreateRequest {
                    request_id: format!("meeting-{}", Uuid::new_v4()),
                    conference_solution_key: ConferenceSolutionKey {
                        kind: "hangoutsMeet".to_string(),
                    },
                },
            },
        }
    }
}
