//! # Meeting Handlers
//!
//! Books a meeting on the owner's calendar. The booking path re-checks
//! availability immediately before submission, so a slot that looked free in
//! an earlier listing can still come back as taken here.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::sync::Arc;

use portfolio_core::{
    errors::AssistantError,
    models::meeting::{BookingResult, MeetingRequest},
    models::time_slot::TimeSlot,
};

use crate::{middleware::error_handling::AppError, ApiState};

/// Request body for booking a meeting
///
/// # Fields
///
/// * `name` - Visitor's display name, used in the event summary
/// * `email` - Visitor's email; invited as an attendee and notified
/// * `purpose` - Short description of what the meeting is about
/// * `start` - Requested slot start as an RFC 3339 timestamp with offset
#[derive(Debug, Deserialize)]
pub struct BookMeetingRequest {
    pub name: String,
    pub email: String,
    pub purpose: String,
    pub start: DateTime<FixedOffset>,
}

/// Books a meeting at the requested slot
///
/// # Endpoint
///
/// ```text
/// POST /api/meetings
/// ```
///
/// # Returns
///
/// * `201 Created` with the confirmed booking and calendar event id
/// * `409 Conflict` when the slot was taken between listing and booking
///
/// # Errors
///
/// * `AssistantError::Validation` - Empty name, malformed email, or a start
///   that falls outside business hours
/// * `AssistantError::BookingFailed` - The calendar rejected the event
/// * `AssistantError::Authorization` - Calendar credentials were refused
#[axum::debug_handler]
pub async fn book_meeting(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BookMeetingRequest>,
) -> Result<(StatusCode, Json<BookingResult>), AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError(AssistantError::Validation(
            "Name must not be empty".to_string(),
        )));
    }

    let email = payload.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError(AssistantError::Validation(format!(
            "Invalid email address: {email}"
        ))));
    }

    let start = payload.start.with_timezone(&state.scheduling.timezone);
    let slot = TimeSlot::new(start, state.scheduling.slot_minutes);

    let request = MeetingRequest {
        requester_name: name.to_string(),
        requester_email: email.to_string(),
        purpose: payload.purpose.trim().to_string(),
        slot,
    };

    let result = state.scheduler.schedule(&request).await?;

    let status = match &result {
        BookingResult::Confirmed { .. } => StatusCode::CREATED,
        BookingResult::SlotUnavailable => StatusCode::CONFLICT,
    };

    Ok((status, Json(result)))
}
