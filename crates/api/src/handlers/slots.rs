//! # Slot Handlers
//!
//! Lists the next bookable meeting slots. The scan walks business hours
//! forward from the current moment, consulting the availability oracle for
//! each candidate, and stops at the configured horizon.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use portfolio_core::errors::AssistantError;

use crate::{middleware::error_handling::AppError, ApiState};

/// Upper bound on how many slots one request may ask for.
const MAX_SLOT_COUNT: usize = 20;

/// Query parameters for the slot listing endpoint
///
/// # Fields
///
/// * `count` - Maximum number of free slots to return (default: 5, capped at 20)
#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    /// Maximum number of free slots to return
    pub count: Option<usize>,
}

/// A single bookable slot, rendered with explicit start and end instants.
#[derive(Debug, Serialize)]
pub struct SlotView {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize)]
pub struct SlotsResponse {
    pub slots: Vec<SlotView>,
}

/// Returns the next free meeting slots on the owner's calendar
///
/// # Endpoint
///
/// ```text
/// GET /api/slots?count=5
/// ```
///
/// # Returns
///
/// * `Result<Json<SlotsResponse>, AppError>` - Free slots in chronological
///   order, each with RFC 3339 start and end timestamps in the configured
///   timezone
///
/// # Errors
///
/// * `AssistantError::Validation` - `count` is zero
/// * `AssistantError::HorizonExhausted` - No free slot inside the scan horizon
/// * `AssistantError::Transient` - The calendar backend could not be reached
#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let count = query.count.unwrap_or(5);
    if count == 0 {
        return Err(AppError(AssistantError::Validation(
            "count must be at least 1".to_string(),
        )));
    }
    let count = count.min(MAX_SLOT_COUNT);

    let slots = state.slot_finder.next_available_slots(count).await?;

    let slots = slots
        .iter()
        .map(|slot| SlotView {
            start: slot.start.to_rfc3339(),
            end: slot.end().to_rfc3339(),
        })
        .collect();

    Ok(Json(SlotsResponse { slots }))
}
