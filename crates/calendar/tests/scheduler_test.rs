use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use chrono_tz::America::New_York;
use portfolio_calendar::mock::{MockApi, MockOracle};
use portfolio_calendar::Scheduler;
use portfolio_core::config::SchedulingConfig;
use portfolio_core::errors::AssistantError;
use portfolio_core::models::meeting::{BookingResult, MeetingRequest};
use portfolio_core::models::time_slot::TimeSlot;
use pretty_assertions::assert_eq;

fn request_at_nine_thirty() -> MeetingRequest {
    MeetingRequest {
        requester_name: "Alice".to_string(),
        requester_email: "a@x.com".to_string(),
        purpose: "intro call".to_string(),
        slot: TimeSlot::new(
            New_York.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap(),
            30,
        ),
    }
}

fn scheduler_with(oracle: MockOracle, api: MockApi) -> Scheduler {
    Scheduler::new(Arc::new(oracle), Arc::new(api), SchedulingConfig::default())
}

#[tokio::test]
async fn test_busy_slot_never_reaches_the_create_boundary() {
    let mut oracle = MockOracle::new();
    oracle.expect_is_free().times(1).returning(|_| Ok(false));

    let mut api = MockApi::new();
    api.expect_insert_event().times(0);

    let scheduler = scheduler_with(oracle, api);
    let result = scheduler.schedule(&request_at_nine_thirty()).await.unwrap();

    assert_eq!(result, BookingResult::SlotUnavailable);
}

#[tokio::test]
async fn test_free_slot_books_exactly_once_with_request_details() {
    let mut oracle = MockOracle::new();
    oracle.expect_is_free().times(1).returning(|_| Ok(true));

    let mut api = MockApi::new();
    api.expect_insert_event()
        .times(1)
        .withf(|calendar_id, event| {
            let start: DateTime<chrono::FixedOffset> =
                event.start.date_time.parse().expect("start must be RFC3339");
            let end: DateTime<chrono::FixedOffset> =
                event.end.date_time.parse().expect("end must be RFC3339");

            calendar_id == "primary"
                && event.summary == "Meeting with Alice"
                && event.description == "intro call"
                && event.attendees.len() == 1
                && event.attendees[0].email == "a@x.com"
                && (end - start) == chrono::Duration::minutes(30)
                && event.start.time_zone == "America/New_York"
                && !event.reminders.use_default
        })
        .returning(|_, _| Ok("evt_xyz".to_string()));

    let scheduler = scheduler_with(oracle, api);
    let result = scheduler.schedule(&request_at_nine_thirty()).await.unwrap();

    assert_eq!(
        result,
        BookingResult::Confirmed {
            event_id: "evt_xyz".to_string()
        }
    );
}

#[tokio::test]
async fn test_reminder_policy_is_email_day_before_and_popup_half_hour() {
    let mut oracle = MockOracle::new();
    oracle.expect_is_free().returning(|_| Ok(true));

    let mut api = MockApi::new();
    api.expect_insert_event()
        .withf(|_, event| {
            let overrides = &event.reminders.overrides;
            overrides.len() == 2
                && overrides
                    .iter()
                    .any(|o| o.method == "email" && o.minutes == 24 * 60)
                && overrides.iter().any(|o| o.method == "popup" && o.minutes == 30)
        })
        .returning(|_, _| Ok("evt_1".to_string()));

    let scheduler = scheduler_with(oracle, api);
    let result = scheduler.schedule(&request_at_nine_thirty()).await.unwrap();
    assert!(matches!(result, BookingResult::Confirmed { .. }));
}

#[tokio::test]
async fn test_insert_failure_is_booking_failed_not_slot_unavailable() {
    let mut oracle = MockOracle::new();
    oracle.expect_is_free().returning(|_| Ok(true));

    let mut api = MockApi::new();
    api.expect_insert_event()
        .returning(|_, _| Err(AssistantError::Transient("502 bad gateway".to_string())));

    let scheduler = scheduler_with(oracle, api);
    let err = scheduler
        .schedule(&request_at_nine_thirty())
        .await
        .unwrap_err();

    assert!(matches!(err, AssistantError::BookingFailed(_)));
}

#[tokio::test]
async fn test_authorization_failure_on_insert_stays_distinct() {
    let mut oracle = MockOracle::new();
    oracle.expect_is_free().returning(|_| Ok(true));

    let mut api = MockApi::new();
    api.expect_insert_event()
        .returning(|_, _| Err(AssistantError::Authorization("401".to_string())));

    let scheduler = scheduler_with(oracle, api);
    let err = scheduler
        .schedule(&request_at_nine_thirty())
        .await
        .unwrap_err();

    assert!(matches!(err, AssistantError::Authorization(_)));
}

#[tokio::test]
async fn test_oracle_failure_propagates_before_booking() {
    let mut oracle = MockOracle::new();
    oracle
        .expect_is_free()
        .returning(|_| Err(AssistantError::Transient("freebusy timeout".to_string())));

    let mut api = MockApi::new();
    api.expect_insert_event().times(0);

    let scheduler = scheduler_with(oracle, api);
    let err = scheduler
        .schedule(&request_at_nine_thirty())
        .await
        .unwrap_err();

    assert!(matches!(err, AssistantError::Transient(_)));
}

#[tokio::test]
async fn test_weekend_slot_is_rejected_without_any_calendar_call() {
    let mut oracle = MockOracle::new();
    oracle.expect_is_free().times(0);
    let mut api = MockApi::new();
    api.expect_insert_event().times(0);

    let scheduler = scheduler_with(oracle, api);
    let mut request = request_at_nine_thirty();
    // Saturday 2024-01-06 10:00
    request.slot = TimeSlot::new(
        New_York.with_ymd_and_hms(2024, 1, 6, 10, 0, 0).unwrap(),
        30,
    );

    let err = scheduler.schedule(&request).await.unwrap_err();
    assert!(matches!(err, AssistantError::Validation(_)));
}
