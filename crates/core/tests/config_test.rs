use chrono::TimeZone;
use chrono_tz::America::New_York;
use portfolio_core::config::SchedulingConfig;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_defaults() {
    let config = SchedulingConfig::default();
    assert_eq!(config.timezone, chrono_tz::America::New_York);
    assert_eq!(config.business_start_hour, 9);
    assert_eq!(config.business_end_hour, 17);
    assert_eq!(config.slot_minutes, 30);
    assert_eq!(config.horizon_days, 30);
    assert_eq!(config.calendar_id, "primary");
}

#[rstest]
// Tuesday 09:00, first slot of the day
#[case(2024, 1, 2, 9, 0, true)]
// Tuesday 16:30, last slot of the day
#[case(2024, 1, 2, 16, 30, true)]
// Tuesday 17:00, business day already over
#[case(2024, 1, 2, 17, 0, false)]
// Tuesday 08:30, before opening
#[case(2024, 1, 2, 8, 30, false)]
// Saturday 10:00, weekend
#[case(2024, 1, 6, 10, 0, false)]
// Tuesday 09:15, off the 30-minute boundary
#[case(2024, 1, 2, 9, 15, false)]
fn test_validate_slot_start(
    #[case] year: i32,
    #[case] month: u32,
    #[case] day: u32,
    #[case] hour: u32,
    #[case] minute: u32,
    #[case] expect_valid: bool,
) {
    let config = SchedulingConfig::default();
    let start = New_York
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap();

    assert_eq!(config.validate_slot_start(&start).is_ok(), expect_valid);
}

#[test]
fn test_boundary_check_rejects_seconds() {
    let config = SchedulingConfig::default();
    let start = New_York.with_ymd_and_hms(2024, 1, 2, 9, 0, 30).unwrap();
    assert!(!config.is_on_slot_boundary(&start));
}
