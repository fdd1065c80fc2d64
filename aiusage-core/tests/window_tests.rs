//! Integration tests for window aggregation.

use aiusage_core::{Aggregator, PeriodBounds, UsageEvent, UsageWindow};
use chrono::{FixedOffset, TimeZone, Utc};

#[test]
fn test_three_events_today() {
    let now = Utc.with_ymd_and_hms(2025, 3, 12, 18, 0, 0).unwrap();
    let bounds = PeriodBounds::at(&now).unwrap();
    let events: Vec<_> = (0..3)
        .map(|h| {
            UsageEvent::at(Utc.with_ymd_and_hms(2025, 3, 12, 9 + h, 0, 0).unwrap())
                .with_input(Some(100))
                .with_output(Some(50))
        })
        .collect();

    let windows = Aggregator::aggregate(bounds, &events);
    let expected = UsageWindow {
        input_tokens: Some(300),
        output_tokens: Some(150),
        total_tokens: Some(450),
        cached_tokens: None,
        cost_usd: None,
        request_count: 3,
    };
    assert_eq!(windows.today, expected);
    assert_eq!(windows.this_week, expected);
    assert_eq!(windows.this_month, expected);
    assert_eq!(windows.total, expected);
}

#[test]
fn test_week_crossing_month_boundary() {
    // Saturday 2025-03-01 in a UTC-08:00 zone; the week began Monday Feb 24.
    let tz = FixedOffset::west_opt(8 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let bounds = PeriodBounds::at(&now).unwrap();

    let feb = UsageEvent::at(tz.with_ymd_and_hms(2025, 2, 25, 10, 0, 0).unwrap().with_timezone(&Utc))
        .with_total(Some(40));
    let windows = Aggregator::aggregate(bounds, [&feb]);

    assert_eq!(windows.this_week.total_tokens, Some(40));
    assert_eq!(windows.this_month.request_count, 0);
    assert_eq!(windows.total.total_tokens, Some(40));
}
