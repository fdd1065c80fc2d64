//! Time-window aggregation.
//!
//! [`PeriodBounds`] turns a reference "now" into half-open `[start, end)`
//! intervals for today, this week (Monday start), and this month, all in the
//! timezone of the reference instant. [`Aggregator`] then assigns each event
//! to every window whose interval contains its timestamp. Each window is
//! filled independently from the full event sequence, so a window is never
//! derived from a smaller one and event order never matters.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::{Period, UsageEvent, UsageWindows};

// ============================================================================
// Period Bounds
// ============================================================================

/// A half-open time interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Returns true if `ts` lies in `[start, end)`.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts < self.end
    }
}

/// Window boundaries computed for one reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBounds {
    now: DateTime<Utc>,
    date: NaiveDate,
    today: Interval,
    this_week: Interval,
    this_month: Interval,
}

impl PeriodBounds {
    /// Computes the bounds for `now`, using the calendar of `now`'s timezone.
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Result<Self, CoreError> {
        let tz = now.timezone();
        let date = now.date_naive();

        let next_day = date
            .succ_opt()
            .ok_or_else(|| CoreError::InvalidBoundary(format!("day after {date}")))?;
        let today = Interval {
            start: local_midnight(&tz, date)?,
            end: local_midnight(&tz, next_day)?,
        };

        let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
        let this_week = Interval {
            start: local_midnight(&tz, monday)?,
            end: local_midnight(&tz, monday + Duration::days(7))?,
        };

        let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
            .ok_or_else(|| CoreError::InvalidBoundary(format!("first of month for {date}")))?;
        let (next_year, next_month) = if date.month() == 12 {
            (date.year() + 1, 1)
        } else {
            (date.year(), date.month() + 1)
        };
        let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .ok_or_else(|| CoreError::InvalidBoundary(format!("month after {date}")))?;
        let this_month = Interval {
            start: local_midnight(&tz, first)?,
            end: local_midnight(&tz, next_first)?,
        };

        Ok(Self {
            now: now.with_timezone(&Utc),
            date,
            today,
            this_week,
            this_month,
        })
    }

    /// Computes the bounds for `now` in the machine's local timezone.
    pub fn local(now: DateTime<Utc>) -> Result<Self, CoreError> {
        Self::at(&now.with_timezone(&chrono::Local))
    }

    /// The reference instant.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// The calendar date of the reference instant in its own timezone.
    pub fn local_date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the interval for a period (`None` for [`Period::Total`]).
    pub fn interval(&self, period: Period) -> Option<Interval> {
        match period {
            Period::Today => Some(self.today),
            Period::ThisWeek => Some(self.this_week),
            Period::ThisMonth => Some(self.this_month),
            Period::Total => None,
        }
    }

    /// Returns true if an event with this timestamp belongs to `period`.
    ///
    /// Events without a timestamp belong to [`Period::Total`] only.
    pub fn contains(&self, period: Period, ts: Option<DateTime<Utc>>) -> bool {
        match (self.interval(period), ts) {
            (None, _) => true,
            (Some(interval), Some(ts)) => interval.contains(ts),
            (Some(_), None) => false,
        }
    }
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateTime<Utc>, CoreError> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
        // Midnight skipped by a DST jump; the day starts at the first valid instant.
        LocalResult::None => tz
            .from_local_datetime(&(midnight + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| CoreError::InvalidBoundary(format!("midnight of {date}"))),
    }
}

// ============================================================================
// Aggregator
// ============================================================================

/// Buckets canonical events into the four usage windows.
#[derive(Debug, Clone)]
pub struct Aggregator {
    bounds: PeriodBounds,
    windows: UsageWindows,
    events: u64,
}

impl Aggregator {
    /// Creates an empty aggregator for the given bounds.
    pub fn new(bounds: PeriodBounds) -> Self {
        Self {
            bounds,
            windows: UsageWindows::default(),
            events: 0,
        }
    }

    /// Adds one event to every window that contains it.
    pub fn add(&mut self, event: &UsageEvent) {
        for &period in Period::all() {
            if self.bounds.contains(period, event.timestamp()) {
                self.windows.get_mut(period).add_event(event);
            }
        }
        self.events += 1;
    }

    /// Adds every event from an iterator.
    pub fn extend<'a, I>(&mut self, events: I)
    where
        I: IntoIterator<Item = &'a UsageEvent>,
    {
        for event in events {
            self.add(event);
        }
    }

    /// Number of events seen so far.
    pub fn event_count(&self) -> u64 {
        self.events
    }

    /// Returns the accumulated windows.
    pub fn finish(self) -> UsageWindows {
        self.windows
    }

    /// Aggregates a complete event sequence in one call.
    pub fn aggregate<'a, I>(bounds: PeriodBounds, events: I) -> UsageWindows
    where
        I: IntoIterator<Item = &'a UsageEvent>,
    {
        let mut aggregator = Self::new(bounds);
        aggregator.extend(events);
        aggregator.finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
