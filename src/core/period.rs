//! Calendar-month monitoring periods.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Calendar convention used to place month boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarMode {
    #[default]
    Utc,
    Local,
}

/// Half-open `[start, end)` window covering one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonitoringPeriod {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// Resolves the current monitoring period from wall-clock time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodClock {
    mode: CalendarMode,
}

impl PeriodClock {
    pub fn new(mode: CalendarMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> CalendarMode {
        self.mode
    }

    /// First instant of the calendar month containing `now`.
    pub fn current_period_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let (year, month) = self.year_month(now);
        self.month_start(year, month)
    }

    /// First instant of the calendar month after the one containing `now`.
    pub fn next_period_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let (year, month) = self.year_month(now);
        let (year, month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        self.month_start(year, month)
    }

    pub fn period_containing(&self, now: DateTime<Utc>) -> MonitoringPeriod {
        MonitoringPeriod {
            start: self.current_period_start(now),
            end: self.next_period_start(now),
        }
    }

    /// Wait until the next boundary; never zero while `now` lies inside its period.
    pub fn time_until_next_period(&self, now: DateTime<Utc>) -> StdDuration {
        (self.next_period_start(now) - now)
            .to_std()
            .unwrap_or_default()
    }

    /// One-based day within the current period.
    pub fn day_of_period(&self, now: DateTime<Utc>) -> u32 {
        self.local_date(now).day()
    }

    fn year_month(&self, now: DateTime<Utc>) -> (i32, u32) {
        let date = self.local_date(now);
        (date.year(), date.month())
    }

    fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        match self.mode {
            CalendarMode::Utc => now.date_naive(),
            CalendarMode::Local => now.with_timezone(&Local).date_naive(),
        }
    }

    fn month_start(&self, year: i32, month: u32) -> DateTime<Utc> {
        let naive = NaiveDate::from_ymd_opt(year, month, 1)
            .unwrap_or(NaiveDate::MAX)
            .and_time(NaiveTime::MIN);
        match self.mode {
            CalendarMode::Utc => Utc.from_utc_datetime(&naive),
            CalendarMode::Local => zone_midnight(&Local, naive),
        }
    }
}

/// First instant of `naive` midnight in `zone`, as UTC.
///
/// Zones that skip midnight on a DST switch start the month at the first valid
/// local time after the gap.
fn zone_midnight<Tz: TimeZone>(zone: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    zone.from_local_datetime(&naive)
        .earliest()
        .or_else(|| zone.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}
