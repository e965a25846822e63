//! Calendar time primitives: views, week policy, working window and slots.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult, ErrorContext};

/// The three calendar layouts a widget can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Month,
    Week,
    Day,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Month, ViewMode::Week, ViewMode::Day];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Month => "month",
            ViewMode::Week => "week",
            ViewMode::Day => "day",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(ViewMode::Month),
            "week" => Ok(ViewMode::Week),
            "day" => Ok(ViewMode::Day),
            _ => Err(CalendarError::invalid_view(s)),
        }
    }
}

/// First day of the week used by week and month layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Sunday,
    #[default]
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    /// First day of the week containing `date`.
    pub fn week_containing(self, date: NaiveDate) -> CalendarResult<NaiveDate> {
        let back = (date.weekday().num_days_from_monday() + 7
            - self.weekday().num_days_from_monday())
            % 7;
        date.checked_sub_days(Days::new(back as u64))
            .ok_or_else(|| out_of_range("week_containing", date))
    }
}

/// Validated `[start, end)` working window in whole hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    start: u32,
    end: u32,
}

impl WorkingHours {
    pub const MAX_HOUR: u32 = 23;

    /// Requires `0 <= start < end <= 23`.
    pub fn new(start: u32, end: u32) -> CalendarResult<Self> {
        if end > Self::MAX_HOUR {
            return Err(CalendarError::configuration_with_context(
                format!("working hours end must be <= {}", Self::MAX_HOUR),
                ErrorContext::new("working_hours")
                    .with_field("workingHoursEnd")
                    .with_value(end),
            ));
        }
        if start >= end {
            return Err(CalendarError::configuration_with_context(
                "working hours start must be before end",
                ErrorContext::new("working_hours")
                    .with_field("workingHoursStart")
                    .with_value(start)
                    .with_details(format!("end={}", end)),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start_hour(&self) -> u32 {
        self.start
    }

    pub fn end_hour(&self) -> u32 {
        self.end
    }

    pub fn start_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.start, 0, 0).unwrap_or(NaiveTime::MIN)
    }

    pub fn end_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.end, 0, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Length of the window in minutes.
    pub fn minutes(&self) -> u32 {
        (self.end - self.start) * 60
    }
}

/// Validated slot length in minutes, `15..=120`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotDuration(u32);

impl SlotDuration {
    pub const MIN_MINUTES: u32 = 15;
    pub const MAX_MINUTES: u32 = 120;

    pub fn new(minutes: u32) -> CalendarResult<Self> {
        if !(Self::MIN_MINUTES..=Self::MAX_MINUTES).contains(&minutes) {
            return Err(CalendarError::configuration_with_context(
                format!(
                    "time slot must be between {} and {} minutes",
                    Self::MIN_MINUTES,
                    Self::MAX_MINUTES
                ),
                ErrorContext::new("slot_duration")
                    .with_field("timeSlotMinutes")
                    .with_value(minutes),
            ));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    pub fn as_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.0 as i64)
    }
}

/// A slot of the day grid, independent of any date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotSpan {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl SlotSpan {
    /// Anchor this span on a concrete date.
    pub fn on(&self, date: NaiveDate) -> TimeSlot {
        TimeSlot {
            date,
            start: self.start,
            end: self.end,
        }
    }
}

/// A dated time slot, `[start, end)` on `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn start_datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.start)
    }

    pub fn end_datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.end)
    }

    /// Whether `[start, end)` intersects this slot.
    pub fn intersects(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start < self.end_datetime() && end > self.start_datetime()
    }
}

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a host timestamp into wall-clock time.
///
/// RFC 3339 offsets are dropped and the local wall-clock reading is kept; a bare
/// `YYYY-MM-DD` means midnight.
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Parse a calendar date, accepting a bare date or any timestamp form.
pub fn parse_date(input: &str) -> CalendarResult<NaiveDate> {
    let s = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    parse_timestamp(s).map(|dt| dt.date()).ok_or_else(|| {
        CalendarError::invalid_date_with_context(
            "expected YYYY-MM-DD or an ISO 8601 timestamp",
            ErrorContext::new("parse_date").with_value(input),
        )
    })
}

pub(crate) fn out_of_range(operation: &str, date: NaiveDate) -> CalendarError {
    CalendarError::invalid_date_with_context(
        "date arithmetic out of supported range",
        ErrorContext::new(operation).with_value(date),
    )
}
