//! Day slot grid bounded by working hours.
//!
//! Slots tile the working window from `start:00`. When the slot length does not
//! divide the window, the trailing remainder is dropped rather than emitted as a
//! short slot, so a window of `W` minutes always yields `floor(W / slot)` slots.

use std::ops::Range;

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;

use crate::error::CalendarResult;
use crate::models::{SlotDuration, SlotSpan, TimeSlot, WorkingHours};

/// Build the ordered slots of a working day.
///
/// # Errors
///
/// `ConfigurationError` if `start_hour >= end_hour`, `end_hour > 23`, or
/// `slot_minutes` is outside `15..=120`.
///
/// # Example
///
/// ```
/// use calendar_pro::algorithms::build_day_slots;
///
/// let slots = build_day_slots(6, 22, 30).unwrap();
/// assert_eq!(slots.len(), 32);
/// assert_eq!(slots[0].start.to_string(), "06:00:00");
/// ```
pub fn build_day_slots(
    start_hour: u32,
    end_hour: u32,
    slot_minutes: u32,
) -> CalendarResult<Vec<SlotSpan>> {
    Ok(TimeGrid::from_settings(start_hour, end_hour, slot_minutes)?.spans)
}

/// Validated working window plus its precomputed slot spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeGrid {
    hours: WorkingHours,
    slot: SlotDuration,
    spans: Vec<SlotSpan>,
}

impl TimeGrid {
    pub fn new(hours: WorkingHours, slot: SlotDuration) -> Self {
        let step = slot.as_duration();
        let count = hours.minutes() / slot.minutes();
        let remainder = hours.minutes() % slot.minutes();
        if remainder != 0 {
            debug!(
                "Dropping {} trailing minutes: {}-{}h does not tile into {}-minute slots",
                remainder,
                hours.start_hour(),
                hours.end_hour(),
                slot.minutes()
            );
        }

        let mut spans = Vec::with_capacity(count as usize);
        let mut cursor = hours.start_time();
        for _ in 0..count {
            let end = cursor + step;
            spans.push(SlotSpan { start: cursor, end });
            cursor = end;
        }

        Self { hours, slot, spans }
    }

    pub fn from_settings(start_hour: u32, end_hour: u32, slot_minutes: u32) -> CalendarResult<Self> {
        let hours = WorkingHours::new(start_hour, end_hour)?;
        let slot = SlotDuration::new(slot_minutes)?;
        Ok(Self::new(hours, slot))
    }

    pub fn working_hours(&self) -> WorkingHours {
        self.hours
    }

    pub fn slot_duration(&self) -> SlotDuration {
        self.slot
    }

    pub fn spans(&self) -> &[SlotSpan] {
        &self.spans
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn slots_on(&self, date: NaiveDate) -> Vec<TimeSlot> {
        self.spans.iter().map(|s| s.on(date)).collect()
    }

    /// Span containing `time`, if it falls inside the visible grid.
    pub fn span_at(&self, time: chrono::NaiveTime) -> Option<SlotSpan> {
        let start = self.hours.start_time();
        if time < start {
            return None;
        }
        let idx = ((time - start).num_seconds() / (self.slot.minutes() as i64 * 60)) as usize;
        self.spans.get(idx).copied()
    }

    /// Slot indices on `date` intersecting `[start, end)`.
    pub fn slot_indices(
        &self,
        date: NaiveDate,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Option<Range<usize>> {
        let first = self.spans.first()?;
        slot_index_range(
            first.on(date).start_datetime(),
            self.slot.minutes() as i64 * 60,
            self.spans.len(),
            start,
            end,
        )
    }
}

/// Indices of uniform slots starting at `grid_start` that intersect `[start, end)`.
/// The portion of the item outside the grid is clipped away.
pub(crate) fn slot_index_range(
    grid_start: NaiveDateTime,
    slot_seconds: i64,
    slot_count: usize,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Option<Range<usize>> {
    if slot_count == 0 || slot_seconds <= 0 {
        return None;
    }
    let grid_end = grid_start + chrono::Duration::seconds(slot_seconds * slot_count as i64);
    let clipped_start = start.max(grid_start);
    let clipped_end = end.min(grid_end);
    if clipped_start >= clipped_end {
        return None;
    }
    let from = (clipped_start - grid_start).num_seconds() / slot_seconds;
    let to_secs = (clipped_end - grid_start).num_seconds();
    let to = (to_secs + slot_seconds - 1) / slot_seconds;
    Some(from as usize..(to as usize).min(slot_count))
}
