//! Visible date ranges for month, week and day views.
//!
//! - Month: whole weeks covering the anchor's calendar month (28, 35 or 42 days).
//! - Week: the seven days of the week containing the anchor.
//! - Day: the anchor alone, subdivided into grid slots.
//!
//! Week boundaries follow the configured [`WeekStart`] (Monday by default).

use chrono::{Datelike, Days, Months, NaiveDate};
use log::debug;

use super::time_grid::TimeGrid;
use crate::error::CalendarResult;
use crate::models::time::out_of_range;
use crate::models::{parse_date, CalendarCell, CalendarRange, SlotCell, ViewMode, WeekStart};

/// Inclusive `(start, end)` dates shown by `view` around `anchor`.
pub fn visible_bounds(
    anchor: NaiveDate,
    view: ViewMode,
    week_start: WeekStart,
) -> CalendarResult<(NaiveDate, NaiveDate)> {
    match view {
        ViewMode::Day => Ok((anchor, anchor)),
        ViewMode::Week => {
            let start = week_start.week_containing(anchor)?;
            let end = add_days(start, 6)?;
            Ok((start, end))
        }
        ViewMode::Month => {
            let first = anchor
                .with_day(1)
                .ok_or_else(|| out_of_range("visible_bounds", anchor))?;
            let last = first
                .checked_add_months(Months::new(1))
                .and_then(|d| d.pred_opt())
                .ok_or_else(|| out_of_range("visible_bounds", anchor))?;
            let start = week_start.week_containing(first)?;
            let end = add_days(week_start.week_containing(last)?, 6)?;
            Ok((start, end))
        }
    }
}

/// Move `anchor` one period of `view` forward or backward.
///
/// Month steps clamp to the last day of the target month (Jan 31 -> Feb 29).
pub fn shift_anchor(anchor: NaiveDate, view: ViewMode, forward: bool) -> CalendarResult<NaiveDate> {
    let shifted = match (view, forward) {
        (ViewMode::Month, true) => anchor.checked_add_months(Months::new(1)),
        (ViewMode::Month, false) => anchor.checked_sub_months(Months::new(1)),
        (ViewMode::Week, true) => anchor.checked_add_days(Days::new(7)),
        (ViewMode::Week, false) => anchor.checked_sub_days(Days::new(7)),
        (ViewMode::Day, true) => anchor.succ_opt(),
        (ViewMode::Day, false) => anchor.pred_opt(),
    };
    shifted.ok_or_else(|| out_of_range("shift_anchor", anchor))
}

fn add_days(date: NaiveDate, days: u64) -> CalendarResult<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| out_of_range("add_days", date))
}

/// Builds empty calendar ranges for a fixed grid and week policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeCalculator {
    grid: TimeGrid,
    week_start: WeekStart,
}

impl RangeCalculator {
    pub fn new(grid: TimeGrid, week_start: WeekStart) -> Self {
        Self { grid, week_start }
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn bounds(&self, anchor: NaiveDate, view: ViewMode) -> CalendarResult<(NaiveDate, NaiveDate)> {
        visible_bounds(anchor, view, self.week_start)
    }

    /// Compute the range and its unoccupied cells. `today` only drives the
    /// `is_today` flag, so identical inputs always give identical output.
    pub fn compute<'a>(
        &self,
        anchor: NaiveDate,
        view: ViewMode,
        today: NaiveDate,
    ) -> CalendarResult<CalendarRange<'a>> {
        let (start_date, end_date) = self.bounds(anchor, view)?;

        let cells: Vec<CalendarCell<'a>> = start_date
            .iter_days()
            .take_while(|d| *d <= end_date)
            .map(|date| {
                let in_range = match view {
                    ViewMode::Month => date.year() == anchor.year() && date.month() == anchor.month(),
                    ViewMode::Week | ViewMode::Day => true,
                };
                let mut cell = CalendarCell::new(date, date == today, in_range);
                if view == ViewMode::Day {
                    cell.slots = self
                        .grid
                        .slots_on(date)
                        .into_iter()
                        .map(SlotCell::new)
                        .collect();
                }
                cell
            })
            .collect();

        debug!(
            "Computed {} range {}..={} ({} cells) for anchor {}",
            view,
            start_date,
            end_date,
            cells.len(),
            anchor
        );

        Ok(CalendarRange {
            view,
            anchor,
            start_date,
            end_date,
            cells,
        })
    }

    /// Like [`compute`](Self::compute) for a host-supplied anchor string.
    pub fn compute_str<'a>(
        &self,
        anchor: &str,
        view: ViewMode,
        today: NaiveDate,
    ) -> CalendarResult<CalendarRange<'a>> {
        let anchor = parse_date(anchor).map_err(|e| e.with_operation("compute_range"))?;
        self.compute(anchor, view, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calculator(week_start: WeekStart) -> RangeCalculator {
        RangeCalculator::new(TimeGrid::from_settings(6, 22, 30).unwrap(), week_start)
    }

    #[test]
    fn test_month_bounds_monday_start() {
        // March 2024 starts on a Friday and ends on a Sunday
        let (start, end) = visible_bounds(date(2024, 3, 15), ViewMode::Month, WeekStart::Monday).unwrap();
        assert_eq!(start, date(2024, 2, 26));
        assert_eq!(end, date(2024, 3, 31));
    }

    #[test]
    fn test_month_bounds_sunday_start() {
        let (start, end) = visible_bounds(date(2024, 3, 15), ViewMode::Month, WeekStart::Sunday).unwrap();
        assert_eq!(start, date(2024, 2, 25));
        assert_eq!(end, date(2024, 4, 6));
    }

    #[test]
    fn test_month_of_exact_four_weeks() {
        // February 2021 starts on a Monday and has 28 days
        let range = calculator(WeekStart::Monday)
            .compute(date(2021, 2, 10), ViewMode::Month, date(2021, 2, 10))
            .unwrap();
        assert_eq!(range.num_days(), 28);
        assert!(range.cells.iter().all(|c| c.in_range));
    }

    #[test]
    fn test_month_flags_neighbouring_days() {
        let range = calculator(WeekStart::Monday)
            .compute(date(2024, 3, 15), ViewMode::Month, date(2024, 3, 15))
            .unwrap();
        assert_eq!(range.num_days(), 35);
        assert!(!range.cells[0].in_range);
        assert!(range.cell(date(2024, 3, 1)).unwrap().in_range);
        assert!(range.cell(date(2024, 3, 15)).unwrap().is_today);
        assert_eq!(range.cells.iter().filter(|c| c.is_today).count(), 1);
        assert!(range.cells.iter().all(|c| c.slots.is_empty()));
    }

    #[test]
    fn test_week_range() {
        let range = calculator(WeekStart::Monday)
            .compute(date(2024, 3, 15), ViewMode::Week, date(2000, 1, 1))
            .unwrap();
        assert_eq!(range.start_date, date(2024, 3, 11));
        assert_eq!(range.end_date, date(2024, 3, 17));
        assert_eq!(range.num_days(), 7);
        assert!(range.cells.iter().all(|c| !c.is_today));
    }

    #[test]
    fn test_week_across_year_boundary() {
        let (start, end) = visible_bounds(date(2025, 1, 1), ViewMode::Week, WeekStart::Monday).unwrap();
        assert_eq!(start, date(2024, 12, 30));
        assert_eq!(end, date(2025, 1, 5));
    }

    #[test]
    fn test_day_range_has_slots() {
        let range = calculator(WeekStart::Monday)
            .compute(date(2024, 3, 1), ViewMode::Day, date(2024, 3, 1))
            .unwrap();
        assert_eq!(range.start_date, range.end_date);
        assert_eq!(range.cells.len(), 1);
        assert_eq!(range.cells[0].slots.len(), 32);
        assert_eq!(range.cells[0].slots[0].slot.date, date(2024, 3, 1));
    }

    #[test]
    fn test_compute_str_rejects_garbage() {
        let err = calculator(WeekStart::Monday)
            .compute_str("31/02/2024", ViewMode::Month, date(2024, 1, 1))
            .unwrap_err();
        assert!(err.is_invalid_date());
        assert_eq!(err.context().operation.as_deref(), Some("compute_range"));
    }

    #[test]
    fn test_shift_anchor_month_clamps() {
        assert_eq!(shift_anchor(date(2024, 1, 31), ViewMode::Month, true).unwrap(), date(2024, 2, 29));
        assert_eq!(shift_anchor(date(2024, 3, 31), ViewMode::Month, false).unwrap(), date(2024, 2, 29));
        assert_eq!(shift_anchor(date(2024, 12, 15), ViewMode::Month, true).unwrap(), date(2025, 1, 15));
    }

    #[test]
    fn test_shift_anchor_week_and_day() {
        assert_eq!(shift_anchor(date(2024, 3, 15), ViewMode::Week, true).unwrap(), date(2024, 3, 22));
        assert_eq!(shift_anchor(date(2024, 3, 1), ViewMode::Week, false).unwrap(), date(2024, 2, 23));
        assert_eq!(shift_anchor(date(2024, 2, 28), ViewMode::Day, true).unwrap(), date(2024, 2, 29));
        assert_eq!(shift_anchor(date(2024, 3, 1), ViewMode::Day, false).unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn test_shift_anchor_overflow_is_invalid_date() {
        assert!(shift_anchor(NaiveDate::MAX, ViewMode::Day, true).unwrap_err().is_invalid_date());
        assert!(visible_bounds(NaiveDate::MAX, ViewMode::Month, WeekStart::Monday).is_err());
    }
}
