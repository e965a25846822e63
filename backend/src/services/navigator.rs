//! View navigation state machine.
//!
//! A [`ViewNavigator`] owns one widget's [`ViewState`]. Every transition first
//! computes the complete next state (including its visible range); only when
//! that succeeds is the state committed and the resulting notifications
//! returned. A failed transition changes nothing and yields no events.

use chrono::NaiveDate;
use log::info;
use serde::Serialize;

use super::events::{CalendarEvent, DateChange, ViewChange};
use crate::algorithms::{shift_anchor, visible_bounds};
use crate::error::CalendarResult;
use crate::models::{parse_date, ViewMode, WeekStart};

/// Current view, anchor date and the view active before the last switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub view: ViewMode,
    pub anchor: NaiveDate,
    pub previous_view: ViewMode,
}

impl ViewState {
    pub fn new(view: ViewMode, anchor: NaiveDate) -> Self {
        Self {
            view,
            anchor,
            previous_view: view,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewNavigator {
    state: ViewState,
    week_start: WeekStart,
}

impl ViewNavigator {
    pub fn new(view: ViewMode, anchor: NaiveDate, week_start: WeekStart) -> Self {
        Self {
            state: ViewState::new(view, anchor),
            week_start,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    /// Visible `(start, end)` dates of the current state.
    pub fn bounds(&self) -> CalendarResult<(NaiveDate, NaiveDate)> {
        visible_bounds(self.state.anchor, self.state.view, self.week_start)
    }

    pub fn go_to_today(&mut self, today: NaiveDate) -> CalendarResult<Vec<CalendarEvent>> {
        self.commit(
            "go_to_today",
            ViewState {
                anchor: today,
                ..self.state
            },
        )
    }

    /// Jump to a host-supplied date string.
    ///
    /// # Errors
    ///
    /// `InvalidDateError` if `input` is not a valid calendar date.
    pub fn go_to_date(&mut self, input: &str) -> CalendarResult<Vec<CalendarEvent>> {
        let date = parse_date(input).map_err(|e| e.with_operation("go_to_date"))?;
        self.go_to(date)
    }

    pub fn go_to(&mut self, date: NaiveDate) -> CalendarResult<Vec<CalendarEvent>> {
        self.commit(
            "go_to_date",
            ViewState {
                anchor: date,
                ..self.state
            },
        )
    }

    /// Switch view by name.
    ///
    /// # Errors
    ///
    /// `InvalidViewError` unless `input` is `month`, `week` or `day`.
    pub fn change_view(&mut self, input: &str) -> CalendarResult<Vec<CalendarEvent>> {
        let view = input
            .parse::<ViewMode>()
            .map_err(|e| e.with_operation("change_view"))?;
        self.set_view(view)
    }

    /// Switching to the current view is a no-op.
    pub fn set_view(&mut self, view: ViewMode) -> CalendarResult<Vec<CalendarEvent>> {
        if view == self.state.view {
            return Ok(Vec::new());
        }
        self.commit(
            "change_view",
            ViewState {
                view,
                previous_view: self.state.view,
                anchor: self.state.anchor,
            },
        )
    }

    pub fn next_period(&mut self) -> CalendarResult<Vec<CalendarEvent>> {
        let anchor = shift_anchor(self.state.anchor, self.state.view, true)?;
        self.commit("next_period", ViewState { anchor, ..self.state })
    }

    pub fn previous_period(&mut self) -> CalendarResult<Vec<CalendarEvent>> {
        let anchor = shift_anchor(self.state.anchor, self.state.view, false)?;
        self.commit("previous_period", ViewState { anchor, ..self.state })
    }

    /// Change the first weekday. View, anchor and previous view are kept; a
    /// `dateChange` is returned only when the visible range moves.
    pub fn set_week_start(&mut self, week_start: WeekStart) -> CalendarResult<Vec<CalendarEvent>> {
        if week_start == self.week_start {
            return Ok(Vec::new());
        }
        let (start_date, end_date) = visible_bounds(self.state.anchor, self.state.view, week_start)
            .map_err(|e| e.with_operation("set_week_start"))?;
        let before = self.bounds().ok();
        self.week_start = week_start;

        if before == Some((start_date, end_date)) {
            return Ok(Vec::new());
        }
        info!(
            "set_week_start: {} {} ({}..={})",
            self.state.view, self.state.anchor, start_date, end_date
        );
        Ok(vec![CalendarEvent::DateChange(DateChange {
            date: self.state.anchor,
            view: self.state.view,
            start_date,
            end_date,
        })])
    }

    /// Restore a fresh state without notifying anyone.
    pub fn reset(&mut self, view: ViewMode, anchor: NaiveDate) {
        self.state = ViewState::new(view, anchor);
    }

    fn commit(&mut self, operation: &str, next: ViewState) -> CalendarResult<Vec<CalendarEvent>> {
        let (start_date, end_date) = visible_bounds(next.anchor, next.view, self.week_start)
            .map_err(|e| e.with_operation(operation))?;
        let before = self.bounds().ok();
        let previous = std::mem::replace(&mut self.state, next);

        let mut events = Vec::with_capacity(2);
        if previous.view != next.view {
            events.push(CalendarEvent::ViewChange(ViewChange {
                view: next.view,
                previous_view: next.previous_view,
            }));
        }
        if previous.anchor != next.anchor || before != Some((start_date, end_date)) {
            events.push(CalendarEvent::DateChange(DateChange {
                date: next.anchor,
                view: next.view,
                start_date,
                end_date,
            }));
        }

        if !events.is_empty() {
            info!(
                "{}: {} {} ({}..={})",
                operation, next.view, next.anchor, start_date, end_date
            );
        }
        Ok(events)
    }
}
