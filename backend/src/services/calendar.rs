//! The widget facade.
//!
//! [`CalendarWidget`] ties one instance's settings, collection snapshot, view
//! state, clock and event sink together and exposes the host's action surface.
//! Instances share nothing, so any number can coexist.

use chrono::NaiveTime;
use log::{debug, info, warn};
use serde_json::Value;

use super::clock::{Clock, SystemClock};
use super::directory::Directory;
use super::events::{AppointmentClick, CalendarEvent, EmptySlotClick, EventSink};
use super::navigator::{ViewNavigator, ViewState};
use crate::algorithms::{place_items, Placement, RangeCalculator, TimeGrid};
use crate::config::{CalendarConfig, CalendarSettings};
use crate::error::{CalendarError, CalendarResult, ErrorContext};
use crate::models::{parse_date, AppointmentId, Collections, Occupant, TimeSlot};
use crate::parsing::{parse_collections, IngestReport};

pub struct CalendarWidget<S: EventSink, C: Clock = SystemClock> {
    settings: CalendarSettings,
    calculator: RangeCalculator,
    collections: Collections,
    navigator: ViewNavigator,
    clock: C,
    sink: S,
}

impl<S: EventSink> CalendarWidget<S, SystemClock> {
    /// Widget on the system clock, opened on today in the default view.
    ///
    /// # Errors
    ///
    /// `ConfigurationError` if `settings` fail validation.
    pub fn new(settings: CalendarSettings, sink: S) -> CalendarResult<Self> {
        Self::with_clock(settings, SystemClock, sink)
    }
}

impl<S: EventSink, C: Clock> CalendarWidget<S, C> {
    pub fn with_clock(settings: CalendarSettings, clock: C, sink: S) -> CalendarResult<Self> {
        let grid = settings
            .validate()
            .map_err(|e| e.with_operation("init_widget"))?;
        let today = clock.today();
        info!(
            "Initializing calendar: {} view on {}, {} slots of {} minutes",
            settings.default_view,
            today,
            grid.len(),
            grid.slot_duration().minutes()
        );

        Ok(Self {
            calculator: RangeCalculator::new(grid, settings.week_start),
            navigator: ViewNavigator::new(settings.default_view, today, settings.week_start),
            collections: Collections::default(),
            settings,
            clock,
            sink,
        })
    }

    /// Build a widget from the host's full property object: settings and the
    /// five collections.
    pub fn from_properties(properties: &Value, clock: C, sink: S) -> CalendarResult<(Self, IngestReport)> {
        let config = CalendarConfig::from_properties(properties)?;
        let mut widget = Self::with_clock(config.settings, clock, sink)?;
        let report = widget.ingest(properties);
        Ok((widget, report))
    }

    pub fn settings(&self) -> &CalendarSettings {
        &self.settings
    }

    pub fn grid(&self) -> &TimeGrid {
        self.calculator.grid()
    }

    pub fn state(&self) -> ViewState {
        self.navigator.state()
    }

    pub fn bounds(&self) -> CalendarResult<(chrono::NaiveDate, chrono::NaiveDate)> {
        self.navigator.bounds()
    }

    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    pub fn directory(&self) -> Directory<'_> {
        Directory::new(&self.collections)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Swap in a new collection snapshot. View state is untouched.
    pub fn replace_collections(&mut self, collections: Collections) {
        debug!(
            "Replacing collections: {} appointments, {} blocks",
            collections.appointments.len(),
            collections.blocks.len()
        );
        self.collections = collections;
    }

    /// Re-read the collections from a host property object.
    pub fn ingest(&mut self, properties: &Value) -> IngestReport {
        let (collections, report) = parse_collections(properties);
        if !report.is_valid {
            warn!(
                "Ingestion dropped {} records ({} warnings)",
                report.errors.len(),
                report.warnings.len()
            );
        }
        self.replace_collections(collections);
        report
    }

    /// Apply updated settings. On error nothing changes. The current view and
    /// anchor are kept; `dateChange` fires if a new week start moves the
    /// visible range.
    pub fn apply_settings(&mut self, settings: CalendarSettings) -> CalendarResult<()> {
        let grid = settings
            .validate()
            .map_err(|e| e.with_operation("apply_settings"))?;
        let events = self
            .navigator
            .set_week_start(settings.week_start)
            .map_err(|e| e.with_operation("apply_settings"))?;
        self.calculator = RangeCalculator::new(grid, settings.week_start);
        self.settings = settings;
        self.dispatch(events);
        Ok(())
    }

    /// Back to the default view on today, silently.
    pub fn reset(&mut self) {
        self.navigator
            .reset(self.settings.default_view, self.clock.today());
    }

    pub fn go_to_today(&mut self) -> CalendarResult<()> {
        let today = self.clock.today();
        let events = self.navigator.go_to_today(today)?;
        self.dispatch(events);
        Ok(())
    }

    pub fn go_to_date(&mut self, date: &str) -> CalendarResult<()> {
        let events = self.navigator.go_to_date(date)?;
        self.dispatch(events);
        Ok(())
    }

    pub fn change_view(&mut self, view: &str) -> CalendarResult<()> {
        let events = self.navigator.change_view(view)?;
        self.dispatch(events);
        Ok(())
    }

    pub fn next_period(&mut self) -> CalendarResult<()> {
        let events = self.navigator.next_period()?;
        self.dispatch(events);
        Ok(())
    }

    pub fn previous_period(&mut self) -> CalendarResult<()> {
        let events = self.navigator.previous_period()?;
        self.dispatch(events);
        Ok(())
    }

    fn dispatch(&mut self, events: Vec<CalendarEvent>) {
        for event in events {
            self.sink.emit(event);
        }
    }

    /// Recompute the visible range and place the current snapshot on it.
    pub fn render(&self) -> CalendarResult<Placement<'_>> {
        let state = self.navigator.state();
        let range = self
            .calculator
            .compute(state.anchor, state.view, self.clock.today())?;
        Ok(place_items(
            range,
            &self.collections.appointments,
            &self.collections.blocks,
        ))
    }

    /// Raise `appointmentClick` for a known appointment. Returns whether an
    /// event was emitted.
    pub fn click_appointment(&mut self, id: &str) -> bool {
        let id = AppointmentId::from(id);
        let Some(appointment) = self.collections.find_appointment(&id) else {
            warn!("Click on unknown appointment {}", id);
            return false;
        };
        let event = CalendarEvent::AppointmentClick(AppointmentClick {
            appointment: appointment.clone(),
            appointment_id: appointment.id.clone(),
        });
        self.sink.emit(event);
        true
    }

    /// Raise `emptySlotClick` for the slot containing `time` on `date`, if that
    /// slot is available. Returns whether an event was emitted; times outside
    /// the working grid and occupied slots emit nothing.
    ///
    /// # Errors
    ///
    /// `InvalidDateError` if `date` or `time` cannot be parsed.
    pub fn click_slot(&mut self, date: &str, time: &str) -> CalendarResult<bool> {
        let date = parse_date(date).map_err(|e| e.with_operation("click_slot"))?;
        let time = parse_time(time)?;

        let Some(span) = self.calculator.grid().span_at(time) else {
            debug!("Slot click at {} {} is outside working hours", date, time);
            return Ok(false);
        };
        let slot = span.on(date);
        if !self.slot_is_available(&slot) {
            debug!("Slot {} {} is occupied", date, slot.start);
            return Ok(false);
        }

        self.sink
            .emit(CalendarEvent::EmptySlotClick(EmptySlotClick::from(&slot)));
        Ok(true)
    }

    /// Linear scan over the whole snapshot on every click; placement's day
    /// bucketing is not reused here.
    fn slot_is_available(&self, slot: &TimeSlot) -> bool {
        let appointments = self
            .collections
            .appointments
            .iter()
            .filter(|a| a.is_well_formed())
            .map(Occupant::Appointment);
        let blocks = self
            .collections
            .blocks
            .iter()
            .filter(|b| b.is_well_formed())
            .map(Occupant::Block);
        !appointments
            .chain(blocks)
            .any(|o| o.makes_unavailable(None) && slot.intersects(o.start(), o.end()))
    }
}

fn parse_time(input: &str) -> CalendarResult<NaiveTime> {
    let s = input.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| {
            CalendarError::invalid_date_with_context(
                "expected HH:MM",
                ErrorContext::new("click_slot").with_field("time").with_value(input),
            )
        })
}
