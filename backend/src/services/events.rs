//! Outbound notifications raised by a calendar widget.
//!
//! The closed set of trigger kinds is a tagged enum; each variant carries the
//! payload the host declared for it. Events are delivered synchronously to an
//! [`EventSink`] as soon as the triggering state change has been committed.

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::{Appointment, AppointmentId, TimeSlot, ViewMode};

/// `appointmentClick`: the user selected an occupant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentClick {
    pub appointment: Appointment,
    pub appointment_id: AppointmentId,
}

/// `emptySlotClick`: the user selected an available slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptySlotClick {
    pub date: NaiveDate,
    /// Slot start as `HH:MM`.
    pub time: String,
    pub timestamp: NaiveDateTime,
}

impl From<&TimeSlot> for EmptySlotClick {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            date: slot.date,
            time: slot.start.format("%H:%M").to_string(),
            timestamp: slot.start_datetime(),
        }
    }
}

/// `dateChange`: the anchor date or the visible range moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateChange {
    pub date: NaiveDate,
    pub view: ViewMode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// `viewChange`: the layout switched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewChange {
    pub view: ViewMode,
    pub previous_view: ViewMode,
}

/// Every notification a widget can raise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "event", rename_all = "camelCase")]
pub enum CalendarEvent {
    AppointmentClick(AppointmentClick),
    EmptySlotClick(EmptySlotClick),
    DateChange(DateChange),
    ViewChange(ViewChange),
}

impl CalendarEvent {
    /// Trigger name as declared to the host.
    pub fn name(&self) -> &'static str {
        match self {
            CalendarEvent::AppointmentClick(_) => "appointmentClick",
            CalendarEvent::EmptySlotClick(_) => "emptySlotClick",
            CalendarEvent::DateChange(_) => "dateChange",
            CalendarEvent::ViewChange(_) => "viewChange",
        }
    }
}

/// Receiver of widget notifications.
pub trait EventSink {
    fn emit(&mut self, event: CalendarEvent);
}

impl<F> EventSink for F
where
    F: FnMut(CalendarEvent),
{
    fn emit(&mut self, event: CalendarEvent) {
        self(event)
    }
}

/// Sink that records every event in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<CalendarEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.iter().map(CalendarEvent::name).collect()
    }

    /// Drain the recorded events.
    pub fn take(&mut self) -> Vec<CalendarEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: CalendarEvent) {
        debug!("Recording {} event", event.name());
        self.events.push(event);
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: CalendarEvent) {}
}
