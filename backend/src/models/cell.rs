//! Derived render model: ranges, day cells, slots and their occupants.
//!
//! Everything here borrows from the collection snapshot for one render pass
//! (`'a`), so a placed range cannot outlive the data it was placed from.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::records::{Appointment, Block, ProfessionalId};
use super::time::{TimeSlot, ViewMode};

/// An appointment or block placed onto a cell or slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "lowercase")]
pub enum Occupant<'a> {
    Appointment(&'a Appointment),
    Block(&'a Block),
}

impl<'a> Occupant<'a> {
    pub fn id(&self) -> &'a str {
        match *self {
            Occupant::Appointment(a) => a.id.as_str(),
            Occupant::Block(b) => b.id.as_str(),
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        match self {
            Occupant::Appointment(a) => a.start,
            Occupant::Block(b) => b.start,
        }
    }

    pub fn end(&self) -> NaiveDateTime {
        match self {
            Occupant::Appointment(a) => a.end,
            Occupant::Block(b) => b.end,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Occupant::Block(_))
    }

    pub fn as_appointment(&self) -> Option<&'a Appointment> {
        match *self {
            Occupant::Appointment(a) => Some(a),
            Occupant::Block(_) => None,
        }
    }

    /// Whether this occupant takes the slot away from `professional`
    /// (or from everyone, when `None`). Cancelled appointments never do.
    pub fn makes_unavailable(&self, professional: Option<&ProfessionalId>) -> bool {
        match (self, professional) {
            (Occupant::Block(_), None) => true,
            (Occupant::Block(b), Some(p)) => b.applies_to(p),
            (Occupant::Appointment(a), _) if a.is_cancelled() => false,
            (Occupant::Appointment(_), None) => true,
            (Occupant::Appointment(a), Some(p)) => a.professional_id.as_ref() == Some(p),
        }
    }

    /// Stacking order: start, then end, then blocks before appointments, then id.
    pub(crate) fn sort_key(&self) -> (NaiveDateTime, NaiveDateTime, bool, &'a str) {
        (self.start(), self.end(), !self.is_block(), self.id())
    }
}

/// One day-view slot and everything intersecting it, ordered by start time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotCell<'a> {
    pub slot: TimeSlot,
    pub occupants: Vec<Occupant<'a>>,
}

impl<'a> SlotCell<'a> {
    pub fn new(slot: TimeSlot) -> Self {
        Self {
            slot,
            occupants: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    /// No blocks and no active appointments.
    pub fn is_available(&self) -> bool {
        !self.occupants.iter().any(|o| o.makes_unavailable(None))
    }

    pub fn is_available_for(&self, professional: &ProfessionalId) -> bool {
        !self
            .occupants
            .iter()
            .any(|o| o.makes_unavailable(Some(professional)))
    }
}

/// One calendar day with the items intersecting it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell<'a> {
    pub date: NaiveDate,
    pub is_today: bool,
    /// `false` for leading/trailing days of a month grid that belong to a
    /// neighbouring month.
    pub in_range: bool,
    pub appointments: Vec<&'a Appointment>,
    pub blocks: Vec<&'a Block>,
    /// Populated in day view only.
    pub slots: Vec<SlotCell<'a>>,
}

impl<'a> CalendarCell<'a> {
    pub fn new(date: NaiveDate, is_today: bool, in_range: bool) -> Self {
        Self {
            date,
            is_today,
            in_range,
            appointments: Vec::new(),
            blocks: Vec::new(),
            slots: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty() && self.blocks.is_empty()
    }

    /// Appointments and blocks merged in stacking order.
    pub fn occupants(&self) -> Vec<Occupant<'a>> {
        let mut all: Vec<Occupant<'a>> = self
            .blocks
            .iter()
            .map(|&b| Occupant::Block(b))
            .chain(self.appointments.iter().map(|&a| Occupant::Appointment(a)))
            .collect();
        all.sort_by(|x, y| x.sort_key().cmp(&y.sort_key()));
        all
    }

    pub fn free_slots(&self) -> impl Iterator<Item = &SlotCell<'a>> {
        self.slots.iter().filter(|s| s.is_available())
    }

    pub fn slot_at(&self, time: chrono::NaiveTime) -> Option<&SlotCell<'a>> {
        self.slots
            .iter()
            .find(|s| s.slot.start <= time && time < s.slot.end)
    }
}

/// The inclusive date range a view shows, with one cell per day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRange<'a> {
    pub view: ViewMode,
    pub anchor: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cells: Vec<CalendarCell<'a>>,
}

impl<'a> CalendarRange<'a> {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn num_days(&self) -> usize {
        self.cells.len()
    }

    /// Cell index for `date`; cells are contiguous from `start_date`.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        if !self.contains(date) {
            return None;
        }
        let idx = (date - self.start_date).num_days() as usize;
        (idx < self.cells.len()).then_some(idx)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&CalendarCell<'a>> {
        self.index_of(date).map(|i| &self.cells[i])
    }
}
