//! Placement of appointments and blocks onto calendar cells and day slots.
//!
//! Items are merged and sorted once by stacking order, then each one is pushed
//! onto the cells it intersects by direct index arithmetic (cells are contiguous
//! days, slots are uniform). No cell-by-item scan is performed, so the cost is
//! one `O(n log n)` sort plus the number of (item, cell) placements. Stacking
//! order comes from that single sort, so a multi-day item keeps the same
//! relative position in every cell it lands on.
//!
//! Overlaps are kept as-is. Cancelled appointments are placed like any other;
//! hiding or dimming them is a rendering decision. Records with `start >= end`
//! are skipped and reported in [`Placement::diagnostics`].

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, warn};
use serde::Serialize;

use super::time_grid::slot_index_range;
use crate::models::{Appointment, Block, CalendarCell, CalendarRange, Occupant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OccupantKind {
    Appointment,
    Block,
}

/// A record that could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementDiagnostic {
    pub kind: OccupantKind,
    pub id: String,
    pub reason: String,
}

/// A range with its occupants placed, plus any skipped records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement<'a> {
    pub range: CalendarRange<'a>,
    pub diagnostics: Vec<PlacementDiagnostic>,
}

/// Annotate the cells of `range` with the appointments and blocks intersecting them.
///
/// Multi-day items land on every visible day they touch. In day view the item
/// is additionally placed on every slot it intersects; the part falling outside
/// the working window is simply out of view.
pub fn place_items<'a>(
    mut range: CalendarRange<'a>,
    appointments: &'a [Appointment],
    blocks: &'a [Block],
) -> Placement<'a> {
    let mut diagnostics = Vec::new();
    let mut occupants: Vec<Occupant<'a>> = Vec::with_capacity(appointments.len() + blocks.len());

    for appt in appointments {
        if appt.is_well_formed() {
            occupants.push(Occupant::Appointment(appt));
        } else {
            diagnostics.push(malformed(OccupantKind::Appointment, appt.id.as_str(), appt.start, appt.end));
        }
    }
    for block in blocks {
        if block.is_well_formed() {
            occupants.push(Occupant::Block(block));
        } else {
            diagnostics.push(malformed(OccupantKind::Block, block.id.as_str(), block.start, block.end));
        }
    }

    occupants.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let mut placed = 0usize;
    for occupant in &occupants {
        let Some((first, last)) = visible_days(occupant, range.start_date, range.end_date) else {
            continue;
        };
        let offset = (first - range.start_date).num_days() as usize;
        let span = (last - first).num_days() as usize + 1;
        for cell in range.cells.iter_mut().skip(offset).take(span) {
            place_on_cell(cell, *occupant);
            placed += 1;
        }
    }

    debug!(
        "Placed {} of {} items ({} placements) on {} range {}..={}",
        occupants.len(),
        appointments.len() + blocks.len(),
        placed,
        range.view,
        range.start_date,
        range.end_date
    );

    Placement { range, diagnostics }
}

fn malformed(kind: OccupantKind, id: &str, start: NaiveDateTime, end: NaiveDateTime) -> PlacementDiagnostic {
    warn!("Skipping {:?} {}: start {} is not before end {}", kind, id, start, end);
    PlacementDiagnostic {
        kind,
        id: id.to_string(),
        reason: format!("start {} is not before end {}", start, end),
    }
}

/// First and last visible day touched by `[start, end)`. An item ending exactly
/// at midnight does not touch the following day.
fn visible_days(
    occupant: &Occupant<'_>,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    let start = occupant.start();
    let end = occupant.end();
    let last_touched = if end.time() == NaiveTime::MIN {
        end.date().pred_opt()?
    } else {
        end.date()
    };
    let first = start.date().max(range_start);
    let last = last_touched.min(range_end);
    (first <= last).then_some((first, last))
}

fn place_on_cell<'a>(cell: &mut CalendarCell<'a>, occupant: Occupant<'a>) {
    match occupant {
        Occupant::Appointment(a) => cell.appointments.push(a),
        Occupant::Block(b) => cell.blocks.push(b),
    }

    let Some(first_slot) = cell.slots.first() else {
        return;
    };
    let grid_start = first_slot.slot.start_datetime();
    let slot_seconds = (first_slot.slot.end - first_slot.slot.start).num_seconds();
    if let Some(indices) = slot_index_range(
        grid_start,
        slot_seconds,
        cell.slots.len(),
        occupant.start(),
        occupant.end(),
    ) {
        for slot in &mut cell.slots[indices] {
            slot.occupants.push(occupant);
        }
    }
}
