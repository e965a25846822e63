//! Stateful layer of the widget.
//!
//! Everything with state or side effects lives here: the per-instance view
//! state machine, outbound notifications, reference lookups and the facade that
//! ties them to the pure computations in [`crate::algorithms`].

pub mod calendar;
pub mod clock;
pub mod directory;
pub mod events;
pub mod navigator;

#[cfg(test)]
mod navigator_tests;

pub use calendar::CalendarWidget;
pub use clock::{Clock, FixedClock, SystemClock};
pub use directory::{Directory, ResolvedAppointment};
pub use events::{
    AppointmentClick, CalendarEvent, DateChange, EmptySlotClick, EventLog, EventSink, NullSink,
    ViewChange,
};
pub use navigator::{ViewNavigator, ViewState};
