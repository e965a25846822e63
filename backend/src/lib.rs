//! # Calendar Pro
//!
//! Scheduling and availability engine for an embeddable calendar widget.
//!
//! This crate turns host-supplied collections of appointments, blocks, services,
//! professionals and clients into a navigable month, week or day calendar with
//! working-hours slots, availability and view-state transitions. Rendering,
//! styling and labels are left to the host.
//!
//! ## Features
//!
//! - **Time Grid**: Fixed-length day slots bounded by working hours
//! - **Ranges**: Whole-week month grids, weeks and single days around an anchor date
//! - **Placement**: Appointments and blocks mapped onto day cells and slots
//! - **Navigation**: Per-instance view state with today/date/view/period actions
//! - **Events**: Typed `appointmentClick`, `emptySlotClick`, `dateChange` and `viewChange` notifications
//! - **Ingestion**: Validation and coercion of loosely-typed host records
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`error`]: Error taxonomy with structured context
//! - [`config`]: Widget settings from TOML files or host properties
//! - [`models`]: Records, time primitives and the derived render model
//! - [`parsing`]: Host record ingestion and reporting
//! - [`algorithms`]: Pure grid, range and placement computations
//! - [`services`]: View navigator, event emitter and widget facade
//!
//! ## Example
//!
//! ```
//! use calendar_pro::config::CalendarSettings;
//! use calendar_pro::services::{CalendarWidget, EventLog, FixedClock};
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
//! let mut widget =
//!     CalendarWidget::with_clock(CalendarSettings::default(), FixedClock(today), EventLog::new())
//!         .unwrap();
//!
//! widget.change_view("week").unwrap();
//! widget.next_period().unwrap();
//!
//! assert_eq!(widget.state().anchor, NaiveDate::from_ymd_opt(2024, 3, 22).unwrap());
//! assert_eq!(widget.sink().names(), vec!["viewChange", "dateChange", "dateChange"]);
//! ```

pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod parsing;
pub mod services;

pub use error::{CalendarError, CalendarResult, ErrorContext};
