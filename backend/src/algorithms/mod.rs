//! Calendar computations.
//!
//! All functions here are pure: identical inputs give identical outputs and
//! nothing is retained between calls.
//!
//! # Components
//!
//! - [`time_grid`]: Day slot generation bounded by working hours
//! - [`range`]: Visible date ranges and period stepping for each view
//! - [`placement`]: Mapping appointments and blocks onto cells and slots
//!
//! # Example
//!
//! ```
//! use calendar_pro::algorithms::{place_items, RangeCalculator, TimeGrid};
//! use calendar_pro::models::{Appointment, ViewMode, WeekStart};
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let appointments = vec![Appointment::new(
//!     "a1",
//!     day.and_hms_opt(9, 0, 0).unwrap(),
//!     day.and_hms_opt(9, 30, 0).unwrap(),
//! )];
//!
//! let calculator = RangeCalculator::new(TimeGrid::from_settings(6, 22, 30).unwrap(), WeekStart::Monday);
//! let range = calculator.compute(day, ViewMode::Day, day).unwrap();
//! let placement = place_items(range, &appointments, &[]);
//! assert_eq!(placement.range.cells[0].free_slots().count(), 31);
//! ```

pub mod placement;
pub mod range;
pub mod time_grid;

pub use placement::{place_items, OccupantKind, Placement, PlacementDiagnostic};
pub use range::{shift_anchor, visible_bounds, RangeCalculator};
pub use time_grid::{build_day_slots, TimeGrid};
