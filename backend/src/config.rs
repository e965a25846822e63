//! Widget configuration.
//!
//! Settings come either from a TOML file (`[calendar]` table, snake_case keys)
//! or from the host's property object (camelCase keys such as
//! `workingHoursStart`). Cosmetic options the host sends alongside (colors,
//! labels, typography) are ignored.
//!
//! Numeric bounds are checked by [`CalendarSettings::validate`], not while
//! deserializing, so out-of-range values surface as `ConfigurationError` with
//! the offending field named. A property the host leaves unset arrives as
//! `null` and takes the default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::algorithms::TimeGrid;
use crate::error::{CalendarError, CalendarResult, ErrorContext};
use crate::models::{SlotDuration, ViewMode, WeekStart, WorkingHours};

/// Configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(rename = "calendar", default)]
    pub settings: CalendarSettings,
}

/// Core widget settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSettings {
    #[serde(
        default,
        alias = "defaultView",
        deserialize_with = "deserialize_view"
    )]
    pub default_view: ViewMode,
    #[serde(
        default = "default_working_hours_start",
        alias = "workingHoursStart",
        deserialize_with = "deserialize_working_hours_start"
    )]
    pub working_hours_start: i64,
    #[serde(
        default = "default_working_hours_end",
        alias = "workingHoursEnd",
        deserialize_with = "deserialize_working_hours_end"
    )]
    pub working_hours_end: i64,
    #[serde(
        default = "default_time_slot_minutes",
        alias = "timeSlotMinutes",
        deserialize_with = "deserialize_time_slot_minutes"
    )]
    pub time_slot_minutes: i64,
    #[serde(default, alias = "weekStart", deserialize_with = "deserialize_week_start")]
    pub week_start: WeekStart,
}

fn default_working_hours_start() -> i64 {
    6
}

fn default_working_hours_end() -> i64 {
    22
}

fn default_time_slot_minutes() -> i64 {
    30
}

fn or_default<'de, D, T>(deserializer: D, fallback: fn() -> T) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_else(fallback))
}

fn deserialize_working_hours_start<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    or_default(deserializer, default_working_hours_start)
}

fn deserialize_working_hours_end<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    or_default(deserializer, default_working_hours_end)
}

fn deserialize_time_slot_minutes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    or_default(deserializer, default_time_slot_minutes)
}

fn deserialize_week_start<'de, D: Deserializer<'de>>(deserializer: D) -> Result<WeekStart, D::Error> {
    or_default(deserializer, WeekStart::default)
}

fn deserialize_view<'de, D>(deserializer: D) -> Result<ViewMode, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(ViewMode::default()),
        Some(raw) => raw.parse().map_err(serde::de::Error::custom),
    }
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            default_view: ViewMode::default(),
            working_hours_start: default_working_hours_start(),
            working_hours_end: default_working_hours_end(),
            time_slot_minutes: default_time_slot_minutes(),
            week_start: WeekStart::default(),
        }
    }
}

impl CalendarSettings {
    /// Check every bound and build the day grid.
    ///
    /// # Errors
    ///
    /// `ConfigurationError` if the working window is empty or inverted, an hour
    /// is outside `0..=23`, or the slot length is outside `15..=120`.
    pub fn validate(&self) -> CalendarResult<TimeGrid> {
        let start = to_u32("workingHoursStart", self.working_hours_start)?;
        let end = to_u32("workingHoursEnd", self.working_hours_end)?;
        let minutes = to_u32("timeSlotMinutes", self.time_slot_minutes)?;

        let hours = WorkingHours::new(start, end).map_err(|e| e.with_operation("validate_settings"))?;
        let slot = SlotDuration::new(minutes).map_err(|e| e.with_operation("validate_settings"))?;
        Ok(TimeGrid::new(hours, slot))
    }
}

fn to_u32(field: &str, value: i64) -> CalendarResult<u32> {
    u32::try_from(value).map_err(|_| {
        CalendarError::configuration_with_context(
            "value must be a non-negative integer",
            ErrorContext::new("validate_settings")
                .with_field(field)
                .with_value(value),
        )
    })
}

impl CalendarConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(CalendarConfig)` if successful
    /// * `Err(CalendarError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> CalendarResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CalendarError::configuration_with_context(
                format!("Failed to read config file: {}", e),
                ErrorContext::new("load_config").with_value(path.display()),
            )
        })?;

        Self::from_toml_str(&content).map_err(|e| e.with_operation("load_config"))
    }

    pub fn from_toml_str(content: &str) -> CalendarResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `calendar.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> CalendarResult<Self> {
        let search_paths = [
            PathBuf::from("calendar.toml"),
            PathBuf::from("backend/calendar.toml"),
            PathBuf::from("../calendar.toml"),
        ];

        for path in &search_paths {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Err(CalendarError::configuration(
            "No calendar.toml found in standard locations",
        ))
    }

    /// Read settings from the host's property object.
    pub fn from_properties(properties: &Value) -> CalendarResult<Self> {
        let settings = CalendarSettings::deserialize(properties)
            .map_err(|e| CalendarError::from(e).with_operation("from_properties"))?;
        Ok(Self { settings })
    }
}
