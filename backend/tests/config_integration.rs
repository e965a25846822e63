mod support;

use std::io::Write;

use calendar_pro::config::{CalendarConfig, CalendarSettings};
use calendar_pro::models::{ViewMode, WeekStart};
use calendar_pro::services::{CalendarWidget, EventLog, FixedClock};
use serde_json::json;
use support::date;

#[test]
fn test_inverted_working_hours_rejected_at_initialization() {
    let props = json!({ "workingHoursStart": 22, "workingHoursEnd": 6 });
    let err = CalendarWidget::from_properties(&props, FixedClock(date(2024, 3, 15)), EventLog::new())
        .err()
        .expect("initialization must fail");
    assert!(err.is_configuration());
    assert_eq!(err.context().field.as_deref(), Some("workingHoursStart"));
}

#[test]
fn test_out_of_bounds_values_rejected() {
    let cases = [
        json!({ "workingHoursEnd": 24 }),
        json!({ "workingHoursStart": -2 }),
        json!({ "timeSlotMinutes": 14 }),
        json!({ "timeSlotMinutes": 121 }),
        json!({ "workingHoursStart": 9, "workingHoursEnd": 9 }),
    ];
    for props in cases {
        let config = CalendarConfig::from_properties(&props).unwrap();
        let err = config.settings.validate().unwrap_err();
        assert!(err.is_configuration(), "{} should be rejected", props);
    }
}

#[test]
fn test_toml_file_drives_widget() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calendar.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        "[calendar]\ndefault_view = \"week\"\nweek_start = \"sunday\"\nworking_hours_start = 9\nworking_hours_end = 17"
    )
    .unwrap();

    let config = CalendarConfig::from_file(&path).unwrap();
    assert_eq!(
        config.settings,
        CalendarSettings {
            default_view: ViewMode::Week,
            week_start: WeekStart::Sunday,
            working_hours_start: 9,
            working_hours_end: 17,
            ..Default::default()
        }
    );

    let widget =
        CalendarWidget::with_clock(config.settings, FixedClock(date(2024, 3, 15)), EventLog::new()).unwrap();
    assert_eq!(widget.grid().len(), 16);
    assert_eq!(widget.bounds().unwrap(), (date(2024, 3, 10), date(2024, 3, 16)));
}
