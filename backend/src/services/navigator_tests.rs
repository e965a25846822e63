#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::models::{ViewMode, WeekStart};
    use crate::services::events::{CalendarEvent, DateChange, ViewChange};
    use crate::services::navigator::ViewNavigator;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn navigator(view: ViewMode, anchor: NaiveDate) -> ViewNavigator {
        ViewNavigator::new(view, anchor, WeekStart::Monday)
    }

    #[test]
    fn test_switch_to_week_emits_view_then_date_change() {
        let mut nav = navigator(ViewMode::Month, date(2024, 3, 15));
        let events = nav.change_view("week").unwrap();

        assert_eq!(
            events,
            vec![
                CalendarEvent::ViewChange(ViewChange {
                    view: ViewMode::Week,
                    previous_view: ViewMode::Month,
                }),
                CalendarEvent::DateChange(DateChange {
                    date: date(2024, 3, 15),
                    view: ViewMode::Week,
                    start_date: date(2024, 3, 11),
                    end_date: date(2024, 3, 17),
                }),
            ]
        );
        assert_eq!(nav.state().previous_view, ViewMode::Month);
    }

    #[test]
    fn test_week_next_moves_seven_days() {
        let mut nav = navigator(ViewMode::Month, date(2024, 3, 15));
        nav.change_view("week").unwrap();
        let events = nav.next_period().unwrap();

        assert_eq!(nav.state().anchor, date(2024, 3, 22));
        assert_eq!(
            events,
            vec![CalendarEvent::DateChange(DateChange {
                date: date(2024, 3, 22),
                view: ViewMode::Week,
                start_date: date(2024, 3, 18),
                end_date: date(2024, 3, 24),
            })]
        );
    }

    #[test]
    fn test_month_previous_clamps_to_month_end() {
        let mut nav = navigator(ViewMode::Month, date(2024, 3, 31));
        nav.previous_period().unwrap();
        assert_eq!(nav.state().anchor, date(2024, 2, 29));
    }

    #[test]
    fn test_day_navigation_crosses_year() {
        let mut nav = navigator(ViewMode::Day, date(2024, 12, 31));
        nav.next_period().unwrap();
        assert_eq!(nav.state().anchor, date(2025, 1, 1));
        nav.previous_period().unwrap();
        nav.previous_period().unwrap();
        assert_eq!(nav.state().anchor, date(2024, 12, 30));
    }

    #[test]
    fn test_invalid_date_leaves_state_untouched() {
        let mut nav = navigator(ViewMode::Week, date(2024, 3, 15));
        let before = nav.state();

        let err = nav.go_to_date("not-a-date").unwrap_err();
        assert!(err.is_invalid_date());
        assert_eq!(err.context().operation.as_deref(), Some("go_to_date"));
        assert_eq!(nav.state(), before);

        assert!(nav.go_to_date("2024-02-30").unwrap_err().is_invalid_date());
        assert_eq!(nav.state(), before);
    }

    #[test]
    fn test_invalid_view_leaves_state_untouched() {
        let mut nav = navigator(ViewMode::Month, date(2024, 3, 15));
        let before = nav.state();

        let err = nav.change_view("year").unwrap_err();
        assert!(err.is_invalid_view());
        assert_eq!(nav.state(), before);
    }

    #[test]
    fn test_same_view_is_noop() {
        let mut nav = navigator(ViewMode::Week, date(2024, 3, 15));
        assert!(nav.set_view(ViewMode::Week).unwrap().is_empty());
        assert_eq!(nav.state().previous_view, ViewMode::Week);
    }

    #[test]
    fn test_same_anchor_emits_nothing() {
        let mut nav = navigator(ViewMode::Month, date(2024, 3, 15));
        assert!(nav.go_to_date("2024-03-15").unwrap().is_empty());
    }

    #[test]
    fn test_anchor_move_within_month_still_reports_date() {
        let mut nav = navigator(ViewMode::Month, date(2024, 3, 15));
        let events = nav.go_to_date("2024-03-20").unwrap();
        assert_eq!(events.len(), 1);
        match &events[0] {
            CalendarEvent::DateChange(change) => {
                assert_eq!(change.date, date(2024, 3, 20));
                assert_eq!(change.start_date, date(2024, 2, 26));
                assert_eq!(change.end_date, date(2024, 3, 31));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_previous_view_tracks_last_switch() {
        let mut nav = navigator(ViewMode::Month, date(2024, 3, 15));
        nav.change_view("week").unwrap();
        nav.change_view("DAY").unwrap();
        assert_eq!(nav.state().view, ViewMode::Day);
        assert_eq!(nav.state().previous_view, ViewMode::Week);
    }

    #[test]
    fn test_go_to_today() {
        let mut nav = navigator(ViewMode::Day, date(2024, 3, 15));
        let events = nav.go_to_today(date(2024, 6, 1)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(nav.state().anchor, date(2024, 6, 1));
        assert_eq!(nav.bounds().unwrap(), (date(2024, 6, 1), date(2024, 6, 1)));
    }

    #[test]
    fn test_failed_step_commits_nothing() {
        let mut nav = navigator(ViewMode::Day, NaiveDate::MAX);
        let before = nav.state();
        assert!(nav.next_period().unwrap_err().is_invalid_date());
        assert_eq!(nav.state(), before);
    }

    #[test]
    fn test_sunday_week_start() {
        let mut nav = ViewNavigator::new(ViewMode::Month, date(2024, 3, 15), WeekStart::Sunday);
        nav.change_view("week").unwrap();
        assert_eq!(nav.bounds().unwrap(), (date(2024, 3, 10), date(2024, 3, 16)));
    }

    #[test]
    fn test_set_week_start_keeps_state() {
        let mut nav = navigator(ViewMode::Day, date(2024, 3, 15));
        nav.change_view("month").unwrap();
        let before = nav.state();

        let events = nav.set_week_start(WeekStart::Sunday).unwrap();
        assert_eq!(
            events,
            vec![CalendarEvent::DateChange(DateChange {
                date: date(2024, 3, 15),
                view: ViewMode::Month,
                start_date: date(2024, 2, 25),
                end_date: date(2024, 4, 6),
            })]
        );
        assert_eq!(nav.state(), before);
        assert_eq!(nav.week_start(), WeekStart::Sunday);
        assert!(nav.set_week_start(WeekStart::Sunday).unwrap().is_empty());
    }
}
