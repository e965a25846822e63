use calendar_pro::algorithms::{build_day_slots, place_items, visible_bounds, RangeCalculator, TimeGrid};
use calendar_pro::models::{Appointment, ViewMode, WeekStart};
use calendar_pro::services::ViewNavigator;
use chrono::{Datelike, Days, Duration, Months, NaiveDate, NaiveTime};
use proptest::prelude::*;

prop_compose! {
    fn arb_date()(offset in 0u64..150_000) -> NaiveDate {
        NaiveDate::from_ymd_opt(1900, 1, 1).unwrap() + Days::new(offset)
    }
}

prop_compose! {
    fn arb_hours()(start in 0u32..23)(start in Just(start), end in (start + 1)..=23) -> (u32, u32) {
        (start, end)
    }
}

fn arb_week_start() -> impl Strategy<Value = WeekStart> {
    prop_oneof![Just(WeekStart::Monday), Just(WeekStart::Sunday)]
}

fn arb_view() -> impl Strategy<Value = ViewMode> {
    prop_oneof![Just(ViewMode::Month), Just(ViewMode::Week), Just(ViewMode::Day)]
}

proptest! {
    #[test]
    fn prop_slot_count_and_tiling((start, end) in arb_hours(), minutes in 15u32..=120) {
        let slots = build_day_slots(start, end, minutes).unwrap();
        prop_assert_eq!(slots.len() as u32, (end - start) * 60 / minutes);

        if let Some(first) = slots.first() {
            prop_assert_eq!(first.start, NaiveTime::from_hms_opt(start, 0, 0).unwrap());
        }
        for slot in &slots {
            prop_assert_eq!(slot.end - slot.start, Duration::minutes(minutes as i64));
        }
        for pair in slots.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
        }
        if let Some(last) = slots.last() {
            prop_assert!(last.end <= NaiveTime::from_hms_opt(end, 0, 0).unwrap());
        }
    }

    #[test]
    fn prop_slots_idempotent((start, end) in arb_hours(), minutes in 15u32..=120) {
        prop_assert_eq!(
            build_day_slots(start, end, minutes).unwrap(),
            build_day_slots(start, end, minutes).unwrap()
        );
    }

    #[test]
    fn prop_month_range_covers_whole_weeks(anchor in arb_date(), week_start in arb_week_start()) {
        let (start, end) = visible_bounds(anchor, ViewMode::Month, week_start).unwrap();
        let len = (end - start).num_days() + 1;
        prop_assert_eq!(len % 7, 0);
        prop_assert!((28..=42).contains(&len));
        prop_assert_eq!(start.weekday(), week_start.weekday());

        let first = anchor.with_day(1).unwrap();
        let last = first + Months::new(1) - Days::new(1);
        prop_assert!(start <= first && last <= end);
    }

    #[test]
    fn prop_week_range_is_seven_days(anchor in arb_date(), week_start in arb_week_start()) {
        let (start, end) = visible_bounds(anchor, ViewMode::Week, week_start).unwrap();
        prop_assert_eq!((end - start).num_days(), 6);
        prop_assert!(start <= anchor && anchor <= end);
        prop_assert_eq!(start.weekday(), week_start.weekday());
    }

    #[test]
    fn prop_compute_is_idempotent(anchor in arb_date(), view in arb_view(), week_start in arb_week_start()) {
        let calculator = RangeCalculator::new(TimeGrid::from_settings(6, 22, 30).unwrap(), week_start);
        let first = calculator.compute(anchor, view, anchor).unwrap();
        let second = calculator.compute(anchor, view, anchor).unwrap();
        prop_assert_eq!(first.num_days(), (first.end_date - first.start_date).num_days() as usize + 1);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_week_and_day_steps_round_trip(anchor in arb_date(), forward_first in any::<bool>()) {
        for view in [ViewMode::Week, ViewMode::Day] {
            let mut nav = ViewNavigator::new(view, anchor, WeekStart::Monday);
            if forward_first {
                nav.next_period().unwrap();
                nav.previous_period().unwrap();
            } else {
                nav.previous_period().unwrap();
                nav.next_period().unwrap();
            }
            prop_assert_eq!(nav.state().anchor, anchor);
        }
    }

    #[test]
    fn prop_month_step_keeps_day_when_possible(anchor in arb_date()) {
        let mut nav = ViewNavigator::new(ViewMode::Month, anchor, WeekStart::Monday);
        nav.next_period().unwrap();
        let moved = nav.state().anchor;
        prop_assert_eq!(moved.day(), anchor.day().min(days_in_month(moved)));
        prop_assert_eq!((moved.year() * 12 + moved.month() as i32) - (anchor.year() * 12 + anchor.month() as i32), 1);
    }

    #[test]
    fn prop_items_land_on_exactly_the_days_they_touch(
        anchor in arb_date(),
        start_offset in -3i64..10,
        start_minute in 0i64..1440,
        length in 1i64..(4 * 1440),
    ) {
        let calculator = RangeCalculator::new(TimeGrid::from_settings(6, 22, 30).unwrap(), WeekStart::Monday);
        let range = calculator.compute(anchor, ViewMode::Week, anchor).unwrap();
        let (range_start, range_end) = (range.start_date, range.end_date);

        let start = range_start.and_time(NaiveTime::MIN)
            + Duration::days(start_offset)
            + Duration::minutes(start_minute);
        let end = start + Duration::minutes(length);
        let appointments = vec![Appointment::new("x", start, end)];

        let placement = place_items(range, &appointments, &[]);
        for cell in &placement.range.cells {
            let day_start = cell.date.and_time(NaiveTime::MIN);
            let day_end = day_start + Duration::days(1);
            let touches = start < day_end && end > day_start;
            prop_assert_eq!(cell.appointments.len(), usize::from(touches), "{}", cell.date);
        }
        prop_assert!(placement.range.start_date == range_start && placement.range.end_date == range_end);
    }
}

fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap();
    ((first + Months::new(1)) - first).num_days() as u32
}
