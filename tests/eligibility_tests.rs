use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use pickup_calendar::{
    BakeryCalendar, CalendarOverride, DayHours, LeadTimes, OverrideSet, PickupConfig, PickupError,
    PickupRules, ProductCategory, WeeklySchedule, logging,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(date: NaiveDate, h: u32, m: u32, s: u32) -> NaiveDateTime {
    date.and_hms_opt(h, m, s).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Closed Sunday and Monday, open Tuesday-Saturday 08:00-19:00.
fn bakery(overrides: Vec<CalendarOverride>) -> BakeryCalendar {
    logging::init_test();
    let schedule = WeeklySchedule::uniform([Weekday::Sun, Weekday::Mon], t(8, 0), t(19, 0));
    BakeryCalendar::new(schedule, OverrideSet::from_records(overrides).unwrap())
}

fn christmas_eve_extension() -> CalendarOverride {
    CalendarOverride::open(d(2025, 12, 24), t(8, 0), t(17, 0)).with_cutoff(d(2025, 12, 21))
}

#[test]
fn tuesday_morning_generic_order_is_ready_wednesday() {
    let cal = bakery(vec![]);
    let rules = PickupRules::default();
    let now = at(d(2025, 12, 16), 10, 0, 0);

    assert_eq!(
        rules.base_minimum_date(&cal, ProductCategory::Other, now),
        d(2025, 12, 17)
    );
    assert_eq!(
        rules.earliest_selectable_date(&cal, ProductCategory::Other, now),
        d(2025, 12, 17)
    );
}

#[test]
fn sunday_bread_order_counts_from_tuesday() {
    let cal = bakery(vec![]);
    let rules = PickupRules::default();
    // Wed (1), Thu (2), Fri (3)
    for hour in [10, 18] {
        let now = at(d(2025, 12, 14), hour, 0, 0);
        assert_eq!(
            rules.base_minimum_date(&cal, ProductCategory::Bread, now),
            d(2025, 12, 19),
            "ordered at {hour}h"
        );
    }
}

#[test]
fn noon_boundary_switches_lead_time() {
    let cal = bakery(vec![]);
    let rules = PickupRules::default();
    let tuesday = d(2025, 12, 16);

    let before = rules.base_minimum_date(&cal, ProductCategory::Other, at(tuesday, 11, 59, 59));
    let exactly = rules.base_minimum_date(&cal, ProductCategory::Other, at(tuesday, 12, 0, 0));
    let after = rules.base_minimum_date(&cal, ProductCategory::Other, at(tuesday, 12, 0, 1));
    assert_eq!(before, d(2025, 12, 17));
    assert_eq!(exactly, d(2025, 12, 17));
    assert_eq!(after, d(2025, 12, 18));

    let bread_before = rules.base_minimum_date(&cal, ProductCategory::Bread, at(tuesday, 11, 59, 59));
    let bread_after = rules.base_minimum_date(&cal, ProductCategory::Bread, at(tuesday, 12, 0, 1));
    assert_eq!(bread_before, d(2025, 12, 19));
    assert_eq!(bread_after, d(2025, 12, 20));
}

#[test]
fn saturday_order_skips_weekly_closure() {
    let cal = bakery(vec![]);
    let rules = PickupRules::default();
    let now = at(d(2025, 12, 20), 9, 0, 0);
    assert_eq!(
        rules.earliest_selectable_date(&cal, ProductCategory::Other, now),
        d(2025, 12, 23)
    );
}

#[test]
fn closed_override_today_rolls_forward_with_before_noon_lead() {
    let cal = bakery(vec![CalendarOverride::closed(d(2025, 12, 16))]);
    let rules = PickupRules::default();
    // Afternoon on a closed Tuesday: count starts Wednesday, before-noon lead of 1
    let now = at(d(2025, 12, 16), 15, 0, 0);
    assert_eq!(
        rules.base_minimum_date(&cal, ProductCategory::Other, now),
        d(2025, 12, 18)
    );
}

#[test]
fn closed_days_do_not_count_toward_lead_time() {
    let cal = bakery(vec![CalendarOverride::closed(d(2025, 12, 18))]);
    let rules = PickupRules::default();
    let now = at(d(2025, 12, 16), 10, 0, 0);
    // Wed (1), Thu closed, Fri (2), Sat (3)
    assert_eq!(
        rules.base_minimum_date(&cal, ProductCategory::Bread, now),
        d(2025, 12, 20)
    );
}

#[test]
fn exceptional_opening_counts_as_open_day() {
    let cal = bakery(vec![CalendarOverride::open(d(2025, 12, 22), t(8, 0), t(12, 0))]);
    let rules = PickupRules::default();
    let now = at(d(2025, 12, 20), 14, 0, 0);
    // Sat afternoon, generic: Mon 22 (1, exceptional), Tue 23 (2)
    assert_eq!(
        rules.base_minimum_date(&cal, ProductCategory::Other, now),
        d(2025, 12, 23)
    );
}

#[test]
fn bread_never_ready_before_generic_products() {
    let cal = bakery(vec![CalendarOverride::closed(d(2025, 12, 25))]);
    let rules = PickupRules::default();
    let mut now = at(d(2025, 12, 13), 0, 0, 0);
    let end = at(d(2025, 12, 28), 0, 0, 0);
    while now < end {
        let bread = rules.base_minimum_date(&cal, ProductCategory::Bread, now);
        let other = rules.base_minimum_date(&cal, ProductCategory::Other, now);
        assert!(bread > other, "at {now}: bread {bread} other {other}");
        now = now + Duration::hours(5);
    }
}

#[test]
fn cutoff_extension_makes_earlier_date_available() {
    let cal = bakery(vec![christmas_eve_extension()]);
    let rules = PickupRules::default();
    let now = at(d(2025, 12, 20), 14, 0, 0);

    assert_eq!(
        rules.base_minimum_date(&cal, ProductCategory::Bread, now),
        d(2025, 12, 26)
    );
    assert_eq!(
        rules.earliest_selectable_date(&cal, ProductCategory::Bread, now),
        d(2025, 12, 24)
    );
}

#[test]
fn cutoff_extension_holds_until_end_of_cutoff_day() {
    let cal = bakery(vec![christmas_eve_extension()]);
    let rules = PickupRules::default();
    let last_second = at(d(2025, 12, 21), 23, 59, 59);
    assert_eq!(
        rules.earliest_selectable_date(&cal, ProductCategory::Bread, last_second),
        d(2025, 12, 24)
    );
}

#[test]
fn expired_cutoff_falls_back_to_normal_rule() {
    let cal = bakery(vec![christmas_eve_extension()]);
    let rules = PickupRules::default();
    let now = at(d(2025, 12, 22), 10, 0, 0);

    let base = rules.base_minimum_date(&cal, ProductCategory::Bread, now);
    assert_eq!(base, d(2025, 12, 26));
    assert!(!rules.is_selectable(&cal, d(2025, 12, 24), base, now));
    assert_eq!(
        rules.earliest_selectable_date(&cal, ProductCategory::Bread, now),
        d(2025, 12, 26)
    );
}

#[test]
fn expired_cutoff_with_christmas_closure_lands_on_the_27th() {
    let cal = bakery(vec![
        christmas_eve_extension(),
        CalendarOverride::closed(d(2025, 12, 25)).with_reason("Noël"),
    ]);
    let rules = PickupRules::default();

    let before_cutoff = at(d(2025, 12, 20), 14, 0, 0);
    assert_eq!(
        rules.base_minimum_date(&cal, ProductCategory::Bread, before_cutoff),
        d(2025, 12, 27)
    );
    assert_eq!(
        rules.earliest_selectable_date(&cal, ProductCategory::Bread, before_cutoff),
        d(2025, 12, 24)
    );

    let after_cutoff = at(d(2025, 12, 22), 10, 0, 0);
    assert_eq!(
        rules.earliest_selectable_date(&cal, ProductCategory::Bread, after_cutoff),
        d(2025, 12, 27)
    );
}

#[test]
fn closed_date_with_cutoff_is_never_selectable() {
    let closed_with_cutoff = CalendarOverride::closed(d(2025, 12, 23)).with_cutoff(d(2025, 12, 22));
    let cal = bakery(vec![closed_with_cutoff]);
    let rules = PickupRules::default();
    let now = at(d(2025, 12, 20), 14, 0, 0);

    let base = rules.base_minimum_date(&cal, ProductCategory::Other, now);
    assert_eq!(base, d(2025, 12, 25));
    assert!(!rules.is_selectable(&cal, d(2025, 12, 23), base, now));
    assert_eq!(
        rules.earliest_selectable_date(&cal, ProductCategory::Other, now),
        d(2025, 12, 25)
    );
}

#[test]
fn today_and_past_dates_are_not_selectable() {
    let cal = bakery(vec![
        CalendarOverride::open(d(2025, 12, 16), t(8, 0), t(19, 0)).with_cutoff(d(2025, 12, 30)),
    ]);
    let rules = PickupRules::default();
    let now = at(d(2025, 12, 16), 9, 0, 0);
    assert!(!rules.is_selectable(&cal, d(2025, 12, 16), d(2025, 12, 10), now));
    assert!(!rules.is_selectable(&cal, d(2025, 12, 15), d(2025, 12, 10), now));
}

#[test]
fn earliest_date_is_deterministic() {
    let cal = bakery(vec![christmas_eve_extension()]);
    let rules = PickupRules::default();
    let now = at(d(2025, 12, 19), 16, 30, 0);
    let first = rules.earliest_selectable_date(&cal, ProductCategory::Bread, now);
    let second = rules.earliest_selectable_date(&cal, ProductCategory::Bread, now);
    assert_eq!(first, second);
}

#[test]
fn nothing_selectable_within_horizon_returns_base_minimum() {
    let cal = bakery(vec![]);
    let config = PickupConfig {
        lead_times: LeadTimes {
            other_before_noon: 70,
            ..LeadTimes::default()
        },
        ..PickupConfig::default()
    };
    let rules = PickupRules::new(config);
    let now = at(d(2025, 12, 16), 10, 0, 0);

    let base = rules.base_minimum_date(&cal, ProductCategory::Other, now);
    assert!(base > d(2025, 12, 16) + Duration::days(60));
    assert_eq!(
        rules.earliest_selectable_date(&cal, ProductCategory::Other, now),
        base
    );
}

#[test]
fn calendar_without_open_days_degrades_instead_of_looping() {
    logging::init_test();
    let cal = BakeryCalendar::new(WeeklySchedule::new([DayHours::closed(); 7]), OverrideSet::new());
    let rules = PickupRules::default();
    let now = at(d(2025, 12, 16), 10, 0, 0);
    assert_eq!(
        rules.earliest_selectable_date(&cal, ProductCategory::Other, now),
        d(2025, 12, 17)
    );
}

#[test]
fn quote_reports_base_and_earliest() {
    let cal = bakery(vec![christmas_eve_extension()]);
    let rules = PickupRules::default();
    let now = at(d(2025, 12, 20), 14, 0, 0);
    let quote = rules.quote(&cal, ProductCategory::from_name("pain"), now);
    assert_eq!(quote.category, ProductCategory::Bread);
    assert_eq!(quote.base_minimum_date, d(2025, 12, 26));
    assert_eq!(quote.earliest_date, d(2025, 12, 24));
}

#[test]
fn validate_pickup_date_explains_rejections() {
    let cal = bakery(vec![
        christmas_eve_extension(),
        CalendarOverride::closed(d(2025, 12, 25)),
    ]);
    let rules = PickupRules::default();
    let now = at(d(2025, 12, 22), 10, 0, 0);
    let bread = ProductCategory::Bread;

    assert_eq!(
        rules.validate_pickup_date(&cal, bread, d(2025, 12, 22), now),
        Err(PickupError::NotInFuture {
            requested: d(2025, 12, 22),
            today: d(2025, 12, 22),
        })
    );
    assert_eq!(
        rules.validate_pickup_date(&cal, bread, d(2025, 12, 25), now),
        Err(PickupError::Closed(d(2025, 12, 25)))
    );
    assert_eq!(
        rules.validate_pickup_date(&cal, bread, d(2025, 12, 24), now),
        Err(PickupError::CutoffPassed {
            requested: d(2025, 12, 24),
            cutoff: d(2025, 12, 21),
        })
    );
    assert_eq!(
        rules.validate_pickup_date(&cal, bread, d(2025, 12, 23), now),
        Err(PickupError::TooEarly {
            requested: d(2025, 12, 23),
            earliest: d(2025, 12, 27),
        })
    );
    assert_eq!(rules.validate_pickup_date(&cal, bread, d(2025, 12, 27), now), Ok(()));

    let before_cutoff = at(d(2025, 12, 20), 14, 0, 0);
    assert_eq!(
        rules.validate_pickup_date(&cal, bread, d(2025, 12, 24), before_cutoff),
        Ok(())
    );
}

#[test]
fn category_resolution_defaults_to_generic() {
    assert_eq!(ProductCategory::from_name("Pain"), ProductCategory::Bread);
    assert_eq!(ProductCategory::from_name(" pain "), ProductCategory::Bread);
    assert_eq!(ProductCategory::from_name("Viennoiserie"), ProductCategory::Other);
    assert_eq!(ProductCategory::from_name(""), ProductCategory::Other);
    assert_eq!(
        ProductCategory::for_cart([ProductCategory::Other, ProductCategory::Bread]),
        ProductCategory::Bread
    );
    assert_eq!(
        ProductCategory::for_cart(Vec::<ProductCategory>::new()),
        ProductCategory::Other
    );
}
