mod common;

use common::{at, init_test_tracing, site, StubSource, BASE, GROUP};
use mai_schedule::{DayMode, GroupError, ScheduleClient, ScheduleError, WeekMode};

fn client(stub: &StubSource, now: chrono::NaiveDateTime) -> ScheduleClient<&StubSource> {
    init_test_tracing();
    ScheduleClient::new(&site(), stub)
        .expect("client")
        .with_clock(move || now)
}

// ---------- group validation ----------

#[test]
fn bad_shapes_fail_without_any_fetch() {
    let stub = StubSource::site();
    let client = client(&stub, at(2024, 9, 9, 12));

    for bad in ["", "M8O406B19", "M8O-406-19", "M8O-406B-", "группа", "M8O-4060B-19"] {
        let err = client.validate_group(bad).unwrap_err();
        assert!(matches!(err, GroupError::ShapeMismatch(_)), "{bad}: {err}");
        assert_eq!(err.code(), 1);
    }
    assert_eq!(stub.call_count(), 0);
}

#[test]
fn listed_group_is_valid_after_one_listing_fetch() {
    let stub = StubSource::site();
    let client = client(&stub, at(2024, 9, 9, 12));

    client.validate_group(GROUP).expect("listed group");
    client.validate_group("М3О-214Бк-21").expect("listed cyrillic group");
    assert_eq!(stub.calls(), vec![BASE.to_string(), BASE.to_string()]);
}

#[test]
fn unlisted_group_is_not_found() {
    let stub = StubSource::site();
    let client = client(&stub, at(2024, 9, 9, 12));

    let err = client.validate_group("M8O-407B-19").unwrap_err();
    assert!(matches!(err, GroupError::NotFound(ref g) if g == "M8O-407B-19"));
    assert_eq!(err.code(), 2);

    // A prefix of a listed group is not the group.
    let err = client.validate_group("M8O-406B-1").unwrap_err();
    assert_eq!(err.code(), 2);
}

#[test]
fn listing_fetch_failure_is_code_ten() {
    let stub = StubSource::new();
    let client = client(&stub, at(2024, 9, 9, 12));

    let err = client.validate_group(GROUP).unwrap_err();
    assert_eq!(err.code(), 10);
    assert!(std::error::Error::source(&err).is_some());
    assert_eq!(stub.call_count(), 1);
}

#[test]
fn entry_points_wrap_validation_errors_with_their_code() {
    let stub = StubSource::site();
    let client = client(&stub, at(2024, 9, 9, 12));

    let err = client.day_schedule("today", "M8O-999B-19").unwrap_err();
    assert_eq!(err.code(), 2);
    assert!(err.to_string().starts_with("error code: 2, "), "{err}");

    let err = client.week_schedule("thisweek", "nonsense").unwrap_err();
    assert!(matches!(err, ScheduleError::Group(GroupError::ShapeMismatch(_))));

    let err = client.session_schedule("M8O-999B-19").unwrap_err();
    assert_eq!(err.code(), 2);
}

// ---------- single-day mode ----------

#[test]
fn today_returns_the_matching_day() {
    let stub = StubSource::site();
    let client = client(&stub, at(2024, 9, 9, 8));

    let schedule = client.day_schedule("today", GROUP).expect("today");
    assert_eq!(schedule.group, GROUP);
    assert_eq!(schedule.days.len(), 1);
    let day = &schedule.days[0];
    assert_eq!(day.date, "09.09");
    assert_eq!(day.weekday, "Пн");
    assert_eq!(day.periods.len(), 2);
    assert_eq!(day.periods[0].title, "Математический анализ");
    assert_eq!(day.periods[0].instructor, "Петров Пётр Петрович");
    assert_eq!(day.periods[1].instructor, "");
    assert!(schedule.weeks.is_empty());
    assert_eq!(
        stub.calls(),
        vec![BASE.to_string(), format!("{BASE}detail.php?group={GROUP}")]
    );
}

#[test]
fn tomorrow_looks_at_the_second_container() {
    let stub = StubSource::site();
    let client = client(&stub, at(2024, 9, 9, 23));

    let schedule = client.day_schedule_for(DayMode::Tomorrow, GROUP).expect("tomorrow");
    let day = &schedule.days[0];
    assert_eq!(day.date, "10.09");
    assert_eq!(day.weekday, "Вт");
    assert_eq!(day.periods[0].instructor, "Сидоров С.С., Кузнецова К.К.");
}

#[test]
fn missing_day_is_an_explicit_error() {
    let stub = StubSource::site();
    // 11.09 is the third container; "today" scans only the first.
    let client = client(&stub, at(2024, 9, 11, 10));

    let err = client.day_schedule("today", GROUP).unwrap_err();
    assert!(matches!(err, ScheduleError::DayNotFound { ref date } if date == "11.09"));
    assert_eq!(err.code(), 22);
}

#[test]
fn wrong_day_mode_costs_only_the_validation_fetch() {
    let stub = StubSource::site();
    let client = client(&stub, at(2024, 9, 9, 12));

    let err = client.day_schedule("bogus", GROUP).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidMode(ref m) if m == "bogus"));
    assert_eq!(err.code(), 21);
    assert_eq!(stub.calls(), vec![BASE.to_string()]);
}

// ---------- week mode ----------

#[test]
fn thisweeknum_fetches_the_detail_page_once() {
    let stub = StubSource::site();
    let client = client(&stub, at(2024, 9, 10, 12));

    let schedule = client.week_schedule("thisweeknum", GROUP).expect("week number");
    assert_eq!(schedule.current_week_number, 2);
    assert_eq!(schedule.weeks.len(), 3);
    assert_eq!(schedule.weeks[1].date_range_label, "09.09.24-15.09.24");
    assert!(schedule.days.is_empty());

    let detail_fetches = stub
        .calls()
        .iter()
        .filter(|u| u.contains("detail.php"))
        .count();
    assert_eq!(detail_fetches, 1);
    assert_eq!(stub.call_count(), 2);
}

#[test]
fn thisweek_and_nextweek_select_relative_weeks() {
    let stub = StubSource::site();
    let client = client(&stub, at(2024, 9, 10, 12));

    let this_week = client.week_schedule("thisweek", GROUP).expect("this week");
    assert_eq!(this_week.days.len(), 3);
    assert_eq!(this_week.days[2].date, "11.09");
    assert!(this_week.days[2].periods.is_empty());
    assert_eq!(
        stub.calls().last().map(String::as_str),
        Some(format!("{BASE}detail.php?group={GROUP}&week=2").as_str())
    );

    client.week_schedule_for(WeekMode::NextWeek, GROUP).expect("next week");
    assert!(stub.calls().last().unwrap().ends_with("&week=3"));
}

#[test]
fn numbered_week_requests_that_week() {
    let stub = StubSource::site();
    let client = client(&stub, at(2024, 9, 10, 12));

    let schedule = client.week_schedule("5week", GROUP).expect("week 5");
    let calls = stub.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[2].contains("week=5"), "{calls:?}");
    assert_eq!(schedule.current_week_number, 2);
    let dates: Vec<_> = schedule.days.iter().map(|d| d.date.as_str()).collect();
    assert_eq!(dates, ["30.09", "01.10"]);
    assert_eq!(schedule.days[0].periods[0].title, "Дискретная математика");
}

#[test]
fn unresolved_week_keeps_the_partial_schedule() {
    let stub = StubSource::site();
    let client = client(&stub, at(2025, 1, 15, 12));

    let err = client.week_schedule("thisweek", GROUP).unwrap_err();
    assert_eq!(err.code(), 20);
    let partial = err.partial_schedule().expect("partial schedule");
    assert_eq!(partial.group, GROUP);
    assert_eq!(partial.current_week_number, 0);
    assert_eq!(partial.weeks.len(), 3);
    assert!(partial.days.is_empty());
    assert_eq!(stub.call_count(), 2);
}

#[test]
fn wrong_week_mode_costs_only_the_validation_fetch() {
    let stub = StubSource::site();
    let client = client(&stub, at(2024, 9, 10, 12));

    for bogus in ["bogus", "week", "123week"] {
        let err = client.week_schedule(bogus, GROUP).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidMode(_)), "{bogus}");
    }
    assert!(stub.calls().iter().all(|u| u == BASE));
}

#[test]
fn failed_week_refetch_is_a_fetch_error() {
    let stub = StubSource::site();
    let client = client(&stub, at(2024, 9, 10, 12));

    let err = client.week_schedule("7week", GROUP).unwrap_err();
    assert!(matches!(err, ScheduleError::Fetch(_)));
    assert_eq!(err.code(), 10);
}

// ---------- session mode ----------

#[test]
fn session_returns_every_day() {
    let stub = StubSource::site();
    let client = client(&stub, at(2024, 12, 20, 12));

    let schedule = client.session_schedule(GROUP).expect("session");
    assert_eq!(schedule.group, GROUP);
    assert_eq!(schedule.current_week_number, 0);
    assert!(schedule.weeks.is_empty());
    let kinds: Vec<_> = schedule
        .days
        .iter()
        .map(|d| d.periods[0].kind.as_str())
        .collect();
    assert_eq!(kinds, ["Консультация", "Экзамен", "Экзамен"]);
    assert_eq!(
        stub.calls(),
        vec![BASE.to_string(), format!("{BASE}session.php?group={GROUP}")]
    );
}

#[test]
fn schedules_serialize_to_json() {
    let stub = StubSource::site();
    let client = client(&stub, at(2024, 12, 20, 12));

    let schedule = client.session_schedule(GROUP).expect("session");
    let json = serde_json::to_value(&schedule).unwrap();
    assert_eq!(json["group"], GROUP);
    assert_eq!(json["days"][1]["date"], "14.01");
    assert_eq!(json["days"][1]["periods"][0]["location"], "ГУК В-312");
}

#[test]
fn next_week_after_the_largest_week_number_is_a_parse_error() {
    let stub = StubSource::new()
        .page(BASE, "listing.html")
        .page(&format!("{BASE}detail.php?group={GROUP}"), "detail_last_week.html");
    let client = client(&stub, at(2024, 9, 10, 12));

    let this_week = client.week_schedule("thisweeknum", GROUP).expect("week number");
    assert_eq!(this_week.current_week_number, u32::MAX);

    let err = client.week_schedule("nextweek", GROUP).unwrap_err();
    assert!(matches!(err, ScheduleError::Parse(_)), "{err}");
    assert_eq!(err.code(), 11);
    assert!(stub.calls().iter().all(|u| !u.contains("week=")));
}

// ---------- group normalization ----------

#[test]
fn padded_group_is_normalized_before_building_urls() {
    let stub = StubSource::site();
    let client = client(&stub, at(2024, 9, 10, 12));

    let schedule = client
        .week_schedule("thisweeknum", &format!("  {GROUP} "))
        .expect("padded group");
    assert_eq!(schedule.group, GROUP);
    assert_eq!(schedule.current_week_number, 2);
    assert_eq!(
        stub.calls(),
        vec![BASE.to_string(), format!("{BASE}detail.php?group={GROUP}")]
    );

    let session = client.session_schedule(&format!("\t{GROUP}\n")).expect("session");
    assert_eq!(session.group, GROUP);
    assert_eq!(
        stub.calls().last().map(String::as_str),
        Some(format!("{BASE}session.php?group={GROUP}").as_str())
    );
}
