use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use scraper::Html;

use super::ScheduleParser;
use crate::html::text_of;
use crate::model::Week;

impl ScheduleParser {
    /// Parse the week table and find the week containing `now`.
    ///
    /// Cells alternate number, label, number, label... Week numbers are taken
    /// from the site as published and are unique there. An unparsable number
    /// becomes 0 and the scan goes on, so several 0 entries may appear; a 0
    /// week never resolves as current. Returns 0 as the current week when no
    /// range contains `now`.
    pub fn parse_weeks(&self, doc: &Html, now: NaiveDateTime) -> (Vec<Week>, u32) {
        let year = now.year();
        let weeks = doc
            .select(&self.selectors.week_cell)
            .map(text_of)
            .enumerate()
            .fold(Vec::new(), |mut weeks: Vec<Week>, (index, cell)| {
                if index % 2 == 0 {
                    weeks.push(Week {
                        number: cell.parse().unwrap_or(0),
                        date_range_label: String::new(),
                    });
                } else if let Some(week) = weeks.last_mut() {
                    week.date_range_label = normalize_range_label(&cell, year);
                }
                weeks
            });

        let current = current_week_number(&weeks, now);
        tracing::debug!(weeks = weeks.len(), current, "schedule.parse_weeks");
        (weeks, current)
    }
}

/// `01.09.2024 - 07.09.2024` → `01.09.24-07.09.24` when `year` is 2024.
pub fn normalize_range_label(label: &str, year: i32) -> String {
    label
        .replace(" - ", "-")
        .replace(&format!("{year:04}"), &format!("{:02}", year.rem_euclid(100)))
}

/// Number of the first week whose range strictly contains `now`, or 0.
pub fn current_week_number(weeks: &[Week], now: NaiveDateTime) -> u32 {
    weeks
        .iter()
        .find(|week| {
            week_bounds(&week.date_range_label, now.year())
                .is_some_and(|(start, end)| start < now && now < end)
        })
        .map(|week| week.number)
        .unwrap_or(0)
}

/// Start and end of a normalized label, both at midnight. `None` when either
/// side doesn't parse.
pub fn week_bounds(label: &str, year: i32) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let mut sides = label.split('-');
    let start = parse_label_date(sides.next()?, year)?;
    let end = parse_label_date(sides.next()?, year)?;
    Some((start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN)))
}

fn parse_label_date(raw: &str, year: i32) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%d.%m.%y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d.%m.%Y"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}.{year:04}"), "%d.%m.%Y"))
        .ok()
}
