use scraper::{ElementRef, Html};

use super::ScheduleParser;
use crate::error::ScheduleError;
use crate::html::{joined_text, text_of};
use crate::model::{Day, Period};

impl ScheduleParser {
    /// Parse day containers in document order.
    ///
    /// `max_count == 0` parses every container; otherwise parsing stops after
    /// `max_count` containers.
    pub fn parse_days(&self, doc: &Html, max_count: usize) -> Result<Vec<Day>, ScheduleError> {
        let limit = if max_count == 0 { usize::MAX } else { max_count };
        let days = doc
            .select(&self.selectors.day_container)
            .take(limit)
            .enumerate()
            .map(|(index, container)| self.parse_day(index, container))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(max_count, days = days.len(), "schedule.parse_days");
        Ok(days)
    }

    fn parse_day(&self, index: usize, container: ElementRef<'_>) -> Result<Day, ScheduleError> {
        let header = container
            .select(&self.selectors.day_header)
            .next()
            .map(text_of)
            .unwrap_or_default();
        let (date, weekday) = split_day_header(&header).ok_or_else(|| {
            ScheduleError::Parse(format!("day #{index} has no date in header '{header}'"))
        })?;

        let periods = container
            .select(&self.selectors.period_row)
            .map(|row| self.parse_period(row))
            .collect();

        Ok(Day {
            date,
            weekday,
            periods,
        })
    }

    fn parse_period(&self, row: ElementRef<'_>) -> Period {
        let s = &self.selectors;
        Period {
            time: joined_text(row, &s.period_time),
            kind: joined_text(row, &s.period_kind),
            title: joined_text(row, &s.period_title),
            instructor: joined_text(row, &s.period_instructor),
            location: joined_text(row, &s.period_location),
        }
    }
}

/// Split a day header such as `01.09Пн` or `01.09 Пн` into date and weekday.
///
/// The date is the leading run of digits and dots; the weekday is the run of
/// letters that follows, after optional whitespace. Returns `None` when there
/// is no date.
pub fn split_day_header(header: &str) -> Option<(String, String)> {
    let header = header.trim();
    let date_end = header
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(header.len());
    let date = header[..date_end].trim_end_matches('.');
    if !date.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    let weekday: String = header[date_end..]
        .trim_start()
        .chars()
        .take_while(|c| c.is_alphabetic())
        .collect();
    Some((date.to_string(), weekday))
}
