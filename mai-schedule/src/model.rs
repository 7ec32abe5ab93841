use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// A group's schedule for one request: a day, a week or the exam session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub group: String,
    /// Academic week containing "now"; 0 when unresolved or not computed.
    pub current_week_number: u32,
    pub days: Vec<Day>,
    pub weeks: Vec<Week>,
}

impl Schedule {
    pub(crate) fn for_group(group: &str) -> Self {
        Self {
            group: group.to_string(),
            ..Self::default()
        }
    }
}

/// An academic week and its boundaries, e.g. `01.09.24-07.09.24`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub number: u32,
    pub date_range_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    /// `DD.MM`
    pub date: String,
    pub weekday: String,
    pub periods: Vec<Period>,
}

/// One class ("pair"). Any field may be empty when the page omits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub time: String,
    pub kind: String,
    pub title: String,
    pub instructor: String,
    pub location: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayMode {
    Today,
    Tomorrow,
}

impl DayMode {
    /// How many day containers to scan so the target day is among them.
    pub fn containers_to_scan(self) -> usize {
        match self {
            DayMode::Today => 1,
            DayMode::Tomorrow => 2,
        }
    }
}

impl FromStr for DayMode {
    type Err = ScheduleError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "today" => Ok(DayMode::Today),
            "tomorrow" => Ok(DayMode::Tomorrow),
            other => Err(ScheduleError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for DayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DayMode::Today => "today",
            DayMode::Tomorrow => "tomorrow",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekMode {
    /// Only resolve the current week number and the week list.
    ThisWeekNum,
    ThisWeek,
    NextWeek,
    /// An explicit academic week, written `<N>week`.
    Numbered(u32),
}

impl FromStr for WeekMode {
    type Err = ScheduleError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "thisweeknum" => Ok(WeekMode::ThisWeekNum),
            "thisweek" => Ok(WeekMode::ThisWeek),
            "nextweek" => Ok(WeekMode::NextWeek),
            other => other
                .strip_suffix("week")
                .filter(|n| (1..=2).contains(&n.len()) && n.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|n| n.parse().ok())
                .map(WeekMode::Numbered)
                .ok_or_else(|| ScheduleError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for WeekMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekMode::ThisWeekNum => f.write_str("thisweeknum"),
            WeekMode::ThisWeek => f.write_str("thisweek"),
            WeekMode::NextWeek => f.write_str("nextweek"),
            WeekMode::Numbered(n) => write!(f, "{n}week"),
        }
    }
}
