//! Selectors for the schedule markup and text helpers over `scraper` nodes.

use scraper::{ElementRef, Selector};

use crate::error::ScheduleError;

const GROUP_ITEM: &str = "div#schedule-content a.sc-group-item";
const DAY_CONTAINER: &str = "div#schedule-content div.sc-container";
const DAY_HEADER: &str = "div.sc-table-col.sc-day-header";
const PERIOD_ROW: &str = "div.sc-table.sc-table-detail div.sc-table-row";
const PERIOD_TIME: &str = "div.sc-table-col.sc-item-time";
const PERIOD_KIND: &str = "div.sc-table-col.sc-item-type";
const PERIOD_TITLE: &str = "span.sc-title";
const PERIOD_INSTRUCTOR: &str = "span.sc-lecturer";
const PERIOD_LOCATION: &str = "div.sc-table-col.sc-item-location";
const WEEK_CELL: &str = "div#schedule-content table.table tr td";

/// Compiled selectors for every element the parsers look at.
#[derive(Debug, Clone)]
pub struct Selectors {
    pub group_item: Selector,
    pub day_container: Selector,
    pub day_header: Selector,
    pub period_row: Selector,
    pub period_time: Selector,
    pub period_kind: Selector,
    pub period_title: Selector,
    pub period_instructor: Selector,
    pub period_location: Selector,
    pub week_cell: Selector,
}

impl Selectors {
    pub fn new() -> Result<Self, ScheduleError> {
        Ok(Self {
            group_item: sel(GROUP_ITEM)?,
            day_container: sel(DAY_CONTAINER)?,
            day_header: sel(DAY_HEADER)?,
            period_row: sel(PERIOD_ROW)?,
            period_time: sel(PERIOD_TIME)?,
            period_kind: sel(PERIOD_KIND)?,
            period_title: sel(PERIOD_TITLE)?,
            period_instructor: sel(PERIOD_INSTRUCTOR)?,
            period_location: sel(PERIOD_LOCATION)?,
            week_cell: sel(WEEK_CELL)?,
        })
    }
}

fn sel(css: &str) -> Result<Selector, ScheduleError> {
    Selector::parse(css).map_err(|e| ScheduleError::Config(format!("selector `{css}`: {e}")))
}

/// Visible text of `el` with whitespace runs collapsed and ends trimmed.
pub fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of every `selector` match under `el`, joined with ", ".
/// No match yields an empty string.
pub fn joined_text(el: ElementRef<'_>, selector: &Selector) -> String {
    el.select(selector)
        .map(text_of)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
