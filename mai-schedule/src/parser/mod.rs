//! Turns schedule pages into [`Day`](crate::Day) and [`Week`](crate::Week) records.

mod days;
mod weeks;

pub use days::split_day_header;
pub use weeks::{current_week_number, normalize_range_label, week_bounds};

use crate::error::ScheduleError;
use crate::html::Selectors;

/// Pure document → record parser. Holds nothing but compiled selectors, so
/// one instance can serve any number of pages.
#[derive(Debug, Clone)]
pub struct ScheduleParser {
    selectors: Selectors,
}

impl ScheduleParser {
    pub fn new() -> Result<Self, ScheduleError> {
        Ok(Self {
            selectors: Selectors::new()?,
        })
    }

    pub fn selectors(&self) -> &Selectors {
        &self.selectors
    }
}
