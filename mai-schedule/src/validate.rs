use regex::Regex;
use scraper::Html;

use crate::error::{GroupError, ScheduleError};
use crate::html::{Selectors, text_of};

/// Dash, 1-3 digits, optional whitespace, 1-3 letters of any script, dash,
/// digits. Matches codes such as `М8О-406Б-19`.
const GROUP_SHAPE: &str = r"-[0-9]{1,3}\s?\p{L}{1,3}-[0-9]+";

#[derive(Debug, Clone)]
pub struct GroupValidator {
    shape: Regex,
}

impl GroupValidator {
    pub fn new() -> Result<Self, ScheduleError> {
        let shape = Regex::new(GROUP_SHAPE)
            .map_err(|e| ScheduleError::Config(format!("group pattern: {e}")))?;
        Ok(Self { shape })
    }

    /// Offline shape check; never touches the network.
    pub fn check_shape(&self, group: &str) -> Result<(), GroupError> {
        if self.shape.is_match(group) {
            Ok(())
        } else {
            Err(GroupError::ShapeMismatch(group.to_string()))
        }
    }

    /// Whether the listing page offers `group` as a selectable item.
    ///
    /// Items are compared whole rather than searched as substrings, so a
    /// truncated code such as `М8О-406Б-1` never matches `М8О-406Б-19`.
    pub fn listed_in(&self, listing: &Html, selectors: &Selectors, group: &str) -> bool {
        let wanted = normalize_group(group);
        listing
            .select(&selectors.group_item)
            .any(|item| text_of(item) == wanted)
    }
}

/// Trim and collapse inner whitespace runs to single spaces.
pub fn normalize_group(group: &str) -> String {
    group.split_whitespace().collect::<Vec<_>>().join(" ")
}
