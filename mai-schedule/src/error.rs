use mai_http::HttpError;
use thiserror::Error;

use crate::model::Schedule;

/// Why a group identifier was rejected.
#[derive(Debug, Error)]
pub enum GroupError {
    #[error("group '{0}' doesn't match the pattern")]
    ShapeMismatch(String),
    #[error("group '{0}' not found in the schedule listing")]
    NotFound(String),
    #[error("failed to load the group listing: {0}")]
    Listing(#[source] HttpError),
}

impl GroupError {
    /// Numeric classification: 1 shape, 2 not found, 10 listing unavailable.
    pub fn code(&self) -> u8 {
        match self {
            GroupError::ShapeMismatch(_) => 1,
            GroupError::NotFound(_) => 2,
            GroupError::Listing(_) => 10,
        }
    }
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("error code: {}, {0}", .0.code())]
    Group(#[from] GroupError),
    #[error("fetch failed: {0}")]
    Fetch(#[from] HttpError),
    #[error("unreadable schedule page: {0}")]
    Parse(String),
    #[error("invalid site configuration: {0}")]
    Config(String),
    /// The week list was parsed but no range contains "now". The partially
    /// filled schedule (group and weeks) is kept for the caller.
    #[error("current week doesn't correspond to any schedule week")]
    UnresolvedWeek { partial: Box<Schedule> },
    #[error("wrong mode '{0}'")]
    InvalidMode(String),
    #[error("no schedule day matches {date}")]
    DayNotFound { date: String },
}

impl ScheduleError {
    /// Numeric classification. Group errors keep their validator code.
    pub fn code(&self) -> u8 {
        match self {
            ScheduleError::Group(inner) => inner.code(),
            ScheduleError::Fetch(_) => 10,
            ScheduleError::Parse(_) => 11,
            ScheduleError::Config(_) => 12,
            ScheduleError::UnresolvedWeek { .. } => 20,
            ScheduleError::InvalidMode(_) => 21,
            ScheduleError::DayNotFound { .. } => 22,
        }
    }

    /// The partial schedule carried by [`ScheduleError::UnresolvedWeek`].
    pub fn partial_schedule(&self) -> Option<&Schedule> {
        match self {
            ScheduleError::UnresolvedWeek { partial } => Some(partial),
            _ => None,
        }
    }
}
