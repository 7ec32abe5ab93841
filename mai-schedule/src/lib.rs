//! Structured access to the MAI published class schedule.
//!
//! The pipeline is: validate the group code against the site's listing,
//! fetch the page variant for the request (day, week or exam session), parse
//! the markup into [`Day`], [`Period`] and [`Week`] records, and work out which
//! academic week is current.
//!
//! # Overview
//!
//! - [`ScheduleClient`]: the assembler and the public entry points
//! - [`ScheduleParser`]: pure document → record parsing
//! - [`GroupValidator`]: offline shape check and listing lookup
//! - [`DocumentSource`]: the fetch seam, implemented for [`mai_http::HttpClient`]
//! - [`ScheduleError`] / [`GroupError`]: errors with numeric codes
//!
//! ```no_run
//! use mai_config::ScheduleConfigLoader;
//! use mai_schedule::ScheduleClient;
//!
//! let config = ScheduleConfigLoader::new().load()?;
//! let client = ScheduleClient::from_config(&config)?;
//! let week = client.week_schedule("thisweek", "М8О-406Б-19")?;
//! for day in &week.days {
//!     println!("{} {}: {} classes", day.date, day.weekday, day.periods.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod client;
pub mod error;
pub mod html;
pub mod model;
pub mod parser;
pub mod source;
pub mod validate;

pub use client::ScheduleClient;
pub use error::{GroupError, ScheduleError};
pub use model::{Day, DayMode, Period, Schedule, Week, WeekMode};
pub use parser::ScheduleParser;
pub use source::DocumentSource;
pub use validate::GroupValidator;
