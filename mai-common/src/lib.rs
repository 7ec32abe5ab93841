//! Common utilities shared across the MAI schedule crates.
//!
//! Today this is the [`observability`] module: one place that decides how
//! `tracing` output is formatted and where it is written.
//!
//! ```no_run
//! use mai_common::observability::{init_logging, LogConfig};
//!
//! let path = init_logging(LogConfig::default()).expect("logging");
//! println!("logging to {}", path.display());
//! ```

pub mod observability;

pub use observability::{init_logging, LogConfig, LogFormat};
