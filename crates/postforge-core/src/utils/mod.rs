//! Formatting helpers shared by the CLI surfaces.

pub mod format;

pub use format::{format_datetime, format_optional};
