//! Formatting and parsing helpers

pub mod helper;

pub use helper::{format_address, format_units, parse_address};
