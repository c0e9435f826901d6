//! CLI command handlers

pub mod commands;

pub use commands::{export, inspect, range_report, ranges, ranges_help, render_export, RangeStatus};
