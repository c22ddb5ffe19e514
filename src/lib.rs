//! `loandash` library crate.
//!
//! The binary (`loandash`) is a thin wrapper around this library so that:
//!
//! - aggregation and chart building are testable without a terminal
//! - the same `render` output feeds the TUI, the text report and the JSON export

pub mod analysis;
pub mod app;
pub mod chart;
pub mod cli;
pub mod dashboard;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod normalize;
pub mod report;
pub mod state;
pub mod tui;
