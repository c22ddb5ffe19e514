//! Reporting utilities: number formatting and plain-text dashboard output.

pub mod format;

pub use format::{fmt_money, fmt_percent, fmt_thousands, format_dashboard, format_panel};
