//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - categorical enums (`LoanCondition`, `Grade`, `Weekday`)
//! - the loan row (`LoanRecord`)
//! - data source selection and shared constants

pub mod types;

pub use types::*;
