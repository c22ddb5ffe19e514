//! Shared domain types.
//!
//! These types are kept lightweight and serializable so they can be:
//!
//! - held in memory as the loaded loan table
//! - written back out by the synthetic sample generator
//! - embedded in chart specifications printed as JSON

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Performance classification of a loan.
///
/// The dataset partitions every row into exactly one of these two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
pub enum LoanCondition {
    #[serde(rename = "Good Loan")]
    #[value(name = "good")]
    Good,
    #[serde(rename = "Bad Loan")]
    #[value(name = "bad")]
    Bad,
}

impl LoanCondition {
    pub const ALL: [LoanCondition; 2] = [LoanCondition::Good, LoanCondition::Bad];

    pub fn display_name(self) -> &'static str {
        match self {
            LoanCondition::Good => "Good Loan",
            LoanCondition::Bad => "Bad Loan",
        }
    }

    pub fn other(self) -> Self {
        match self {
            LoanCondition::Good => LoanCondition::Bad,
            LoanCondition::Bad => LoanCondition::Good,
        }
    }

    /// Parse a dataset value (`Good Loan`, `bad loan`, `good`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("good loan") || s.eq_ignore_ascii_case("good") {
            Some(LoanCondition::Good)
        } else if s.eq_ignore_ascii_case("bad loan") || s.eq_ignore_ascii_case("bad") {
            Some(LoanCondition::Bad)
        } else {
            None
        }
    }
}

impl fmt::Display for LoanCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Credit grade, ordinal from best (`A`) to worst (`G`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Grade {
    pub const ALL: [Grade; 7] = [
        Grade::A,
        Grade::B,
        Grade::C,
        Grade::D,
        Grade::E,
        Grade::F,
        Grade::G,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
            Grade::G => "G",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Grade::ALL
            .into_iter()
            .find(|g| g.display_name().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Day of the week a loan was issued on.
///
/// Variants are declared in calendar order (Monday first) so the derived `Ord`
/// matches the order charts display them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Category order used by the weekday chart.
    ///
    /// Sunday is not listed; rows issued on a Sunday still count toward the
    /// aggregate and are placed after Saturday on the chart axis.
    pub const DISPLAY_ORDER: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Accepts full English names and three-letter abbreviations, any case.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Weekday::ALL.into_iter().find(|d| {
            let name = d.display_name();
            name.eq_ignore_ascii_case(s) || (s.len() == 3 && name[..3].eq_ignore_ascii_case(s))
        })
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(value: chrono::Weekday) -> Self {
        match value {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One row of the loan table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: String,
    pub loan_amount: f64,
    /// Percentage, e.g. `13.56` for 13.56%.
    pub interest_rate: f64,
    pub issue_date: NaiveDate,
    pub issue_weekday: Weekday,
    /// Loan term label as it appears in the dataset (e.g. `36 months`).
    pub term: String,
    pub purpose: Option<String>,
    pub loan_condition: LoanCondition,
    pub grade: Grade,
}

/// Where the dashboard gets its rows from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// A CSV or JSON file on disk.
    File(PathBuf),
    /// An in-memory synthetic table (`rows`, `seed`).
    Synthetic { rows: usize, seed: u64 },
}

impl DataSource {
    pub fn describe(&self) -> String {
        match self {
            DataSource::File(path) => path.display().to_string(),
            DataSource::Synthetic { rows, seed } => format!("synthetic (rows={rows}, seed={seed})"),
        }
    }
}

/// Default location of the cleaned dataset, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data_input/loan_clean.csv";

/// Number of equal-width bins in the loan amount histogram.
pub const HISTOGRAM_BINS: usize = 20;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_parse_accepts_names_and_abbreviations() {
        assert_eq!(Weekday::parse("monday"), Some(Weekday::Monday));
        assert_eq!(Weekday::parse(" Sat "), Some(Weekday::Saturday));
        assert_eq!(Weekday::parse("Funday"), None);
    }

    #[test]
    fn weekday_display_order_skips_sunday() {
        assert_eq!(Weekday::DISPLAY_ORDER.len(), 6);
        assert!(!Weekday::DISPLAY_ORDER.contains(&Weekday::Sunday));
        let mut sorted = Weekday::DISPLAY_ORDER;
        sorted.sort();
        assert_eq!(sorted, Weekday::DISPLAY_ORDER);
    }

    #[test]
    fn condition_parse_and_display() {
        assert_eq!(LoanCondition::parse("Good Loan"), Some(LoanCondition::Good));
        assert_eq!(LoanCondition::parse("BAD"), Some(LoanCondition::Bad));
        assert_eq!(LoanCondition::parse("unknown"), None);
        assert_eq!(LoanCondition::Bad.to_string(), "Bad Loan");
        assert_eq!(LoanCondition::Good.other(), LoanCondition::Bad);
    }

    #[test]
    fn grade_parse_is_case_insensitive() {
        assert_eq!(Grade::parse("c"), Some(Grade::C));
        assert_eq!(Grade::parse("H"), None);
        assert!(Grade::A < Grade::G);
    }

    #[test]
    fn condition_serializes_as_dataset_label() {
        let json = serde_json::to_string(&LoanCondition::Good).unwrap();
        assert_eq!(json, "\"Good Loan\"");
    }
}
