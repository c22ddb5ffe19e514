//! Aggregations over the loan table.
//!
//! `LoanTable` is the immutable handle produced once per process start. Every
//! dashboard rerun reads from it; nothing here mutates rows.
//!
//! - full-table scalars and grouped series live on `LoanTable`
//! - condition-scoped statistics (histogram, box plots) live on `LoanSubset`

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Grade, LoanCondition, LoanRecord, Weekday};

pub mod boxplot;
pub mod histogram;

pub use boxplot::{PurposeBox, quantile_linear};
pub use histogram::{HistogramBins, TermCounts};

/// An ordered mapping from a grouping key to a scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series<K> {
    pub points: Vec<(K, f64)>,
}

impl<K: PartialEq> Series<K> {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.points.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|(_, v)| v).sum()
    }
}

impl<K: Ord> Series<K> {
    fn from_map(map: BTreeMap<K, f64>) -> Self {
        Self {
            points: map.into_iter().collect(),
        }
    }
}

/// The loaded, normalized loan table.
#[derive(Debug, Clone, Default)]
pub struct LoanTable {
    records: Vec<LoanRecord>,
}

impl LoanTable {
    pub fn new(records: Vec<LoanRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[LoanRecord] {
        &self.records
    }

    pub fn total_count(&self) -> usize {
        self.records.len()
    }

    pub fn total_amount(&self) -> f64 {
        self.records.iter().map(|r| r.loan_amount).sum()
    }

    /// Mean interest rate (percent). `None` for an empty table.
    pub fn average_rate(&self) -> Option<f64> {
        mean(self.records.iter().map(|r| r.interest_rate))
    }

    pub fn average_amount(&self) -> Option<f64> {
        mean(self.records.iter().map(|r| r.loan_amount))
    }

    /// Number of loans per issue date, ascending by date.
    pub fn count_by_date(&self) -> Series<NaiveDate> {
        let mut map = BTreeMap::new();
        for r in &self.records {
            *map.entry(r.issue_date).or_insert(0.0) += 1.0;
        }
        Series::from_map(map)
    }

    /// Total loan amount per issue date, ascending by date.
    pub fn sum_by_date(&self) -> Series<NaiveDate> {
        let mut map = BTreeMap::new();
        for r in &self.records {
            *map.entry(r.issue_date).or_insert(0.0) += r.loan_amount;
        }
        Series::from_map(map)
    }

    /// Number of loans per issue weekday, in calendar order.
    ///
    /// Every weekday present in the data gets an entry (Sunday included);
    /// the chart applies `Weekday::DISPLAY_ORDER` on top.
    pub fn count_by_weekday(&self) -> Series<Weekday> {
        let mut map = BTreeMap::new();
        for r in &self.records {
            *map.entry(r.issue_weekday).or_insert(0.0) += 1.0;
        }
        Series::from_map(map)
    }

    /// Row counts per loan condition. Both conditions are always present.
    pub fn distribution_by_condition(&self) -> Series<LoanCondition> {
        let mut map: BTreeMap<LoanCondition, f64> =
            LoanCondition::ALL.into_iter().map(|c| (c, 0.0)).collect();
        for r in &self.records {
            *map.entry(r.loan_condition).or_insert(0.0) += 1.0;
        }
        Series::from_map(map)
    }

    /// Row counts per grade, A to G. Grades without rows are omitted.
    pub fn count_by_grade(&self) -> Series<Grade> {
        let mut map = BTreeMap::new();
        for r in &self.records {
            *map.entry(r.grade).or_insert(0.0) += 1.0;
        }
        Series::from_map(map)
    }

    /// View of the rows matching `condition`.
    pub fn subset(&self, condition: LoanCondition) -> LoanSubset<'_> {
        LoanSubset {
            records: self
                .records
                .iter()
                .filter(|r| r.loan_condition == condition)
                .collect(),
        }
    }
}

/// Rows of a `LoanTable` filtered to one loan condition.
#[derive(Debug, Clone)]
pub struct LoanSubset<'a> {
    records: Vec<&'a LoanRecord>,
}

impl<'a> LoanSubset<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[&'a LoanRecord] {
        &self.records
    }

    /// Equal-width histogram of `loan_amount`, split by term.
    pub fn histogram_amount(&self, bins: usize) -> HistogramBins {
        histogram::histogram_by_term(&self.records, bins)
    }

    /// Box-plot statistics of `loan_amount` per (purpose, term).
    pub fn box_stats_by_purpose(&self) -> Vec<PurposeBox> {
        boxplot::box_stats_by_purpose(&self.records)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
