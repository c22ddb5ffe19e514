//! Equal-width loan amount histogram, stacked by loan term.

use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::LoanRecord;

/// Per-term bin counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermCounts {
    pub term: String,
    pub counts: Vec<usize>,
}

/// Histogram over a condition subset.
///
/// `edges` has `bins + 1` entries; bin `i` covers `[edges[i], edges[i + 1])`,
/// except the last bin which also includes its upper edge. An empty subset
/// produces no edges and no groups.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HistogramBins {
    pub edges: Vec<f64>,
    pub by_term: Vec<TermCounts>,
}

impl HistogramBins {
    pub fn is_empty(&self) -> bool {
        self.by_term.is_empty()
    }

    pub fn bin_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }
}

pub(crate) fn histogram_by_term(records: &[&LoanRecord], bins: usize) -> HistogramBins {
    if records.is_empty() || bins == 0 {
        return HistogramBins::default();
    }

    let (mut lo, mut hi) = records
        .iter()
        .map(|r| r.loan_amount)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi <= lo {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

    // Terms keep first-appearance order so colors stay stable across reruns.
    let mut groups: IndexMap<&str, Vec<usize>> = IndexMap::new();
    for r in records {
        let idx = (((r.loan_amount - lo) / width).floor() as usize).min(bins - 1);
        groups.entry(r.term.as_str()).or_insert_with(|| vec![0; bins])[idx] += 1;
    }

    HistogramBins {
        edges,
        by_term: groups
            .into_iter()
            .map(|(term, counts)| TermCounts {
                term: term.to_string(),
                counts,
            })
            .collect(),
    }
}
