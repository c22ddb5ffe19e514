//! Box-plot statistics of loan amount per purpose, split by term.
//!
//! Quartiles use linear interpolation between order statistics (the same rule
//! as `numpy.percentile` with its default method). Whiskers extend to the most
//! extreme observation within `1.5 * IQR` of the box; anything beyond is an
//! outlier.

use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::LoanRecord;

const WHISKER_IQR: f64 = 1.5;

/// Statistics for one (purpose, term) box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurposeBox {
    pub purpose: String,
    pub term: String,
    pub n: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Quantile `p` in `[0, 1]` of an ascending slice, linear interpolation.
///
/// Returns `None` for an empty slice.
pub fn quantile_linear(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub(crate) fn box_stats_by_purpose(records: &[&LoanRecord]) -> Vec<PurposeBox> {
    let mut groups: IndexMap<(&str, &str), Vec<f64>> = IndexMap::new();
    for r in records {
        let Some(purpose) = r.purpose.as_deref() else {
            continue;
        };
        groups
            .entry((purpose, r.term.as_str()))
            .or_default()
            .push(r.loan_amount);
    }

    groups
        .into_iter()
        .filter_map(|((purpose, term), mut values)| {
            values.sort_by(f64::total_cmp);
            summarize(purpose, term, &values)
        })
        .collect()
}

fn summarize(purpose: &str, term: &str, sorted: &[f64]) -> Option<PurposeBox> {
    let q1 = quantile_linear(sorted, 0.25)?;
    let median = quantile_linear(sorted, 0.5)?;
    let q3 = quantile_linear(sorted, 0.75)?;
    let min = *sorted.first()?;
    let max = *sorted.last()?;

    let iqr = q3 - q1;
    let lower_fence = q1 - WHISKER_IQR * iqr;
    let upper_fence = q3 + WHISKER_IQR * iqr;

    let lower_whisker = sorted
        .iter()
        .copied()
        .find(|v| *v >= lower_fence)
        .unwrap_or(q1);
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|v| *v <= upper_fence)
        .unwrap_or(q3);

    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < lower_fence || *v > upper_fence)
        .collect();

    Some(PurposeBox {
        purpose: purpose.to_string(),
        term: term.to_string(),
        n: sorted.len(),
        min,
        q1,
        median,
        q3,
        max,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::record;
    use crate::domain::LoanCondition;

    fn rows(spec: &[(f64, Option<&str>, &str)]) -> Vec<LoanRecord> {
        spec.iter()
            .enumerate()
            .map(|(i, (amount, purpose, term))| {
                let mut r = record(&i.to_string(), *amount, LoanCondition::Good);
                r.purpose = purpose.map(str::to_string);
                r.term = term.to_string();
                r
            })
            .collect()
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_linear(&v, 0.0), Some(1.0));
        assert_eq!(quantile_linear(&v, 0.25), Some(1.75));
        assert_eq!(quantile_linear(&v, 0.5), Some(2.5));
        assert_eq!(quantile_linear(&v, 1.0), Some(4.0));
        assert_eq!(quantile_linear(&[], 0.5), None);
    }

    #[test]
    fn five_number_summary_and_outliers() {
        let amounts = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0];
        let spec: Vec<_> = amounts.iter().map(|a| (*a, Some("car"), "36 months")).collect();
        let data = rows(&spec);
        let refs: Vec<&LoanRecord> = data.iter().collect();
        let boxes = box_stats_by_purpose(&refs);

        assert_eq!(boxes.len(), 1);
        let b = &boxes[0];
        assert_eq!(b.n, 9);
        assert_eq!(b.min, 1.0);
        assert_eq!(b.q1, 3.0);
        assert_eq!(b.median, 5.0);
        assert_eq!(b.q3, 7.0);
        assert_eq!(b.max, 100.0);
        // Fences: 3 - 6 = -3 and 7 + 6 = 13.
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.upper_whisker, 8.0);
        assert_eq!(b.outliers, vec![100.0]);
    }

    #[test]
    fn groups_by_purpose_and_term_in_appearance_order() {
        let data = rows(&[
            (10.0, Some("house"), "60 months"),
            (20.0, Some("car"), "36 months"),
            (30.0, Some("house"), "36 months"),
            (40.0, Some("house"), "60 months"),
            (50.0, None, "36 months"),
        ]);
        let refs: Vec<&LoanRecord> = data.iter().collect();
        let boxes = box_stats_by_purpose(&refs);
        let keys: Vec<_> = boxes
            .iter()
            .map(|b| (b.purpose.as_str(), b.term.as_str(), b.n))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("house", "60 months", 2),
                ("car", "36 months", 1),
                ("house", "36 months", 1),
            ]
        );
    }

    #[test]
    fn single_observation_box_collapses() {
        let data = rows(&[(42.0, Some("wedding"), "36 months")]);
        let refs: Vec<&LoanRecord> = data.iter().collect();
        let b = &box_stats_by_purpose(&refs)[0];
        assert_eq!((b.min, b.q1, b.median, b.q3, b.max), (42.0, 42.0, 42.0, 42.0, 42.0));
        assert!(b.outliers.is_empty());
    }

    #[test]
    fn empty_subset_gives_no_boxes() {
        assert!(box_stats_by_purpose(&[]).is_empty());
    }
}
