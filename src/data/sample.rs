//! Synthetic loan table generation.
//!
//! Produces rows in the loader's schema so the dashboard can run without the
//! private dataset. Output is fully determined by `(rows, seed)`.

use std::fs::{File, create_dir_all};
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{LogNormal, Normal};
use tracing::info;

use crate::domain::{Grade, LoanCondition, LoanRecord, Weekday};
use crate::error::AppError;

/// Share of loans per grade, A through G.
const GRADE_WEIGHTS: [f64; 7] = [0.17, 0.30, 0.27, 0.15, 0.07, 0.03, 0.01];

/// Mean interest rate (percent) per grade, A through G.
const GRADE_RATE: [f64; 7] = [7.5, 11.0, 14.0, 17.0, 19.5, 22.0, 25.0];

/// Probability of a bad outcome per grade, A through G.
const GRADE_BAD_PROB: [f64; 7] = [0.03, 0.06, 0.09, 0.13, 0.18, 0.24, 0.30];

const PURPOSES: [(&str, f64); 8] = [
    ("debt_consolidation", 0.58),
    ("credit_card", 0.21),
    ("home_improvement", 0.06),
    ("other", 0.05),
    ("major_purchase", 0.03),
    ("small_business", 0.03),
    ("car", 0.02),
    ("medical", 0.02),
];

const TERMS: [(&str, f64); 2] = [("36 months", 0.7), ("60 months", 0.3)];

const AMOUNT_MIN: f64 = 500.0;
const AMOUNT_MAX: f64 = 35_000.0;

/// Generate `rows` synthetic loans.
///
/// Issue dates are spread over 2012-2015; Sundays are skipped, so the weekday
/// column only takes Monday through Saturday.
pub fn generate_loans(rows: usize, seed: u64) -> Result<Vec<LoanRecord>, AppError> {
    if rows == 0 {
        return Err(AppError::config("Synthetic row count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let grade_dist = WeightedIndex::new(GRADE_WEIGHTS)
        .map_err(|e| AppError::config(format!("Grade distribution error: {e}")))?;
    let purpose_dist = WeightedIndex::new(PURPOSES.iter().map(|(_, w)| *w))
        .map_err(|e| AppError::config(format!("Purpose distribution error: {e}")))?;
    let term_dist = WeightedIndex::new(TERMS.iter().map(|(_, w)| *w))
        .map_err(|e| AppError::config(format!("Term distribution error: {e}")))?;
    let amount_dist = LogNormal::new(12_000f64.ln(), 0.55)
        .map_err(|e| AppError::config(format!("Amount distribution error: {e}")))?;
    let rate_noise = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::config(format!("Rate distribution error: {e}")))?;

    let start = NaiveDate::from_ymd_opt(2012, 1, 1)
        .ok_or_else(|| AppError::config("Invalid synthetic start date."))?;
    let span_days = 4 * 365;

    let mut out = Vec::with_capacity(rows);
    for i in 0..rows {
        let g = grade_dist.sample(&mut rng);
        let grade = Grade::ALL[g];

        let mut issue_date = start + Duration::days(rng.gen_range(0..span_days));
        if issue_date.weekday() == chrono::Weekday::Sun {
            issue_date += Duration::days(1);
        }

        let raw_amount: f64 = amount_dist.sample(&mut rng);
        let loan_amount = (raw_amount.clamp(AMOUNT_MIN, AMOUNT_MAX) / 25.0).round() * 25.0;

        let interest_rate = ((GRADE_RATE[g] + rate_noise.sample(&mut rng)).max(5.0) * 100.0).round() / 100.0;

        let loan_condition = if rng.gen_bool(GRADE_BAD_PROB[g]) {
            LoanCondition::Bad
        } else {
            LoanCondition::Good
        };

        out.push(LoanRecord {
            id: (i + 1).to_string(),
            loan_amount,
            interest_rate,
            issue_date,
            issue_weekday: Weekday::from(issue_date.weekday()),
            term: TERMS[term_dist.sample(&mut rng)].0.to_string(),
            purpose: Some(PURPOSES[purpose_dist.sample(&mut rng)].0.to_string()),
            loan_condition,
            grade,
        });
    }

    Ok(out)
}

/// Write records as CSV in the loader's column layout.
pub fn write_loans_csv(path: &Path, records: &[LoanRecord]) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)?;
    }
    let file = File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create '{}': {e}", path.display())))?;

    let mut writer = csv::Writer::from_writer(file);
    for r in records {
        writer
            .serialize(r)
            .map_err(|e| AppError::config(format!("Failed to write CSV row {}: {e}", r.id)))?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = records.len(), "wrote synthetic dataset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_rows() {
        let a = generate_loans(50, 7).unwrap();
        let b = generate_loans(50, 7).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, generate_loans(50, 8).unwrap());
    }

    #[test]
    fn rows_respect_schema_bounds() {
        let rows = generate_loans(500, 42).unwrap();
        assert_eq!(rows.len(), 500);
        for r in &rows {
            assert!((AMOUNT_MIN..=AMOUNT_MAX).contains(&r.loan_amount));
            assert!(r.interest_rate >= 5.0);
            assert_ne!(r.issue_weekday, Weekday::Sunday);
            assert_eq!(Weekday::from(r.issue_date.weekday()), r.issue_weekday);
            let purpose = r.purpose.as_deref().unwrap();
            assert!(PURPOSES.iter().any(|(p, _)| *p == purpose));
        }
        assert!(rows.iter().any(|r| r.loan_condition == LoanCondition::Bad));
    }

    #[test]
    fn written_csv_loads_back_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data_input").join("loan_clean.csv");
        let generated = generate_loans(300, 11).unwrap();
        write_loans_csv(&path, &generated).unwrap();

        let loaded = crate::io::ingest::load_loans(&path).unwrap();
        assert_eq!(loaded.rows_read, 300);
        assert_eq!(loaded.rows_used, 300);
        assert!(loaded.row_errors.is_empty());
        assert_eq!(loaded.records, generated);
    }

    #[test]
    fn zero_rows_is_rejected() {
        assert!(matches!(generate_loans(0, 1), Err(AppError::Config(_))));
    }
}
