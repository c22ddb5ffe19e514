//! Text cleanup applied to the loaded table before any aggregation.

use crate::domain::LoanRecord;

/// Replace underscores with spaces (`debt_consolidation` -> `debt consolidation`).
pub fn normalize_purpose(purpose: &str) -> String {
    purpose.replace('_', " ")
}

/// Normalize the `purpose` column of every record. Other fields are untouched.
pub fn normalize_records(records: Vec<LoanRecord>) -> Vec<LoanRecord> {
    records
        .into_iter()
        .map(|mut r| {
            r.purpose = r.purpose.as_deref().map(normalize_purpose);
            r
        })
        .collect()
}
