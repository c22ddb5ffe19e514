//! Dataset ingest and validation.
//!
//! This module turns a cleaned loan export (CSV or JSON) into typed
//! `LoanRecord`s that are safe to aggregate.
//!
//! Design goals:
//! - **Strict schema** for required columns (missing column = schema error)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (rows keep file order)
//! - **Separation of concerns**: no aggregation logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::{info, warn};

use crate::domain::{Grade, LoanCondition, LoanRecord, Weekday};
use crate::error::AppError;

/// Columns every dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "id",
    "loan_amount",
    "interest_rate",
    "issue_date",
    "issue_weekday",
    "term",
    "purpose",
    "loan_condition",
    "grade",
];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

/// Ingest output: parsed records + row errors + counters.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub records: Vec<LoanRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// On-disk encodings the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Json,
}

impl DatasetFormat {
    /// Pick the format from the file extension; anything but `.json` is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DatasetFormat::Json,
            _ => DatasetFormat::Csv,
        }
    }
}

/// Uniform access to one row's fields, independent of the file encoding.
trait FieldSource {
    fn field(&self, name: &str) -> Option<&str>;
}

struct CsvRow<'a> {
    record: &'a StringRecord,
    header_map: &'a HashMap<String, usize>,
}

impl FieldSource for CsvRow<'_> {
    fn field(&self, name: &str) -> Option<&str> {
        let idx = self.header_map.get(name)?;
        self.record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
    }
}

struct JsonRow {
    fields: HashMap<String, String>,
}

impl FieldSource for JsonRow {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.trim()).filter(|s| !s.is_empty())
    }
}

/// Load a loan dataset from `path`.
pub fn load_loans(path: &Path) -> Result<LoadedDataset, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::load(format!("Failed to open dataset '{}': {e}", path.display())))?;

    let loaded = match DatasetFormat::from_path(path) {
        DatasetFormat::Csv => load_csv(file, &path.display().to_string())?,
        DatasetFormat::Json => load_json(BufReader::new(file), &path.display().to_string())?,
    };

    info!(
        path = %path.display(),
        rows_read = loaded.rows_read,
        rows_used = loaded.rows_used,
        skipped = loaded.row_errors.len(),
        "loaded loan dataset"
    );
    for err in loaded.row_errors.iter().take(10) {
        warn!(line = err.line, id = ?err.id, "skipped row: {}", err.message);
    }

    Ok(loaded)
}

/// Load CSV from any reader. `source_name` is used in error messages.
pub fn load_csv<R: std::io::Read>(reader: R, source_name: &str) -> Result<LoadedDataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::load(format!("Failed to read CSV headers from '{source_name}': {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(header_map.keys().map(String::as_str), source_name)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header line and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let row = CsvRow {
            record: &record,
            header_map: &header_map,
        };
        push_parsed(&row, line, &mut records, &mut row_errors);
    }

    finish(records, row_errors, rows_read, source_name)
}

/// Load a JSON array of row objects from any reader.
pub fn load_json<R: std::io::Read>(reader: R, source_name: &str) -> Result<LoadedDataset, AppError> {
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_reader(reader)
        .map_err(|e| AppError::load(format!("Invalid JSON dataset '{source_name}': {e}")))?;

    // Schema is judged on the union of keys; a column is present if any row has it.
    let mut columns: Vec<String> = Vec::new();
    for row in &rows {
        for key in row.keys() {
            let key = normalize_header_name(key);
            if !columns.contains(&key) {
                columns.push(key);
            }
        }
    }
    if !rows.is_empty() {
        ensure_required_columns_exist(columns.iter().map(String::as_str), source_name)?;
    }

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let rows_read = rows.len();

    for (idx, object) in rows.into_iter().enumerate() {
        let fields = object
            .into_iter()
            .filter_map(|(k, v)| json_scalar(&v).map(|s| (normalize_header_name(&k), s)))
            .collect();
        let row = JsonRow { fields };
        // JSON rows are reported 1-based by array position.
        push_parsed(&row, idx + 1, &mut records, &mut row_errors);
    }

    finish(records, row_errors, rows_read, source_name)
}

fn push_parsed(
    row: &dyn FieldSource,
    line: usize,
    records: &mut Vec<LoanRecord>,
    row_errors: &mut Vec<RowError>,
) {
    match parse_row(row) {
        Ok(record) => records.push(record),
        Err(message) => row_errors.push(RowError {
            line,
            id: row.field("id").map(str::to_string),
            message,
        }),
    }
}

fn finish(
    records: Vec<LoanRecord>,
    row_errors: Vec<RowError>,
    rows_read: usize,
    source_name: &str,
) -> Result<LoadedDataset, AppError> {
    let rows_used = records.len();
    if rows_used == 0 {
        return Err(AppError::load(format!(
            "No valid rows in '{source_name}' ({rows_read} read, {} rejected).",
            row_errors.len()
        )));
    }

    Ok(LoadedDataset {
        records,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn json_scalar(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        // Nested values are not part of the schema.
        _ => None,
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist<'a>(
    columns: impl Iterator<Item = &'a str>,
    source_name: &str,
) -> Result<(), AppError> {
    let present: Vec<&str> = columns.collect();
    for required in REQUIRED_COLUMNS {
        if !present.contains(&required) {
            return Err(AppError::schema(required, source_name));
        }
    }
    Ok(())
}

fn parse_row(row: &dyn FieldSource) -> Result<LoanRecord, String> {
    let id = get_required(row, "id")?.to_string();

    let loan_amount = parse_f64(get_required(row, "loan_amount")?, "loan_amount")?;
    if loan_amount < 0.0 {
        return Err(format!("Negative `loan_amount` ({loan_amount})."));
    }
    let interest_rate = parse_f64(get_required(row, "interest_rate")?, "interest_rate")?;

    let issue_date = parse_date(get_required(row, "issue_date")?)?;

    let weekday_raw = get_required(row, "issue_weekday")?;
    let issue_weekday = Weekday::parse(weekday_raw)
        .ok_or_else(|| format!("Invalid `issue_weekday` '{weekday_raw}'."))?;

    let term = get_required(row, "term")?.to_string();

    // Purpose may be blank; the normalizer passes absent values through.
    let purpose = row.field("purpose").map(str::to_string);

    let condition_raw = get_required(row, "loan_condition")?;
    let loan_condition = LoanCondition::parse(condition_raw)
        .ok_or_else(|| format!("Invalid `loan_condition` '{condition_raw}' (expected Good Loan or Bad Loan)."))?;

    let grade_raw = get_required(row, "grade")?;
    let grade = Grade::parse(grade_raw).ok_or_else(|| format!("Invalid `grade` '{grade_raw}' (expected A-G)."))?;

    Ok(LoanRecord {
        id,
        loan_amount,
        interest_rate,
        issue_date,
        issue_weekday,
        term,
        purpose,
        loan_condition,
        grade,
    })
}

fn get_required<'a>(row: &'a dyn FieldSource, name: &str) -> Result<&'a str, String> {
    row.field(name)
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn parse_f64(s: &str, name: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid `{name}` '{s}' (expected a number)."))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite `{name}`."))
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // Cleaned exports carry either a full date or a month period (`2015-06`).
    // A small fixed set of formats keeps parsing deterministic.
    const FMTS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
    // Timestamps like `2015-06-01 00:00:00` keep only the date part.
    let date_part = s.split([' ', 'T']).next().unwrap_or(s);
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(date_part, fmt) {
            return Ok(d);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{date_part}-01"), "%Y-%m-%d") {
        return Ok(d);
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, YYYY-MM, DD/MM/YYYY, YYYY/MM/DD."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,loan_amount,interest_rate,issue_date,issue_weekday,term,purpose,loan_condition,grade\n";

    fn csv(body: &str) -> String {
        format!("{HEADER}{body}")
    }

    #[test]
    fn parses_well_formed_rows() {
        let data = csv(concat!(
            "1,1000,10.5,2015-01-01,Thursday,36 months,debt_consolidation,Good Loan,B\n",
            "2,2500.5,7.25,2015-02,Sunday,60 months,car,Bad Loan,a\n",
        ));
        let loaded = load_csv(data.as_bytes(), "test.csv").unwrap();
        assert_eq!(loaded.rows_read, 2);
        assert_eq!(loaded.rows_used, 2);
        assert!(loaded.row_errors.is_empty());

        let r = &loaded.records[1];
        assert_eq!(r.issue_date, NaiveDate::from_ymd_opt(2015, 2, 1).unwrap());
        assert_eq!(r.issue_weekday, Weekday::Sunday);
        assert_eq!(r.grade, Grade::A);
        assert_eq!(r.loan_condition, LoanCondition::Bad);
        // Ingest does not normalize; that is a separate step.
        assert_eq!(loaded.records[0].purpose.as_deref(), Some("debt_consolidation"));
    }

    #[test]
    fn missing_column_is_schema_error() {
        let data = "id,loan_amount,interest_rate,issue_date,issue_weekday,term,purpose,loan_condition\n1,1,1,2015-01-01,Monday,36,car,Good Loan\n";
        let err = load_csv(data.as_bytes(), "nograde.csv").unwrap_err();
        match err {
            AppError::Schema { column, .. } => assert_eq!(column, "grade"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn bad_rows_are_skipped_and_reported() {
        let data = csv(concat!(
            "1,1000,10.5,2015-01-01,Monday,36 months,car,Good Loan,B\n",
            "2,abc,10.5,2015-01-01,Monday,36 months,car,Good Loan,B\n",
            "3,1000,10.5,2015-01-01,Monday,36 months,car,Okay Loan,B\n",
        ));
        let loaded = load_csv(data.as_bytes(), "test.csv").unwrap();
        assert_eq!(loaded.rows_read, 3);
        assert_eq!(loaded.rows_used, 1);
        assert_eq!(loaded.row_errors.len(), 2);
        assert_eq!(loaded.row_errors[0].line, 3);
        assert_eq!(loaded.row_errors[0].id.as_deref(), Some("2"));
    }

    #[test]
    fn no_usable_rows_is_load_error() {
        let data = csv("1,-5,10.5,2015-01-01,Monday,36 months,car,Good Loan,B\n");
        let err = load_csv(data.as_bytes(), "test.csv").unwrap_err();
        assert!(matches!(err, AppError::Load(_)));
    }

    #[test]
    fn headers_tolerate_bom_and_case() {
        let data = "\u{feff}ID,Loan_Amount,INTEREST_RATE,issue_date,issue_weekday,term,purpose,loan_condition,grade\n1,1,1,2015-01-01,Mon,36 months,,Good Loan,C\n";
        let loaded = load_csv(data.as_bytes(), "test.csv").unwrap();
        assert_eq!(loaded.rows_used, 1);
        assert_eq!(loaded.records[0].purpose, None);
    }

    #[test]
    fn json_rows_with_numbers_and_nulls() {
        let data = r#"[
            {"id": 1, "loan_amount": 1200, "interest_rate": 9.5, "issue_date": "2016-03-01",
             "issue_weekday": "Tuesday", "term": "36 months", "purpose": null,
             "loan_condition": "Good Loan", "grade": "D"}
        ]"#;
        let loaded = load_json(data.as_bytes(), "test.json").unwrap();
        assert_eq!(loaded.rows_used, 1);
        let r = &loaded.records[0];
        assert_eq!(r.id, "1");
        assert_eq!(r.loan_amount, 1200.0);
        assert_eq!(r.purpose, None);
    }

    #[test]
    fn json_missing_column_is_schema_error() {
        let data = r#"[{"id": 1, "loan_amount": 1200}]"#;
        let err = load_json(data.as_bytes(), "test.json").unwrap_err();
        assert!(matches!(err, AppError::Schema { .. }));
    }

    #[test]
    fn date_formats() {
        let d = NaiveDate::from_ymd_opt(2014, 12, 1).unwrap();
        assert_eq!(parse_date("2014-12-01").unwrap(), d);
        assert_eq!(parse_date("2014-12").unwrap(), d);
        assert_eq!(parse_date("01/12/2014").unwrap(), d);
        assert_eq!(parse_date("2014-12-01 00:00:00").unwrap(), d);
        assert!(parse_date("Dec 2014").is_err());
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(DatasetFormat::from_path(Path::new("a/b.JSON")), DatasetFormat::Json);
        assert_eq!(DatasetFormat::from_path(Path::new("a/b.csv")), DatasetFormat::Csv);
        assert_eq!(DatasetFormat::from_path(Path::new("a/loan_clean")), DatasetFormat::Csv);
    }

    #[test]
    fn missing_file_is_load_error() {
        let err = load_loans(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, AppError::Load(_)));
    }
}
