//! Shared "load" logic used by every front-end.
//!
//! Source resolution -> load -> normalize happens once per process; the
//! resulting `Session` is then handed read-only to each rerun of
//! `dashboard::render`.

use std::io::IsTerminal;

use tracing::warn;

use crate::analysis::LoanTable;
use crate::cli::DataArgs;
use crate::cli::picker::prompt_for_dataset_path;
use crate::data::{LoadSummary, open_table};
use crate::domain::DataSource;
use crate::error::AppError;

/// The loaded table plus how it was obtained.
#[derive(Debug, Clone)]
pub struct Session {
    pub table: LoanTable,
    pub summary: LoadSummary,
}

/// Resolve the data source and load it.
///
/// When the configured file is missing and `interactive` is set (and stdin is
/// a terminal), the user is asked to pick a dataset instead of failing.
pub fn open_session(args: &DataArgs, interactive: bool) -> Result<Session, AppError> {
    let mut source = args.source();

    if let DataSource::File(path) = &source {
        if !path.exists() && interactive && std::io::stdin().is_terminal() {
            warn!(path = %path.display(), "dataset not found, prompting for another file");
            source = DataSource::File(prompt_for_dataset_path()?);
        }
    }

    let (table, summary) = open_table(&source)?;
    Ok(Session { table, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_file_fails_when_not_interactive() {
        let args = DataArgs {
            data: PathBuf::from("/no/such/loans.csv"),
            synthetic: None,
            seed: 1,
        };
        assert!(matches!(open_session(&args, false), Err(AppError::Load(_))));
    }

    #[test]
    fn synthetic_ignores_data_path() {
        let args = DataArgs {
            data: PathBuf::from("/no/such/loans.csv"),
            synthetic: Some(25),
            seed: 1,
        };
        let session = open_session(&args, false).unwrap();
        assert_eq!(session.table.total_count(), 25);
    }
}
