//! Application error type.
//!
//! Every variant maps to a process exit code so `main` can report failures the
//! same way regardless of which front-end (TUI, report, spec, sample) hit them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The dataset file is missing, unreadable, or contains no usable rows.
    #[error("load error: {0}")]
    Load(String),
    /// A column the dashboard depends on is absent from the dataset.
    #[error("schema error: missing required column `{column}` in '{source_name}'")]
    Schema { column: String, source_name: String },
    /// Invalid CLI or environment input.
    #[error("config error: {0}")]
    Config(String),
    /// Terminal setup, draw, or event failure.
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load(message.into())
    }

    pub fn schema(column: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self::Schema {
            column: column.into(),
            source_name: source_name.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal(message.into())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Load(_) | AppError::Config(_) => 2,
            AppError::Schema { .. } => 3,
            AppError::Terminal(_) | AppError::Io(_) => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        assert_eq!(AppError::load("x").exit_code(), 2);
        assert_eq!(AppError::schema("grade", "loans.csv").exit_code(), 3);
        assert_eq!(AppError::terminal("x").exit_code(), 4);
    }

    #[test]
    fn schema_error_names_the_column() {
        let err = AppError::schema("grade", "loans.csv");
        assert_eq!(
            err.to_string(),
            "schema error: missing required column `grade` in 'loans.csv'"
        );
    }
}
