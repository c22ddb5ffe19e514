//! Command-line parsing for the loan dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the aggregation and presentation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_DATA_PATH, DataSource, LoanCondition};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "loandash",
    version,
    about = "Loan performance dashboard: summary metrics, trends and distributions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (default).
    Tui(TuiArgs),
    /// Print the metrics and every chart's data as plain-text tables.
    Report(ViewArgs),
    /// Print the dashboard's chart specifications as JSON.
    Spec(SpecArgs),
    /// Write a synthetic loan dataset in the loader's CSV layout.
    Sample(SampleArgs),
}

/// Where to read loans from.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Dataset file (.csv or .json).
    #[arg(short = 'd', long, env = "LOANDASH_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Use an in-memory synthetic table with this many rows; overrides `--data`.
    #[arg(long, value_name = "ROWS")]
    pub synthetic: Option<usize>,

    /// Seed for `--synthetic`.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl DataArgs {
    pub fn source(&self) -> DataSource {
        match self.synthetic {
            Some(rows) => DataSource::Synthetic {
                rows,
                seed: self.seed,
            },
            None => DataSource::File(self.data.clone()),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Log file (the terminal is owned by the UI while it runs).
    #[arg(long, env = "LOANDASH_LOG_FILE", default_value = "loandash.log")]
    pub log_file: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Loan condition for the histogram and box plot section.
    #[arg(short = 'c', long, value_enum, default_value_t = LoanCondition::Good)]
    pub condition: LoanCondition,
}

#[derive(Debug, Args, Clone)]
pub struct SpecArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Write the JSON to this file instead of stdout.
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Number of loans to generate.
    #[arg(short = 'n', long, default_value_t = 5000)]
    pub rows: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output CSV path.
    #[arg(short = 'o', long, default_value = DEFAULT_DATA_PATH)]
    pub out: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_flags_parse() {
        let cli = Cli::parse_from(["loandash", "report", "--data", "x.csv", "-c", "bad"]);
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.condition, LoanCondition::Bad);
        assert_eq!(args.data.source(), DataSource::File(PathBuf::from("x.csv")));
    }

    #[test]
    fn synthetic_source() {
        let cli = Cli::parse_from(["loandash", "tui", "--synthetic", "300", "--seed", "9"]);
        let Command::Tui(args) = cli.command else {
            panic!("expected tui");
        };
        assert_eq!(
            args.data.source(),
            DataSource::Synthetic { rows: 300, seed: 9 }
        );
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
