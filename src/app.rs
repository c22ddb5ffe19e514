//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - loads the loan table once
//! - hands it to the chosen front-end (TUI, text report, JSON spec)

use clap::Parser;
use tracing::info;

use crate::cli::{Command, SampleArgs, SpecArgs, TuiArgs, ViewArgs};
use crate::error::AppError;
use crate::state::DashboardState;

pub mod pipeline;

/// Entry point for the `loandash` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `loandash` and `loandash --data x.csv` behave like `loandash tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Report(args) => handle_report(args),
        Command::Spec(args) => handle_spec(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    crate::logging::init_file(&args.log_file)?;
    // Load before entering the alternate screen so the picker and load errors
    // print to a normal terminal.
    let session = pipeline::open_session(&args.data, true)?;
    crate::tui::run(session)
}

fn handle_report(args: ViewArgs) -> Result<(), AppError> {
    crate::logging::init_stderr();
    let session = pipeline::open_session(&args.data, false)?;
    let dashboard = crate::dashboard::render(
        &DashboardState::with_condition(args.condition),
        &session.table,
    );

    let summary = &session.summary;
    let source = if summary.rows_skipped > 0 {
        format!(
            "{} ({} rows used, {} skipped)",
            summary.source, summary.rows_used, summary.rows_skipped
        )
    } else {
        format!("{} ({} rows)", summary.source, summary.rows_used)
    };
    println!("{}", crate::report::format_dashboard(&dashboard, &source));
    Ok(())
}

fn handle_spec(args: SpecArgs) -> Result<(), AppError> {
    crate::logging::init_stderr();
    let session = pipeline::open_session(&args.view.data, false)?;
    let dashboard = crate::dashboard::render(
        &DashboardState::with_condition(args.view.condition),
        &session.table,
    );

    match &args.out {
        Some(path) => {
            crate::io::export::write_dashboard_json_file(path, &dashboard)?;
            info!(path = %path.display(), "wrote chart specifications");
        }
        None => crate::io::export::write_dashboard_json(std::io::stdout().lock(), &dashboard)?,
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    crate::logging::init_stderr();
    let records = crate::data::generate_loans(args.rows, args.seed)?;
    crate::data::write_loans_csv(&args.out, &records)?;
    println!("Wrote {} loans to {}", records.len(), args.out.display());
    Ok(())
}

/// Rewrite argv so `loandash` defaults to `loandash tui`.
///
/// Rules:
/// - `loandash`                      -> `loandash tui`
/// - `loandash --data x.csv ...`     -> `loandash tui --data x.csv ...`
/// - `loandash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "report" | "spec" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
