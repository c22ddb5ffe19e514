//! Export rendered chart specifications as JSON.
//!
//! The JSON is the portable form of a dashboard rerun: metrics plus every
//! `ChartSpec`, so another renderer can draw the same charts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::dashboard::Dashboard;
use crate::error::AppError;

/// Write the dashboard as pretty JSON to any writer.
pub fn write_dashboard_json<W: Write>(mut writer: W, dashboard: &Dashboard) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut writer, dashboard)
        .map_err(|e| AppError::config(format!("Failed to serialize dashboard JSON: {e}")))?;
    writeln!(writer)?;
    Ok(())
}

/// Write the dashboard as pretty JSON to `path`.
pub fn write_dashboard_json_file(path: &Path, dashboard: &Dashboard) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create '{}': {e}", path.display())))?;
    write_dashboard_json(file, dashboard)
}
