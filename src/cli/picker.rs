//! Interactive dataset picker.
//!
//! Used when the configured dataset path does not exist and stdin is a
//! terminal: lists `*.csv` / `*.json` files under the working directory and
//! lets the user choose one by number or type a path.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Default directory recursion depth for finding dataset files.
const DEFAULT_SEARCH_DEPTH: usize = 4;

const DATASET_EXTENSIONS: [&str; 2] = ["csv", "json"];

/// Prompt on stdin/stdout for a dataset file.
///
/// Behavior:
/// - list discovered dataset files
/// - accept either a number (from the list) or an explicit path
/// - `q` cancels
pub fn prompt_for_dataset_path() -> Result<PathBuf, AppError> {
    let files = discover_dataset_files(Path::new("."));
    if files.is_empty() {
        return Err(AppError::load(
            "No .csv or .json files found. Pass one with `--data <file>` or use `--synthetic <rows>`.",
        ));
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    pick_from(&files, stdin.lock(), stdout.lock())
}

/// Selection loop over an explicit candidate list, generic over the streams so
/// it can be driven from tests.
pub fn pick_from<R: BufRead, W: Write>(
    files: &[PathBuf],
    mut input: R,
    mut output: W,
) -> Result<PathBuf, AppError> {
    writeln!(output, "Found {} dataset file(s):", files.len())?;
    for (idx, path) in files.iter().enumerate() {
        writeln!(output, "{:>3}) {}", idx + 1, pretty_path(path))?;
    }

    loop {
        write!(
            output,
            "Select a file by number (1-{}) or type a path (q to quit): ",
            files.len()
        )?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(AppError::load(
                "No input received. Provide a dataset path with `--data <file>`.",
            ));
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Err(AppError::load("Canceled."));
        }

        if let Ok(choice) = line.parse::<usize>() {
            if (1..=files.len()).contains(&choice) {
                return validate_dataset_path(&files[choice - 1]);
            }
            writeln!(
                output,
                "Invalid choice: {choice}. Enter a number between 1 and {}.",
                files.len()
            )?;
            continue;
        }

        match validate_dataset_path(Path::new(line)) {
            Ok(path) => return Ok(path),
            Err(err) => writeln!(output, "{err}")?,
        }
    }
}

/// Validate the provided path points to an existing `.csv` or `.json` file.
pub fn validate_dataset_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::load(format!(
            "Dataset file not found: {}",
            path.display()
        )));
    }
    if path.is_dir() {
        return Err(AppError::load(format!(
            "Expected a file, got a directory: {}",
            path.display()
        )));
    }
    if !has_dataset_extension(path) {
        return Err(AppError::load(format!(
            "Expected a .csv or .json file (got: {}).",
            path.display()
        )));
    }

    Ok(path.to_path_buf())
}

/// Discover dataset files under `root` (deterministic order).
pub fn discover_dataset_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    find_files_inner(root, 0, DEFAULT_SEARCH_DEPTH, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn find_files_inner(root: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }

    let Ok(entries) = fs::read_dir(root) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if should_skip_dir(&path) {
                continue;
            }
            find_files_inner(&path, depth + 1, max_depth, out);
        } else if file_type.is_file() && has_dataset_extension(&path) {
            out.push(path);
        }
    }
}

fn has_dataset_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DATASET_EXTENSIONS.iter().any(|d| ext.eq_ignore_ascii_case(d)))
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules")
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "x").unwrap();
        path
    }

    #[test]
    fn discovers_csv_and_json_but_skips_target() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.json");
        touch(dir.path(), "data_input/a.csv");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "target/skip.csv");

        let found: Vec<_> = discover_dataset_files(dir.path())
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(found.len(), 2);
        assert!(found.contains(&"a.csv".to_string()));
        assert!(found.contains(&"b.json".to_string()));
    }

    #[test]
    fn pick_by_number_after_invalid_choice() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.csv");
        let b = touch(dir.path(), "b.csv");
        let files = vec![a, b.clone()];

        let mut out = Vec::new();
        let picked = pick_from(&files, "9\n2\n".as_bytes(), &mut out).unwrap();
        assert_eq!(picked, b);
        assert!(String::from_utf8(out).unwrap().contains("Invalid choice: 9"));
    }

    #[test]
    fn quit_and_eof_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![touch(dir.path(), "a.csv")];
        assert!(pick_from(&files, "q\n".as_bytes(), Vec::new()).is_err());
        assert!(pick_from(&files, "".as_bytes(), Vec::new()).is_err());
    }

    #[test]
    fn validation_rejects_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let txt = touch(dir.path(), "a.txt");
        assert!(validate_dataset_path(&txt).is_err());
        assert!(validate_dataset_path(dir.path()).is_err());
    }
}
