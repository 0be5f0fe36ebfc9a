use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::config::ConvertConfig;
use crate::data::extract::{ExtractError, extract};
use crate::data::loader::load_file;

/// Extension of the files picked up by the batch driver.
pub const MATRIX_EXTENSION: &str = "mat";

/// Failure converting a single file. None of these stop a batch.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unreadable matrix file: {0:#}")]
    UnreadableSource(anyhow::Error),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("writing output: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Single file
// ---------------------------------------------------------------------------

/// Output path for `input`: `<output_dir>/<stem>.json`.
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output_dir.join(format!("{stem}.json"))
}

/// Convert one matrix file to JSON. Nothing is written unless extraction
/// succeeds. Returns the path of the JSON file.
pub fn convert_file(input: &Path, config: &ConvertConfig) -> Result<PathBuf, ConvertError> {
    let set = load_file(input).map_err(ConvertError::UnreadableSource)?;
    let result = extract(&set)?;
    let json = serde_json::to_string_pretty(&result)?;

    std::fs::create_dir_all(&config.output_dir)?;
    let out = output_path(input, &config.output_dir);
    std::fs::write(&out, json)?;

    log::debug!(
        "{} slices of H ({:?} each) written to {}",
        result.h.len(),
        result.slice_dims(),
        out.display()
    );
    Ok(out)
}

/// [`convert_file`] with operator reporting; returns whether it succeeded.
pub fn convert_and_report(input: &Path, config: &ConvertConfig) -> bool {
    match convert_file(input, config) {
        Ok(out) => {
            println!("Converted {} -> {}", input.display(), out.display());
            true
        }
        Err(ConvertError::Extract(e @ ExtractError::InsufficientData { .. })) => {
            eprintln!("Skipped {}: {e}", input.display());
            log::warn!("{}: does not look like a g/H file", input.display());
            false
        }
        Err(e) => {
            eprintln!("Error converting {}: {e}", input.display());
            log::debug!("conversion of {} failed: {e:?}", input.display());
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Outcome of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub total: usize,
}

impl BatchSummary {
    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.succeeded, self.total)
    }
}

/// Files directly inside `dir` with a `.mat` extension (any case), sorted.
pub fn find_matrix_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_mat = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(MATRIX_EXTENSION));
        if is_mat && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Convert every matrix file of `config.input_dir`, one after another.
pub fn convert_all(config: &ConvertConfig) -> Result<BatchSummary> {
    let files = match find_matrix_files(&config.input_dir) {
        Ok(files) => files,
        Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("listing {}", config.input_dir.display()));
        }
    };

    if files.is_empty() {
        log::warn!("No .{MATRIX_EXTENSION} files found in {}", config.input_dir.display());
        return Ok(BatchSummary::default());
    }

    log::info!("Found {} .{MATRIX_EXTENSION} files", files.len());
    let mut summary = BatchSummary {
        succeeded: 0,
        total: files.len(),
    };
    for file in &files {
        if convert_and_report(file, config) {
            summary.succeeded += 1;
        }
    }
    if summary.failed() > 0 {
        log::warn!("{} of {} files could not be converted", summary.failed(), summary.total);
    }
    Ok(summary)
}
