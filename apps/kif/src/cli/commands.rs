//! # CLI Command Implementations
//!
//! Each command has a `run_*` half returning a serializable report and a
//! `cmd_*` half printing it.

use crate::config::KifConfig;
use kif_core::{Filter, KifError, Statement};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

// =============================================================================
// INPUT FILES
// =============================================================================

/// Maximum size of any input file (16 MB).
pub const MAX_INPUT_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), KifError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| KifError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(KifError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve `path` and make sure it names a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, KifError> {
    let canonical = path.canonicalize().map_err(|e| {
        KifError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(KifError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Read a validated input file into a string.
pub fn read_input_file(path: &Path) -> Result<String, KifError> {
    let path = validate_file_path(path)?;
    validate_file_size(&path, MAX_INPUT_FILE_SIZE)?;
    std::fs::read_to_string(&path)
        .map_err(|e| KifError::IoError(format!("Cannot read '{}': {}", path.display(), e)))
}

/// Read and deserialize a JSON input file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, KifError> {
    let text = read_input_file(path)?;
    serde_json::from_str(&text).map_err(|e| {
        KifError::SerializationError(format!("Invalid JSON in '{}': {}", path.display(), e))
    })
}

fn print_json(report: &impl Serialize) -> Result<(), KifError> {
    let output = serde_json::to_string_pretty(report)
        .map_err(|e| KifError::SerializationError(e.to_string()))?;
    println!("{}", output);
    Ok(())
}

// =============================================================================
// NORMALIZE COMMAND
// =============================================================================

/// Result of `kif normalize`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizeReport {
    pub filter: Filter,
    pub is_empty: bool,
    pub is_full: bool,
}

/// Normalize the filter in `file`, after conjoining the configured base filter.
pub fn run_normalize(config: &KifConfig, file: &Path) -> Result<NormalizeReport, KifError> {
    tracing::info!("Normalizing filter from {:?}", file);
    let filter: Filter = read_json(file)?;
    let filter = config.apply_base(&filter).normalize();
    Ok(NormalizeReport {
        is_empty: filter.is_empty(),
        is_full: filter.is_full(),
        filter,
    })
}

/// Normalize a filter and print it.
pub fn cmd_normalize(config: &KifConfig, json_mode: bool, file: &Path) -> Result<(), KifError> {
    let report = run_normalize(config, file)?;

    if json_mode {
        return print_json(&report);
    }

    println!("Normalized Filter");
    println!("=================");
    println!("Empty: {}", report.is_empty);
    println!("Full:  {}", report.is_full);
    println!();
    print_json(&report.filter)
}

// =============================================================================
// COMBINE COMMAND
// =============================================================================

/// Result of `kif combine`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombineReport {
    pub inputs: usize,
    pub filter: Filter,
    pub is_empty: bool,
}

/// Conjoin the filters in `files` with the configured base filter.
pub fn run_combine(config: &KifConfig, files: &[PathBuf]) -> Result<CombineReport, KifError> {
    tracing::info!("Combining {} filters", files.len());
    let filters = files
        .iter()
        .map(|file| read_json::<Filter>(file))
        .collect::<Result<Vec<_>, _>>()?;

    let base = config.base_filter.clone().unwrap_or_default();
    let filter = base.combine(&filters);
    if filter.is_empty() {
        tracing::debug!("combined filter matches nothing");
    }
    Ok(CombineReport {
        inputs: filters.len(),
        is_empty: filter.is_empty(),
        filter,
    })
}

/// Combine filters and print the result.
pub fn cmd_combine(config: &KifConfig, json_mode: bool, files: &[PathBuf]) -> Result<(), KifError> {
    let report = run_combine(config, files)?;

    if json_mode {
        return print_json(&report);
    }

    println!("Combined Filter");
    println!("===============");
    println!("Inputs: {}", report.inputs);
    println!("Empty:  {}", report.is_empty);
    println!();
    print_json(&report.filter)
}

// =============================================================================
// MATCH COMMAND
// =============================================================================

/// Result of `kif match`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub total: usize,
    pub count: usize,
    pub statements: Vec<Statement>,
}

/// Select the statements in `statements_file` matched by the filter in `filter_file`.
pub fn run_match(
    config: &KifConfig,
    filter_file: &Path,
    statements_file: &Path,
) -> Result<MatchReport, KifError> {
    let filter = config.apply_base(&read_json::<Filter>(filter_file)?);
    let statements: Vec<Statement> = read_json(statements_file)?;
    tracing::info!(
        "Matching {} statements from {:?}",
        statements.len(),
        statements_file
    );

    let selected: Vec<Statement> = filter.select(&statements).cloned().collect();
    tracing::debug!(matched = selected.len(), "match complete");
    Ok(MatchReport {
        total: statements.len(),
        count: selected.len(),
        statements: selected,
    })
}

/// Match statements and print the selection.
pub fn cmd_match(
    config: &KifConfig,
    json_mode: bool,
    filter_file: &Path,
    statements_file: &Path,
) -> Result<(), KifError> {
    let report = run_match(config, filter_file, statements_file)?;

    if json_mode {
        return print_json(&report);
    }

    println!("Matched {} of {} statements", report.count, report.total);
    for statement in &report.statements {
        let line = serde_json::to_string(statement)
            .map_err(|e| KifError::SerializationError(e.to_string()))?;
        println!("  {}", line);
    }
    Ok(())
}
