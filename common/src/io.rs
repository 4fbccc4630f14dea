//! Text input for flow contexts.
//!
//! An input path is either a single file or a directory. Directories are
//! read one level deep; hidden files and marker files (names starting with
//! `.` or `_`, such as `_SUCCESS`) are skipped and the remaining regular
//! files are read in lexicographic order.

use crate::error::{CommonError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve an input path to the list of files it denotes.
pub fn list_input_files<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).map_err(|e| {
        CommonError::io_error_with_source(format!("cannot access {}", path.display()), e)
    })?;

    if metadata.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = fs::read_dir(path).map_err(|e| {
        CommonError::io_error_with_source(format!("cannot list {}", path.display()), e)
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || name.starts_with('_') {
            continue;
        }
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Read a single file and split it into lines without their terminators.
pub fn read_lines_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        CommonError::io_error_with_source(format!("cannot read {}", path.display()), e)
    })?;
    Ok(content.lines().map(str::to_owned).collect())
}

/// Read every line of a file or of the files in a directory.
pub fn read_text_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let files = list_input_files(&path)?;
    let mut lines = Vec::new();
    for file in &files {
        let file_lines = read_lines_from_file(file)?;
        debug!(file = %file.display(), lines = file_lines.len(), "read input file");
        lines.extend(file_lines);
    }
    Ok(lines)
}
