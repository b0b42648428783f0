//! Path Utilities
//!
//! Directory creation, recursive tree copies, and wildcard artifact lookup.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::utils::error::{HarnessError, HarnessResult};

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> HarnessResult<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Copy every file under `src` into `dst`, preserving relative layout.
///
/// Hidden files and ignore-files are copied too. Returns the number of
/// files copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> HarnessResult<usize> {
    if !src.is_dir() {
        return Err(HarnessError::config(format!(
            "source directory {} does not exist",
            src.display()
        )));
    }
    ensure_dir(dst)?;

    let mut builder = WalkBuilder::new(src);
    builder.standard_filters(false).follow_links(false);

    let mut copied = 0;
    for entry in builder.build() {
        let entry =
            entry.map_err(|e| HarnessError::internal(format!("walk {}: {}", src.display(), e)))?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        if rel.as_os_str().is_empty() {
            continue;
        }
        let target = dst.join(rel);
        match entry.file_type() {
            Some(t) if t.is_dir() => ensure_dir(&target)?,
            Some(t) if t.is_file() => {
                if let Some(parent) = target.parent() {
                    ensure_dir(parent)?;
                }
                fs::copy(entry.path(), &target)?;
                copied += 1;
            }
            _ => {}
        }
    }
    Ok(copied)
}

/// Resolve a wildcard file name (e.g. `sonar-java-plugin-*.jar`) inside `dir`.
///
/// When several versions match, the highest version wins: digit runs in the
/// file name compare numerically, so `5.10` beats `5.9`.
pub fn resolve_wildcard(dir: &Path, pattern: &str) -> HarnessResult<PathBuf> {
    let full = dir.join(pattern);
    let full = full.to_string_lossy();

    let paths = glob::glob(&full)
        .map_err(|e| HarnessError::config(format!("invalid pattern '{}': {}", full, e)))?;

    paths
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .max_by(|a, b| version_key(a).cmp(&version_key(b)).then_with(|| a.cmp(b)))
        .ok_or_else(|| HarnessError::config(format!("no file matches '{}'", full)))
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum NameChunk {
    Number(u64),
    Text(String),
}

/// File name split into digit and non-digit runs.
fn version_key(path: &Path) -> Vec<NameChunk> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;
    for c in name.chars() {
        let is_digit = c.is_ascii_digit();
        if !current.is_empty() && is_digit != in_digits {
            chunks.push(to_chunk(std::mem::take(&mut current), in_digits));
        }
        in_digits = is_digit;
        current.push(c);
    }
    if !current.is_empty() {
        chunks.push(to_chunk(current, in_digits));
    }
    chunks
}

fn to_chunk(run: String, digits: bool) -> NameChunk {
    if digits {
        NameChunk::Number(run.parse().unwrap_or(u64::MAX))
    } else {
        NameChunk::Text(run)
    }
}
