//! Snapshot Loading
//!
//! A snapshot is a directory tree flattened into a map from relative path
//! (always `/`-separated) to file bytes. `BTreeMap` keeps iteration in
//! lexicographic path order.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use ignore::WalkBuilder;
use ruling_core::{CoreError, CoreResult};

/// Flattened contents of one artifact tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    files: BTreeMap<String, Vec<u8>>,
}

impl Snapshot {
    /// Read every regular file under `root`.
    ///
    /// Hidden files and ignore-files are not special here: a golden tree is
    /// compared verbatim, so all walker filters are disabled.
    pub fn load(root: &Path) -> CoreResult<Self> {
        if !root.is_dir() {
            return Err(CoreError::not_found(format!(
                "snapshot directory {} does not exist",
                root.display()
            )));
        }

        let mut builder = WalkBuilder::new(root);
        builder.standard_filters(false).follow_links(false);

        let mut files = BTreeMap::new();
        for entry in builder.build() {
            let entry = entry.map_err(|e| {
                CoreError::internal(format!("failed to walk {}: {}", root.display(), e))
            })?;
            let path = entry.path();
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let Ok(rel) = path.strip_prefix(root) else {
                continue;
            };
            let rel = normalize_rel_path(rel);
            if rel.is_empty() {
                continue;
            }
            files.insert(rel, fs::read(path)?);
        }

        Ok(Self { files })
    }

    /// Build a snapshot from in-memory entries.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        Self {
            files: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, rel_path: &str) -> Option<&[u8]> {
        self.files.get(rel_path).map(Vec::as_slice)
    }

    /// Relative paths in lexicographic order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn normalize_rel_path(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
