//! File tracker registry.
//!
//! Maps each file [`Identifier`] to a [`TrackedFile`] record: where the file
//! currently lives and its aggregate commit statistics. Stored as
//! `.verso/tracker`, JSON compressed at rest.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::VersoResult;
use crate::hash::{identify, Identifier, ObjectRef};
use crate::object::{read_file, write_file};
use crate::walk::{TreeWalker, WalkEntry};

/// File name of the registry inside the control directory.
pub const TRACKER_FILE: &str = "tracker";

/// A tracked file entry in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackedFile {
    /// Path relative to the working-tree root, `/`-separated.
    pub path: String,
    /// Number of commits that included this file.
    pub commit_count: u64,
    pub last_commit_message: Option<String>,
    pub last_commit_timestamp: Option<DateTime<Utc>>,
    /// Blob recorded by the most recent commit touching this file.
    pub last_object: Option<ObjectRef>,
}

impl TrackedFile {
    /// A fresh record with zeroed commit statistics.
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            commit_count: 0,
            last_commit_message: None,
            last_commit_timestamp: None,
            last_object: None,
        }
    }
}

/// The full registry mapping identifiers to their tracking records.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    pub entries: BTreeMap<Identifier, TrackedFile>,
}

impl Registry {
    /// Load the registry from its compressed file, or return an empty one.
    pub fn load(path: &Path, config: &Config) -> VersoResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = read_file(path, config)?;
        let registry: Registry = serde_json::from_slice(&data)?;
        tracing::debug!(entries = registry.len(), "loaded tracker registry");
        Ok(registry)
    }

    /// Save the registry (atomic write, then compress in place).
    pub fn save(&self, path: &Path, config: &Config) -> VersoResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_file(path, json.as_bytes(), config)
    }

    /// Record the current path for a file.
    ///
    /// Creates a record with zeroed stats if the identifier is new; otherwise
    /// only the path changes.
    pub fn upsert(&mut self, id: &str, path: &str) {
        let record = match self.entries.get(id) {
            Some(existing) => TrackedFile {
                path: path.to_string(),
                ..existing.clone()
            },
            None => TrackedFile::new(path),
        };
        self.entries.insert(id.to_string(), record);
    }

    /// Fold one commit into a file's statistics.
    ///
    /// Returns false if the identifier has no record.
    pub fn record_commit(
        &mut self,
        id: &str,
        message: &str,
        timestamp: DateTime<Utc>,
        object: &str,
    ) -> bool {
        let Some(existing) = self.entries.get(id) else {
            return false;
        };
        let updated = TrackedFile {
            path: existing.path.clone(),
            commit_count: existing.commit_count + 1,
            last_commit_message: Some(message.to_string()),
            last_commit_timestamp: Some(timestamp),
            last_object: Some(object.to_string()),
        };
        self.entries.insert(id.to_string(), updated);
        true
    }

    pub fn get(&self, id: &str) -> Option<&TrackedFile> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Walk `root` and record every regular file whose identifier is in `known`.
    ///
    /// Excluded directories are never entered. Entries we lack permission
    /// for are logged and skipped; any other traversal error aborts the scan.
    /// When two files share a base name the one visited last wins.
    pub fn scan(root: &Path, known: &BTreeSet<Identifier>, config: &Config) -> VersoResult<Self> {
        tracing::info!("scanning files in {}", root.display());

        let mut registry = Registry::default();
        let mut walker = TreeWalker::new(root);

        while let Some(step) = walker.next() {
            match step? {
                WalkEntry::Dir { name, depth, .. } => {
                    if depth > 0 && config.is_dir_excluded(&name) {
                        walker.skip_subtree();
                    }
                }
                WalkEntry::File { path, name } => {
                    let id = identify(&name);
                    if !known.contains(&id) {
                        continue;
                    }
                    let rel = relative_path(root, &path);
                    if let Some(previous) = registry.get(&id) {
                        tracing::warn!(
                            kept = %rel,
                            dropped = %previous.path,
                            "two tracked files share a base name"
                        );
                    }
                    registry.upsert(&id, &rel);
                }
                WalkEntry::Denied { path } => {
                    let shown = path
                        .as_deref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    tracing::warn!(path = %shown, "permission denied, skipping");
                }
                WalkEntry::Other { .. } => {}
            }
        }

        Ok(registry)
    }
}

/// `path` relative to `root` with `/` separators, or `path` itself if it is
/// not under `root`.
pub(crate) fn relative_path(root: &Path, path: &Path) -> String {
    let Ok(rel) = path.strip_prefix(root) else {
        return path.to_string_lossy().to_string();
    };
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
