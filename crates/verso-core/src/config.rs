//! Repository configuration.
//!
//! Read from `.verso/config.toml` when present, otherwise defaults. The value
//! is passed explicitly into scans and persistence calls; nothing here is
//! process-global.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{VersoError, VersoResult};

/// The control directory at the working-tree root.
pub const CONTROL_DIR: &str = ".verso";

/// Name of the optional config file inside the control directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Directories skipped by scans unless the config says otherwise.
const DEFAULT_EXCLUDED_DIRS: &[&str] = &[".git"];

/// Tunables for a verso repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory names skipped during scans, in addition to `.verso`.
    pub excluded_dirs: Vec<String>,

    /// Permission bits for structured files (default: 0o644)
    pub file_permissions: u32,

    /// zstd level used for objects and structured files (default: 3)
    pub compression_level: i32,

    /// Unchanged lines shown around each diff hunk (default: 3)
    pub diff_context_lines: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            file_permissions: 0o644,
            compression_level: 3,
            diff_context_lines: 3,
        }
    }
}

impl Config {
    /// Load `config.toml` from the control directory, or fall back to defaults.
    pub fn load(control_dir: &Path) -> VersoResult<Self> {
        let path = control_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    /// Parse TOML config content. Missing keys take their defaults.
    pub fn parse(content: &str) -> VersoResult<Self> {
        toml::from_str(content).map_err(|e| VersoError::Config(e.to_string()))
    }

    /// Should a directory with this name be skipped during a scan?
    ///
    /// The control directory is always skipped, whatever the config says.
    pub fn is_dir_excluded(&self, name: &str) -> bool {
        name == CONTROL_DIR || self.excluded_dirs.iter().any(|d| d == name)
    }
}
