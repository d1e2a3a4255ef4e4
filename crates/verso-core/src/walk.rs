//! Directory traversal for registry scans.
//!
//! [`TreeWalker`] yields one [`WalkEntry`] per filesystem entry. A consumer
//! that does not want to descend into a directory it was just handed calls
//! [`TreeWalker::skip_subtree`]. Walks are finite; construct a new walker to
//! start over.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::VersoResult;

/// One step of a directory walk.
#[derive(Debug)]
pub enum WalkEntry {
    /// A directory. `depth` is 0 for the walk root.
    Dir { path: PathBuf, name: String, depth: usize },
    /// A regular file.
    File { path: PathBuf, name: String },
    /// Anything else (symlinks, sockets, ...).
    Other { path: PathBuf },
    /// An entry that could not be read for lack of permission.
    Denied { path: Option<PathBuf> },
}

/// Depth-first walk over a directory tree, in file-name order.
pub struct TreeWalker {
    inner: walkdir::IntoIter,
}

impl TreeWalker {
    pub fn new(root: &Path) -> Self {
        Self {
            inner: WalkDir::new(root).sort_by_file_name().into_iter(),
        }
    }

    /// Do not descend into the directory most recently yielded.
    pub fn skip_subtree(&mut self) {
        self.inner.skip_current_dir();
    }
}

impl Iterator for TreeWalker {
    /// Permission failures come back as [`WalkEntry::Denied`]; any other
    /// traversal failure is an error.
    type Item = VersoResult<WalkEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.inner.next()? {
            Ok(entry) => entry,
            Err(err) => {
                let denied = err
                    .io_error()
                    .map(|e| e.kind() == io::ErrorKind::PermissionDenied)
                    .unwrap_or(false);
                if denied {
                    return Some(Ok(WalkEntry::Denied {
                        path: err.path().map(Path::to_path_buf),
                    }));
                }
                return Some(Err(io::Error::from(err).into()));
            }
        };

        let name = entry.file_name().to_string_lossy().to_string();
        let file_type = entry.file_type();
        let step = if file_type.is_dir() {
            WalkEntry::Dir {
                depth: entry.depth(),
                path: entry.into_path(),
                name,
            }
        } else if file_type.is_file() {
            WalkEntry::File {
                path: entry.into_path(),
                name,
            }
        } else {
            WalkEntry::Other {
                path: entry.into_path(),
            }
        };
        Some(Ok(step))
    }
}
