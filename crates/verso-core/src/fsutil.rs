//! Filesystem utilities for crash-safe writes.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::VersoResult;

/// Write data to a file atomically using temp-file-then-rename.
///
/// On POSIX, `rename()` within the same filesystem is atomic: either the
/// old file or the new file is visible, never a partial write. We fsync
/// the temp file before renaming so the data is durable on disk.
pub fn atomic_write(path: &Path, data: &[u8]) -> VersoResult<()> {
    atomic_write_with_mode(path, data, None)
}

/// Like [`atomic_write`], but sets `mode` on the temp file before the rename
/// so the target never appears with the wrong permission bits.
pub fn atomic_write_with_mode(path: &Path, data: &[u8], mode: Option<u32>) -> VersoResult<()> {
    let tmp = temp_sibling(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data)?;
    file.sync_data()?;
    drop(file);
    if let Some(mode) = mode {
        set_mode(&tmp, mode)?;
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> VersoResult<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> VersoResult<()> {
    Ok(())
}
