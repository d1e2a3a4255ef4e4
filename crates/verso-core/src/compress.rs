//! zstd compression, in memory and in place on disk.
//!
//! Structured files under `.verso/` are always at rest compressed. Reads go
//! through [`DecompressedFile`], which decompresses the file in place for the
//! duration of one access and re-compresses it when finished or dropped.
//!
//! Drop does not run if the process is killed while a view is open, so the
//! file can be left plain on disk. Opening a view checks for the zstd frame
//! magic and treats a file without it as already decompressed; the view then
//! compresses it on the way out, which repairs the file on its next read.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{VersoError, VersoResult};
use crate::fsutil::atomic_write_with_mode;

/// First four bytes of every zstd frame.
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Compress a byte buffer with zstd at the given level.
pub fn compress_bytes(data: &[u8], level: i32) -> VersoResult<Vec<u8>> {
    Ok(zstd::encode_all(data, level)?)
}

/// Decompress a zstd byte buffer.
///
/// Any decoding failure is reported as [`VersoError::CorruptObject`].
pub fn decompress_bytes(data: &[u8]) -> VersoResult<Vec<u8>> {
    zstd::decode_all(data).map_err(|e| VersoError::CorruptObject(e.to_string()))
}

/// Compress the file at `path` in place, keeping its permission bits.
///
/// Not idempotent: calling this on an already-compressed file compresses it twice.
pub fn compress_file(path: &Path, level: i32) -> VersoResult<()> {
    let plain = fs::read(path)?;
    let packed = compress_bytes(&plain, level)?;
    atomic_write_with_mode(path, &packed, current_mode(path))
}

/// Decompress the file at `path` in place, keeping its permission bits.
///
/// On failure the file is left untouched.
pub fn decompress_file(path: &Path) -> VersoResult<()> {
    let packed = fs::read(path)?;
    let plain = decompress_bytes(&packed)
        .map_err(|e| VersoError::CorruptObject(format!("{}: {e}", path.display())))?;
    atomic_write_with_mode(path, &plain, current_mode(path))
}

fn is_compressed(path: &Path) -> VersoResult<bool> {
    let mut head = Vec::with_capacity(ZSTD_MAGIC.len());
    fs::File::open(path)?
        .take(ZSTD_MAGIC.len() as u64)
        .read_to_end(&mut head)?;
    Ok(head == ZSTD_MAGIC)
}

#[cfg(unix)]
fn current_mode(path: &Path) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).ok().map(|m| m.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn current_mode(_path: &Path) -> Option<u32> {
    None
}

/// A structured file temporarily decompressed on disk.
///
/// Acquiring the view decompresses the file; [`finish`](Self::finish) or
/// dropping the view compresses it again, so an early return or a failed
/// parse never leaves the file at rest in plain form.
#[derive(Debug)]
pub struct DecompressedFile {
    path: PathBuf,
    level: i32,
    restored: bool,
}

impl DecompressedFile {
    /// Decompress `path` in place and hold it open for reading.
    ///
    /// A file left plain by an interrupted earlier view is used as is.
    pub fn open(path: &Path, level: i32) -> VersoResult<Self> {
        if is_compressed(path)? {
            decompress_file(path)?;
        } else {
            tracing::warn!(path = %path.display(), "structured file found uncompressed, recovering");
        }
        Ok(Self {
            path: path.to_path_buf(),
            level,
            restored: false,
        })
    }

    /// Read the plain contents.
    pub fn read(&self) -> VersoResult<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }

    /// Re-compress the file and surface any error.
    pub fn finish(mut self) -> VersoResult<()> {
        self.restored = true;
        compress_file(&self.path, self.level)
    }
}

impl Drop for DecompressedFile {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = compress_file(&self.path, self.level) {
            tracing::error!(
                path = %self.path.display(),
                error = %e,
                "failed to re-compress structured file"
            );
        }
    }
}
