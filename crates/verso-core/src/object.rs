//! Content-addressable object store.
//!
//! Objects are stored in `.verso/objects/` using a 2-character prefix
//! directory scheme (like git). Each object is identified by the SHA-256
//! hash of its uncompressed bytes and stored zstd-compressed.
//!
//! The structured records next to the object directory (tracker registry,
//! group tracker) are whole files rather than objects; [`write_file`] and
//! [`read_file`] give them the same atomic, compressed-at-rest treatment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::compress::{compress_bytes, compress_file, decompress_bytes, DecompressedFile};
use crate::config::Config;
use crate::error::{VersoError, VersoResult};
use crate::fsutil::{atomic_write, atomic_write_with_mode};
use crate::hash::{hash_bytes, ObjectRef};

/// The object store manages content-addressable storage on disk.
pub struct ObjectStore {
    /// Root path: `.verso/objects/`
    root: PathBuf,
    level: i32,
}

impl ObjectStore {
    /// Create a new ObjectStore rooted at the given path.
    pub fn new(objects_dir: &Path, compression_level: i32) -> Self {
        Self {
            root: objects_dir.to_path_buf(),
            level: compression_level,
        }
    }

    /// Store bytes and return their content hash.
    ///
    /// If the object already exists (same content), this is a no-op
    /// and simply returns the existing hash.
    pub fn put(&self, data: &[u8]) -> VersoResult<ObjectRef> {
        let hash = hash_bytes(data);
        if self.exists(&hash) {
            tracing::debug!(object = %hash, "object already stored");
            return Ok(hash);
        }

        let path = self.object_path(&hash);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let packed = compress_bytes(data, self.level)?;
        atomic_write(&path, &packed)?;
        tracing::debug!(object = %hash, size = data.len(), stored = packed.len(), "stored object");
        Ok(hash)
    }

    /// Retrieve an object by its hash.
    ///
    /// The decompressed bytes are re-hashed; a mismatch means the blob on
    /// disk is not what was stored and is reported as corrupt.
    pub fn get(&self, hash: &str) -> VersoResult<Vec<u8>> {
        if !self.exists(hash) {
            return Err(VersoError::ObjectNotFound(hash.to_string()));
        }
        let packed = fs::read(self.object_path(hash))?;
        let data = decompress_bytes(&packed)
            .map_err(|e| VersoError::CorruptObject(format!("{hash}: {e}")))?;
        let actual = hash_bytes(&data);
        if actual != hash {
            return Err(VersoError::CorruptObject(format!(
                "{hash}: content hashes to {actual}"
            )));
        }
        Ok(data)
    }

    /// Check if an object exists. Malformed refs never exist.
    pub fn exists(&self, hash: &str) -> bool {
        is_object_ref(hash) && self.object_path(hash).exists()
    }

    /// Get the filesystem path for an object hash.
    ///
    /// Uses 2-char prefix directories: hash `abcdef...` -> `ab/cdef...`
    fn object_path(&self, hash: &str) -> PathBuf {
        let (prefix, rest) = hash.split_at(2);
        self.root.join(prefix).join(rest)
    }
}

/// A well-formed ObjectRef is 64 lowercase hex characters.
fn is_object_ref(hash: &str) -> bool {
    hash.len() == 64 && hash.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Atomically write a structured file, then compress it in place.
pub fn write_file(path: &Path, data: &[u8], config: &Config) -> VersoResult<()> {
    atomic_write_with_mode(path, data, Some(config.file_permissions))?;
    compress_file(path, config.compression_level)
}

/// Read a structured file that is stored compressed.
///
/// The file is decompressed only for the duration of this call.
pub fn read_file(path: &Path, config: &Config) -> VersoResult<Vec<u8>> {
    let view = DecompressedFile::open(path, config.compression_level)?;
    let data = view.read()?;
    view.finish()?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_put_and_get() {
        let dir = tempdir().unwrap();
        let store = ObjectStore::new(dir.path(), 3);

        let data = b"hello world";
        let hash = store.put(data).unwrap();

        let retrieved = store.get(&hash).unwrap();
        assert_eq!(retrieved, data);
    }

    #[test]
    fn test_put_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = ObjectStore::new(dir.path(), 3);

        let data = b"same content";
        let h1 = store.put(data).unwrap();
        let h2 = store.put(data).unwrap();
        assert_eq!(h1, h2);

        let prefix_dir = dir.path().join(&h1[..2]);
        assert_eq!(fs::read_dir(prefix_dir).unwrap().count(), 1);
    }

    #[test]
    fn test_stored_compressed() {
        let dir = tempdir().unwrap();
        let store = ObjectStore::new(dir.path(), 3);

        let data = "repetitive line\n".repeat(200);
        let hash = store.put(data.as_bytes()).unwrap();
        let on_disk = fs::read(dir.path().join(&hash[..2]).join(&hash[2..])).unwrap();
        assert!(on_disk.len() < data.len());
    }

    #[test]
    fn test_get_nonexistent() {
        let dir = tempdir().unwrap();
        let store = ObjectStore::new(dir.path(), 3);

        let missing = "0".repeat(64);
        let result = store.get(&missing);
        assert!(matches!(result, Err(VersoError::ObjectNotFound(_))));

        let result = store.get("deadbeef00");
        assert!(matches!(result, Err(VersoError::ObjectNotFound(_))));
    }

    #[test]
    fn test_get_detects_tampering() {
        let dir = tempdir().unwrap();
        let store = ObjectStore::new(dir.path(), 3);

        let hash = store.put(b"original").unwrap();
        let path = dir.path().join(&hash[..2]).join(&hash[2..]);
        fs::write(&path, compress_bytes(b"tampered", 3).unwrap()).unwrap();

        assert!(matches!(store.get(&hash), Err(VersoError::CorruptObject(_))));
    }

    #[test]
    fn test_get_detects_garbage() {
        let dir = tempdir().unwrap();
        let store = ObjectStore::new(dir.path(), 3);

        let hash = store.put(b"original").unwrap();
        let path = dir.path().join(&hash[..2]).join(&hash[2..]);
        fs::write(&path, b"not zstd at all").unwrap();

        assert!(matches!(store.get(&hash), Err(VersoError::CorruptObject(_))));
    }

    #[test]
    fn test_exists() {
        let dir = tempdir().unwrap();
        let store = ObjectStore::new(dir.path(), 3);

        let hash = store.put(b"test").unwrap();
        assert!(store.exists(&hash));
        assert!(!store.exists("nonexistent"));
    }

    #[test]
    fn test_structured_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tracker");
        let config = Config::default();

        write_file(&path, b"{\"k\":\"v\"}", &config).unwrap();
        assert_ne!(fs::read(&path).unwrap(), b"{\"k\":\"v\"}");

        assert_eq!(read_file(&path, &config).unwrap(), b"{\"k\":\"v\"}");
        // Still compressed at rest after the read.
        assert_ne!(fs::read(&path).unwrap(), b"{\"k\":\"v\"}");
        assert_eq!(read_file(&path, &config).unwrap(), b"{\"k\":\"v\"}");
    }

    #[test]
    fn test_read_file_missing_is_io() {
        let dir = tempdir().unwrap();
        let result = read_file(&dir.path().join("absent"), &Config::default());
        assert!(matches!(result, Err(VersoError::Io(_))));
    }
}
