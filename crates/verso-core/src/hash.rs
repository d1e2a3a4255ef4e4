//! Content hashing and file identity, both SHA-256 hex.

use std::path::Path;

use sha2::{Digest, Sha256};

/// Stable tracking key for a file, derived from its base name only.
pub type Identifier = String;

/// Content digest of a blob in the object store.
pub type ObjectRef = String;

/// Compute the SHA-256 hash of arbitrary bytes, returned as a hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex_encode(&result)
}

/// Compute the SHA-256 hash of a string.
pub fn hash_str(s: &str) -> String {
    hash_bytes(s.as_bytes())
}

/// Derive the tracking identifier for a naming input (a base name or group name).
///
/// Pure and content-independent. Two files sharing a base name in different
/// directories map to the same identifier.
pub fn identify(name: &str) -> Identifier {
    hash_str(name)
}

/// Identify a file by the base name of `path`.
///
/// Scans and registry lookups both go through here so the two never disagree.
pub fn identify_path(path: &Path) -> Identifier {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    identify(&name)
}

/// Encode raw bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
