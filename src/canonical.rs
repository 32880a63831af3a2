//! Path canonicalization and the deterministic ordering over canonical keys.
//!
//! A canonical key is the lowercased, forward-slash form of an entry's path,
//! relative to the enumeration root. The same key bytes serve as the sort key
//! and as the path bytes fed to the digest, so the key transform alone decides
//! whether two differently-spelled paths fingerprint identically.

use std::cmp::Ordering;
use std::path::Path;

/// Canonicalize a raw entry name: backslashes become `/`, then lowercase.
///
/// Pure string transform; never fails for any input.
pub fn canonical_key(raw: &str) -> String {
    raw.replace('\\', "/").to_lowercase()
}

/// Canonical key for a file under an enumeration root, with the root prefix
/// stripped first.
pub fn relative_canonical_key(root: &Path, path: &Path) -> String {
    // Enumeration only ever yields paths under `root`; the fallback exists
    // to keep the transform total, not because callers hit it.
    let relative = path.strip_prefix(root).unwrap_or(path);
    canonical_key(&relative.to_string_lossy())
}

/// A key ending in `/` is an archive directory pseudo-entry, not a file, and
/// contributes nothing to the digest.
pub fn is_directory_marker(key: &str) -> bool {
    key.ends_with('/')
}

/// Ordinal comparison of canonical keys.
///
/// Compares the key bytes directly. Never locale collation: digits,
/// underscores, and letters must order identically on every platform, or
/// digests diverge across systems.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}
