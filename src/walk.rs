//! Directory-tree origin hashing: recursive enumeration, canonical ordering,
//! and the streamed digest pass.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::canonical::{compare_keys, is_directory_marker, relative_canonical_key};
use crate::digest::{Accumulator, OriginDigest};
use crate::error::OriginError;

/// Compute the origin digest of every file under `root`, recursively.
///
/// Entries are ordered by canonical key, so the result is independent of the
/// order the filesystem happens to report them in, of path case, and of the
/// platform's separator style.
pub fn compute_origin_from_directory(
    root: &Path,
    chunk_size: usize,
    follow_symlinks: bool,
) -> Result<OriginDigest, OriginError> {
    if !root.is_dir() {
        return Err(OriginError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("not a readable directory: {}", root.display()),
        )));
    }

    let mut files = Vec::new();
    collect_files(root, follow_symlinks, &mut files)?;

    // Canonical key computed once per entry, then sorted on the cached key.
    let mut entries: Vec<(String, PathBuf)> = files
        .into_iter()
        .map(|path| (relative_canonical_key(root, &path), path))
        .collect();
    entries.sort_by(|a, b| compare_keys(&a.0, &b.0));

    debug!(root = %root.display(), entries = entries.len(), "hashing directory tree");

    let mut acc = Accumulator::new(chunk_size);
    for (key, path) in &entries {
        if is_directory_marker(key) {
            continue;
        }
        acc.update(key.as_bytes());
        let mut stream = File::open(path)?;
        let bytes = acc.consume(&mut stream)?;
        trace!(key = %key, bytes, "hashed entry");
    }
    Ok(acc.finalize())
}

fn collect_files(
    dir: &Path,
    follow_symlinks: bool,
    out: &mut Vec<PathBuf>,
) -> Result<(), OriginError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_symlink() {
            if !follow_symlinks {
                continue;
            }
            // Resolve the target; loop avoidance stays with the filesystem.
            let metadata = fs::metadata(&path)?;
            if metadata.is_dir() {
                collect_files(&path, follow_symlinks, out)?;
            } else {
                out.push(path);
            }
        } else if file_type.is_dir() {
            collect_files(&path, follow_symlinks, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}
