//! Order-independent origin hashes for directory trees and archive containers.
//!
//! An origin hash fingerprints a logical set of files rather than one packaged
//! byte stream. The same file set yields the same digest whether it sits
//! unpacked on disk or inside a zip/tar container, because the hash covers
//! only canonical relative paths and file content, in a canonical order;
//! container metadata such as modification timestamps never reaches the
//! digest.
//!
//! ```no_run
//! use originhash::OriginComputer;
//!
//! let computer = OriginComputer::new();
//! let from_tree = computer.compute_origin_from_directory("release/")?;
//! let from_archive = computer.compute_origin_from_archive("release.zip")?;
//! assert_eq!(from_tree, from_archive);
//! # Ok::<(), originhash::OriginError>(())
//! ```

use std::fs::File;
use std::path::Path;

pub mod archive;
pub mod canonical;
pub mod digest;
pub mod error;
pub mod walk;

pub use archive::ArchiveKind;
pub use digest::{OriginDigest, DEFAULT_CHUNK_SIZE};
pub use error::OriginError;

use digest::Accumulator;

/// Origin hash computations with shared configuration.
///
/// Each computation constructs its own digest state, so one computer may be
/// used for any number of calls, including concurrently from separate threads.
#[derive(Debug, Clone)]
pub struct OriginComputer {
    pub chunk_size: usize,
    pub follow_symlinks: bool,
}

impl Default for OriginComputer {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            follow_symlinks: true,
        }
    }
}

impl OriginComputer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Streaming chunk size in bytes. Performance only; the digest is
    /// identical for every choice. Zero is clamped to one byte, since a
    /// zero-length read buffer could never consume any content.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_follow_symlinks(mut self, follow_symlinks: bool) -> Self {
        self.follow_symlinks = follow_symlinks;
        self
    }

    /// Origin digest of every file under a directory root, recursively.
    pub fn compute_origin_from_directory<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<OriginDigest, OriginError> {
        walk::compute_origin_from_directory(path.as_ref(), self.chunk_size, self.follow_symlinks)
    }

    /// Origin digest of an archive container's members (zip, tar, tar.gz,
    /// tar.bz2), streamed without extraction.
    pub fn compute_origin_from_archive<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<OriginDigest, OriginError> {
        archive::compute_origin_from_archive(path.as_ref(), self.chunk_size)
    }

    /// Plain content digest of one file. No path bytes are hashed, so the
    /// result depends only on the byte stream.
    pub fn compute_file_digest<P: AsRef<Path>>(&self, path: P) -> Result<OriginDigest, OriginError> {
        let mut stream = File::open(path.as_ref())?;
        let mut acc = Accumulator::new(self.chunk_size);
        acc.consume(&mut stream)?;
        Ok(acc.finalize())
    }

    /// Auto-detect the source type: directories hash as trees, files with a
    /// recognized archive suffix hash as containers, everything else as a
    /// single content stream.
    pub fn compute<P: AsRef<Path>>(&self, path: P) -> Result<OriginDigest, OriginError> {
        let path = path.as_ref();
        if path.is_dir() {
            self.compute_origin_from_directory(path)
        } else if ArchiveKind::detect(path).is_ok() {
            self.compute_origin_from_archive(path)
        } else {
            self.compute_file_digest(path)
        }
    }

    /// Recompute the digest for `path` (auto-detected) and compare it against
    /// an expected hex rendering.
    pub fn verify<P: AsRef<Path>>(&self, path: P, expected: &str) -> Result<bool, OriginError> {
        let expected: OriginDigest = expected.parse()?;
        let actual = self.compute(path)?;
        Ok(expected == actual)
    }
}
