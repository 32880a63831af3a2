//! Archive-container origin hashing.
//!
//! Members are enumerated up front (so they can be sorted before any content
//! is hashed) and then streamed straight out of the container, never extracted
//! to disk. Zip containers offer random member access; the tar family is
//! sequential, so each sorted member costs one scan of the container.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use tracing::{debug, trace};

use crate::canonical::{canonical_key, compare_keys, is_directory_marker};
use crate::digest::{Accumulator, OriginDigest};
use crate::error::OriginError;

/// Supported container formats, recognized by file name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    Tar,
    TarGz,
    TarBz2,
}

impl ArchiveKind {
    /// Detect the container format from the file name.
    ///
    /// An unrecognized suffix means the path cannot be treated as an archive
    /// at all, which surfaces as [`OriginError::Archive`].
    pub fn detect(path: &Path) -> Result<Self, OriginError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if name.ends_with(".zip") {
            Ok(ArchiveKind::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Ok(ArchiveKind::TarGz)
        } else if name.ends_with(".tar.bz2") {
            Ok(ArchiveKind::TarBz2)
        } else if name.ends_with(".tar") {
            Ok(ArchiveKind::Tar)
        } else {
            Err(OriginError::Archive(format!(
                "unsupported archive format: {}",
                path.display()
            )))
        }
    }
}

/// Compute the origin digest of an archive's members.
///
/// Equivalent member sets hash identically to the unpacked directory tree:
/// container metadata such as per-entry modification timestamps never reaches
/// the digest, and directory pseudo-entries are skipped.
pub fn compute_origin_from_archive(
    path: &Path,
    chunk_size: usize,
) -> Result<OriginDigest, OriginError> {
    match ArchiveKind::detect(path)? {
        ArchiveKind::Zip => zip_origin(path, chunk_size),
        kind => tar_origin(path, kind, chunk_size),
    }
}

fn zip_origin(path: &Path, chunk_size: usize) -> Result<OriginDigest, OriginError> {
    let file = File::open(path)
        .map_err(|e| OriginError::Archive(format!("cannot open {}: {}", path.display(), e)))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;

    // Member index kept alongside the raw name so duplicate names still hash
    // as distinct members.
    let mut members: Vec<(String, usize)> = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let member = archive.by_index(index)?;
        members.push((canonical_key(member.name()), index));
    }
    members.sort_by(|a, b| compare_keys(&a.0, &b.0));

    debug!(archive = %path.display(), members = members.len(), "hashing zip archive");

    let mut acc = Accumulator::new(chunk_size);
    for (key, index) in &members {
        if is_directory_marker(key) {
            continue;
        }
        acc.update(key.as_bytes());
        let mut stream = archive.by_index(*index)?;
        let bytes = acc.consume(&mut stream)?;
        trace!(key = %key, bytes, "hashed member");
    }
    Ok(acc.finalize())
}

fn tar_origin(path: &Path, kind: ArchiveKind, chunk_size: usize) -> Result<OriginDigest, OriginError> {
    let mut members = tar_member_list(path, kind)?;
    members.sort_by(|a, b| compare_keys(&a.0, &b.0));

    debug!(archive = %path.display(), members = members.len(), "hashing tar archive");

    let mut acc = Accumulator::new(chunk_size);
    for (key, index) in &members {
        if is_directory_marker(key) {
            continue;
        }
        acc.update(key.as_bytes());
        stream_tar_member(path, kind, *index, &mut acc)?;
    }
    Ok(acc.finalize())
}

fn open_tar(path: &Path, kind: ArchiveKind) -> Result<tar::Archive<Box<dyn Read>>, OriginError> {
    let file = File::open(path)
        .map_err(|e| OriginError::Archive(format!("cannot open {}: {}", path.display(), e)))?;
    let reader: Box<dyn Read> = match kind {
        ArchiveKind::TarGz => Box::new(GzDecoder::new(file)),
        ArchiveKind::TarBz2 => Box::new(BzDecoder::new(file)),
        _ => Box::new(BufReader::new(file)),
    };
    Ok(tar::Archive::new(reader))
}

/// First pass: canonical key and position of every regular-file member.
fn tar_member_list(path: &Path, kind: ArchiveKind) -> Result<Vec<(String, usize)>, OriginError> {
    let mut archive = open_tar(path, kind)?;
    let mut members = Vec::new();
    let entries = archive
        .entries()
        .map_err(|e| OriginError::Archive(e.to_string()))?;
    for (index, entry) in entries.enumerate() {
        let entry = entry.map_err(|e| OriginError::Archive(e.to_string()))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let raw = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        members.push((canonical_key(&raw), index));
    }
    Ok(members)
}

/// Second pass: scan back to one member by position and stream its content.
fn stream_tar_member(
    path: &Path,
    kind: ArchiveKind,
    index: usize,
    acc: &mut Accumulator,
) -> Result<(), OriginError> {
    let mut archive = open_tar(path, kind)?;
    let entries = archive
        .entries()
        .map_err(|e| OriginError::Archive(e.to_string()))?;
    for (position, entry) in entries.enumerate() {
        let mut entry = entry.map_err(|e| OriginError::Archive(e.to_string()))?;
        if position == index {
            acc.consume(&mut entry)?;
            return Ok(());
        }
    }
    Err(OriginError::Archive(format!(
        "member {} vanished between passes: {}",
        index,
        path.display()
    )))
}
