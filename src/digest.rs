//! Incremental digest accumulation and the rendered digest value.

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use md5::{Digest, Md5};

use crate::error::OriginError;

/// Default streaming chunk size: 16 MiB.
///
/// Purely a performance knob; any positive chunk size yields the identical
/// digest for the same input bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// A finalized origin digest.
///
/// Displays as uppercase hexadecimal (32 characters for the 16-byte MD5
/// digest) and parses back from the same form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OriginDigest([u8; 16]);

impl OriginDigest {
    pub const BYTE_LENGTH: usize = 16;

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Uppercase hexadecimal rendering, 2x the digest byte length.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Display for OriginDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for OriginDigest {
    type Err = OriginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = hex::decode(s).map_err(|e| OriginError::InvalidDigest(e.to_string()))?;
        let bytes: [u8; 16] = raw
            .try_into()
            .map_err(|_| OriginError::InvalidDigest(format!("expected {} hex characters", 2 * Self::BYTE_LENGTH)))?;
        Ok(Self(bytes))
    }
}

/// One computation's digest state.
///
/// Exclusively owned by a single top-level computation; `finalize` consumes
/// it, so the accumulator cannot be reused or resumed. The chunk buffer is
/// allocated once and reused across every entry the computation feeds in.
pub(crate) struct Accumulator {
    hasher: Md5,
    buffer: Vec<u8>,
}

impl Accumulator {
    pub(crate) fn new(chunk_size: usize) -> Self {
        // A zero-length buffer would make every read return 0 and skip all
        // content while still yielding a digest; clamp so reads always make
        // progress.
        Self {
            hasher: Md5::new(),
            buffer: vec![0u8; chunk_size.max(1)],
        }
    }

    pub(crate) fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Feed an already-open content stream to the digest, chunk by chunk.
    ///
    /// A read failure maps to [`OriginError::Content`]: the stream opened
    /// fine, so the failure happened mid-content.
    pub(crate) fn consume<R: Read>(&mut self, reader: &mut R) -> Result<u64, OriginError> {
        let mut total = 0u64;
        loop {
            let read = reader.read(&mut self.buffer).map_err(OriginError::Content)?;
            if read == 0 {
                break;
            }
            self.hasher.update(&self.buffer[..read]);
            total += read as u64;
        }
        Ok(total)
    }

    pub(crate) fn finalize(self) -> OriginDigest {
        OriginDigest(self.hasher.finalize().into())
    }
}
