// Copyright 2026 Oxide Computer Company

//! Owned pristine content.

use pristine_path::RelativePath;
use std::fmt;

/// The pristine (last-committed) content of a working-copy file.
///
/// The buffer is always followed by a single NUL byte, so
/// [`as_bytes_with_nul`](Self::as_bytes_with_nul) can be handed to consumers
/// that expect C strings. [`len`](Self::len) and [`as_bytes`](Self::as_bytes)
/// exclude the terminator.
#[derive(Clone, PartialEq, Eq)]
pub struct PristineBlob {
    relative_path: RelativePath,
    // Content followed by exactly one NUL.
    buf: Vec<u8>,
}

impl PristineBlob {
    /// Copies `content` into a new NUL-terminated buffer.
    pub fn new(relative_path: RelativePath, content: &[u8]) -> Self {
        let mut buf = Vec::with_capacity(content.len() + 1);
        buf.extend_from_slice(content);
        buf.push(0);
        PristineBlob { relative_path, buf }
    }

    /// Takes ownership of `content`, appending the NUL terminator.
    pub(crate) fn from_vec(
        relative_path: RelativePath,
        mut content: Vec<u8>,
    ) -> Self {
        content.push(0);
        PristineBlob { relative_path, buf: content }
    }

    /// Returns the path, relative to the repository root, the content was
    /// looked up under.
    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// Returns the content without the NUL terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len()]
    }

    /// Returns the content including the NUL terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the content length, excluding the NUL terminator.
    pub fn len(&self) -> usize {
        self.buf.len() - 1
    }

    /// Returns true if there is no content.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the blob, returning the content without the NUL terminator.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.buf.pop();
        self.buf
    }
}

impl fmt::Debug for PristineBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PristineBlob")
            .field("relative_path", &self.relative_path)
            .field("len", &self.len())
            .finish()
    }
}
