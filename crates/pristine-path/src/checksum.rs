// Copyright 2026 Oxide Computer Company

//! Subversion pristine-store checksums.

use crate::ChecksumParseError;
use std::{fmt, str::FromStr};

/// Length of the hash-kind prefix, e.g. `$sha1$` or `$md5 $`.
const KIND_PREFIX_LEN: usize = 6;

/// Length of the fan-out directory name inside `pristine/`.
const FAN_OUT_LEN: usize = 2;

/// A checksum token read from a Subversion working-copy database.
///
/// Subversion 1.7+ stores checksums as a 6-character kind prefix followed by
/// a hex digest:
///
/// ```text
/// $sha1$4b825dc642cb6eb9a060e54bf8d69288fbee4904
/// ^^^^^^ kind
///       ^^ fan-out directory
///       ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^ pristine file stem
/// ```
///
/// A checksum is only meaningful for the working copy it was read from.
///
/// # Parsing
///
/// ```
/// use pristine_path::ContentChecksum;
///
/// let checksum: ContentChecksum =
///     "$sha1$4b825dc642cb6eb9a060e54bf8d69288fbee4904".parse().unwrap();
/// assert_eq!(checksum.kind(), "sha1");
/// assert_eq!(checksum.fan_out(), "4b");
/// assert_eq!(
///     checksum.digest(),
///     "4b825dc642cb6eb9a060e54bf8d69288fbee4904",
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContentChecksum {
    raw: String,
}

impl ContentChecksum {
    /// Returns the hash kind with the surrounding `$` and padding removed
    /// (e.g. `sha1` or `md5`).
    pub fn kind(&self) -> &str {
        self.raw[..KIND_PREFIX_LEN].trim_matches(|c| c == '$' || c == ' ')
    }

    /// Returns the hex digest: everything after the kind prefix.
    pub fn digest(&self) -> &str {
        &self.raw[KIND_PREFIX_LEN..]
    }

    /// Returns the name of the fan-out directory the pristine file lives in.
    pub fn fan_out(&self) -> &str {
        &self.digest()[..FAN_OUT_LEN]
    }

    /// Returns the checksum exactly as it was stored.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for ContentChecksum {
    type Err = ChecksumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ChecksumParseError::Empty);
        }
        let len = s.len();
        if len < KIND_PREFIX_LEN + FAN_OUT_LEN {
            return Err(ChecksumParseError::TooShort(len));
        }
        let Some(prefix) = s.get(..KIND_PREFIX_LEN).filter(|p| p.is_ascii())
        else {
            let prefix = s.chars().take(KIND_PREFIX_LEN).collect();
            return Err(ChecksumParseError::InvalidPrefix(prefix));
        };
        let digest = &s[prefix.len()..];
        // A hex-only digest also guarantees the derived pristine path stays
        // inside the pristine store.
        hex::decode(digest)?;
        Ok(ContentChecksum { raw: s.to_owned() })
    }
}

impl fmt::Display for ContentChecksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.raw.fmt(f)
    }
}
