// Copyright 2026 Oxide Computer Company

//! Error types for relative path and checksum parsing.

use thiserror::Error;

/// An error that occurs while parsing a
/// [`ContentChecksum`](crate::ContentChecksum).
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum ChecksumParseError {
    /// The checksum column was empty.
    #[error("checksum is empty")]
    Empty,

    /// The checksum is too short to hold a hash-kind prefix and a fan-out
    /// directory name.
    #[error(
        "invalid length: expected at least 8 characters \
         (6-character kind prefix plus digest), got {0}"
    )]
    TooShort(usize),

    /// The 6-character kind prefix is not ASCII (so the digest cannot be
    /// split off at a character boundary).
    #[error("checksum kind prefix {0:?} is not ASCII")]
    InvalidPrefix(String),

    /// The digest following the kind prefix is not valid hexadecimal.
    #[error("invalid hexadecimal digest")]
    InvalidHex(#[from] hex::FromHexError),
}

/// An error that occurs while constructing a
/// [`RelativePath`](crate::RelativePath).
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum RelativePathError {
    /// The path starts with a separator, so it is not relative.
    #[error("relative path {0:?} starts with a separator")]
    LeadingSeparator(String),

    /// The path contains a component other than a plain file or directory
    /// name (e.g. `.`, `..`, or an empty component from a doubled
    /// separator).
    #[error(
        "relative path {path:?} contains non-normal component {component:?} \
         (only plain file/directory names are allowed)"
    )]
    InvalidComponent {
        /// The full path that failed validation.
        path: String,
        /// The offending component.
        component: String,
    },

    /// The path contains a NUL byte, which no VCS store can represent.
    #[error("relative path contains a NUL byte")]
    NulByte,
}
