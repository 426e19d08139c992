// Copyright 2026 Oxide Computer Company

//! Value types for locating pristine file content in version control
//! metadata.
//!
//! A *pristine* copy is the last-committed version of a working-copy file,
//! as recorded by the VCS that manages it. To look one up, the file's
//! absolute path must first be expressed relative to its repository root
//! in the VCS's own path convention (forward slashes, no leading
//! separator). This crate provides that conversion, plus the checksum type
//! Subversion uses to index its pristine store.
//!
//! The main entry point is [`resolve_relative_path`].
//!
//! # Examples
//!
//! ```
//! use camino::Utf8Path;
//! use pristine_path::{ContentChecksum, resolve_relative_path};
//!
//! // The metadata directory's parent is the repository root.
//! let rel = resolve_relative_path(
//!     Utf8Path::new("/work/repo/src/foo.c"),
//!     Utf8Path::new("/work/repo/.svn"),
//! )
//! .unwrap();
//! assert_eq!(rel.as_str(), "src/foo.c");
//!
//! // Subversion checksums carry a 6-character kind prefix.
//! let checksum: ContentChecksum =
//!     "$sha1$4b825dc642cb6eb9a060e54bf8d69288fbee4904".parse().unwrap();
//! assert_eq!(checksum.fan_out(), "4b");
//! ```
//!
//! # Related crates
//!
//! For reading pristine content out of Subversion and Git working copies,
//! see `pristine-vcs`.

#![deny(missing_docs)]

mod checksum;
mod errors;
mod relative_path;

pub use checksum::ContentChecksum;
pub use errors::{ChecksumParseError, RelativePathError};
pub use relative_path::{RelativePath, resolve_relative_path};
