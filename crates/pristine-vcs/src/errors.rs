// Copyright 2026 Oxide Computer Company

//! Error types for pristine content lookup and materialization.

use crate::{StoreEngine, VcsName};
use camino::Utf8PathBuf;
use pristine_path::ChecksumParseError;
use std::{ffi::OsString, fmt, io, path::PathBuf};
use thiserror::Error;

// ---- Configuration and detection errors ----

/// An error from reading the VCS override from the environment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VcsEnvError {
    /// The environment variable is set but is not valid UTF-8.
    #[error(
        "${var} environment variable is not valid \
         UTF-8: {value:?}"
    )]
    NonUtf8 {
        /// The environment variable name.
        var: &'static str,
        /// The non-UTF-8 value.
        value: OsString,
    },

    /// The environment variable names a VCS that is not supported.
    #[error("${var} must be \"svn\" or \"git\", got {value:?}")]
    Invalid {
        /// The environment variable name.
        var: &'static str,
        /// The unrecognized value, trimmed.
        value: String,
    },
}

/// An error that occurs while searching ancestor directories for a
/// metadata directory.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LocateError {
    /// The start directory could not be made absolute (e.g. the current
    /// directory is gone).
    #[error("failed to make {path} absolute")]
    Absolute {
        /// The path that was provided.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The absolute form of the start directory is not valid UTF-8.
    #[error("absolute path {path:?} is not valid UTF-8")]
    NonUtf8 {
        /// The non-UTF-8 absolute path.
        path: PathBuf,
    },
}

/// An error that occurs during VCS detection.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VcsDetectError {
    /// Neither `.svn` nor `.git` was found in any ancestor directory.
    #[error("no VCS found for {path} (expected .svn or .git in an ancestor)")]
    NotFound {
        /// The file whose ancestors were searched.
        path: Utf8PathBuf,
    },

    /// Searching ancestor directories failed.
    #[error("failed to search for VCS metadata")]
    Locate(#[from] LocateError),

    /// The VCS override environment variable is invalid.
    #[error(transparent)]
    Env(#[from] VcsEnvError),
}

// ---- Fetch errors ----

/// Why no pristine copy is available for a file.
///
/// These are all ordinary outcomes: the caller has no comparison baseline,
/// but nothing is wrong with the repository.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundReason {
    /// No metadata directory exists in any ancestor of the file.
    NoMetadataDir,
    /// The object store did not recognize any enclosing repository.
    NotARepository,
    /// The file is not inside the repository that owns the metadata
    /// directory.
    OutsideRepository,
    /// The repository has no record of the file (untracked).
    NotTracked,
    /// The file is recorded, but without a checksum (e.g. newly added).
    NoChecksum,
    /// The checksum or text base points at a file that does not exist.
    MissingPristineFile,
    /// The staged blob has no content.
    ///
    /// A tracked but legitimately empty file cannot be told apart from a
    /// file with nothing to compare against, and is reported this way.
    EmptyBlob,
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotFoundReason::NoMetadataDir => "no VCS metadata directory found",
            NotFoundReason::NotARepository => "not inside a repository",
            NotFoundReason::OutsideRepository => {
                "file is outside the repository root"
            }
            NotFoundReason::NotTracked => "file is not tracked",
            NotFoundReason::NoChecksum => "no checksum recorded",
            NotFoundReason::MissingPristineFile => "pristine file is missing",
            NotFoundReason::EmptyBlob => "staged blob is empty",
        };
        f.write_str(s)
    }
}

/// A VCS store engine failed its one-time initialization.
///
/// Once this happens it happens for the rest of the process: every later
/// fetch through the same engine returns a clone of this error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{engine} failed to initialize: {reason}")]
pub struct StoreUnavailableError {
    /// The engine that failed.
    pub engine: StoreEngine,
    /// A human-readable explanation.
    pub reason: String,
}

/// An error while reading an otherwise available VCS store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreAccessError {
    /// A SQLite operation on the working-copy database failed.
    #[error("SQLite failed to {operation}")]
    Sqlite {
        /// What was being attempted (e.g. "open wc.db").
        operation: &'static str,
        /// The underlying SQLite error.
        #[source]
        error: rusqlite::Error,
    },

    /// A Git object-store operation failed.
    #[error("libgit2 failed to {operation}")]
    Git {
        /// What was being attempted (e.g. "load blob").
        operation: &'static str,
        /// The underlying libgit2 error.
        #[source]
        error: git2::Error,
    },

    /// The working-copy database holds a checksum that cannot index the
    /// pristine store.
    #[error("malformed checksum {checksum:?} in working-copy database")]
    MalformedChecksum {
        /// The checksum as stored.
        checksum: String,
        /// Details about the parsing error.
        #[source]
        error: ChecksumParseError,
    },

    /// The store reported a path that is not valid UTF-8.
    #[error("store reported non-UTF-8 path {path:?}")]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },

    /// Reading the pristine file failed.
    #[error("failed to read pristine file {path}")]
    ReadPristine {
        /// The pristine file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// Searching for the metadata directory failed.
    #[error("failed to locate metadata directory")]
    Locate(#[from] LocateError),
}

/// An error returned from fetching pristine content.
///
/// Callers that only need "content or no baseline" should use
/// [`FetchPristine::fetch_or_unavailable`](crate::FetchPristine::fetch_or_unavailable),
/// which folds [`NotFound`](Self::NotFound) and
/// [`StoreAccess`](Self::StoreAccess) into `None`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// No pristine copy is available.
    #[error("no {vcs_name} pristine copy of {path}: {reason}")]
    NotFound {
        /// The VCS that was consulted.
        vcs_name: VcsName,
        /// The working-copy file.
        path: Utf8PathBuf,
        /// Why nothing was found.
        reason: NotFoundReason,
    },

    /// The store engine could not be initialized.
    #[error(transparent)]
    StoreUnavailable(#[from] StoreUnavailableError),

    /// The store was available, but reading it failed.
    #[error("failed to read {vcs_name} metadata for {path}")]
    StoreAccess {
        /// The VCS that was consulted.
        vcs_name: VcsName,
        /// The working-copy file.
        path: Utf8PathBuf,
        /// The underlying store error.
        #[source]
        error: StoreAccessError,
    },
}

impl FetchError {
    pub(crate) fn not_found(
        vcs_name: VcsName,
        path: impl Into<Utf8PathBuf>,
        reason: NotFoundReason,
    ) -> Self {
        FetchError::NotFound { vcs_name, path: path.into(), reason }
    }

    pub(crate) fn store_access(
        vcs_name: VcsName,
        path: impl Into<Utf8PathBuf>,
        error: impl Into<StoreAccessError>,
    ) -> Self {
        FetchError::StoreAccess {
            vcs_name,
            path: path.into(),
            error: error.into(),
        }
    }

    /// Returns true if this is an ordinary "no pristine copy" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }

    /// Returns why no pristine copy was found, if that is what this error
    /// is.
    pub fn not_found_reason(&self) -> Option<NotFoundReason> {
        match self {
            FetchError::NotFound { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

// ---- Materialization errors ----

/// Errors that can occur while exporting pristine content to disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MaterializeError {
    /// VCS detection failed.
    #[error("VCS detection failed")]
    VcsDetect(#[from] VcsDetectError),

    /// Fetching the pristine content failed.
    #[error("failed to fetch pristine content")]
    Fetch(#[from] FetchError),

    /// Failed to create output directory.
    #[error("failed to create output directory {path}")]
    CreateDir {
        /// The directory path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// Failed to write the materialized file.
    #[error("failed to write pristine copy to {path}")]
    WriteOutput {
        /// The path where the write failed.
        path: Utf8PathBuf,
        /// The underlying write error.
        #[source]
        error: AtomicWriteError,
    },
}

/// An error that occurred during an atomic file write.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AtomicWriteError {
    /// Writing contents to the temporary file failed.
    #[error("writing file contents failed")]
    Write(#[source] io::Error),

    /// The atomic write infrastructure failed (e.g., creating the
    /// temporary file, or renaming it into place).
    #[error("atomic create or rename failed")]
    Rename(#[source] io::Error),
}
