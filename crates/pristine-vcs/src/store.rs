// Copyright 2026 Oxide Computer Company

//! The narrow store interfaces the fetchers need.
//!
//! Each handle is an owned value: dropping it releases the underlying
//! connection, repository, index, or blob. The fetchers acquire handles in
//! nested scopes, so every return path (including errors) releases each
//! handle exactly once.

use crate::StoreAccessError;
use camino::{Utf8Path, Utf8PathBuf};
use pristine_path::RelativePath;

/// Opens Subversion working-copy databases (`wc.db`).
pub trait WcDbStore {
    /// An open database connection.
    type Connection: WcDbConnection;

    /// Opens the database at `db_path` for reading.
    fn open(&self, db_path: &Utf8Path)
    -> Result<Self::Connection, StoreAccessError>;
}

/// An open Subversion working-copy database.
pub trait WcDbConnection {
    /// Returns the checksum recorded for `relpath`, or `None` if the
    /// database has no row for it.
    ///
    /// A row without a checksum yields `Some` of an empty string.
    fn checksum(
        &self,
        relpath: &RelativePath,
    ) -> Result<Option<String>, StoreAccessError>;
}

/// Opens Git repositories.
pub trait GitStore {
    /// An open repository.
    type Repo: GitRepo;

    /// Opens the repository that owns `start_dir`, searching upward.
    ///
    /// Returns `Ok(None)` if `start_dir` is not inside any repository.
    fn discover(
        &self,
        start_dir: &Utf8Path,
    ) -> Result<Option<Self::Repo>, StoreAccessError>;
}

/// An open Git repository.
pub trait GitRepo {
    /// The repository's staged index.
    type Index: GitIndex;

    /// A loaded blob, borrowing the repository.
    type Blob<'repo>: GitBlob
    where
        Self: 'repo;

    /// Returns the metadata directory whose parent is the working tree
    /// root.
    fn metadata_dir(&self) -> Result<Utf8PathBuf, StoreAccessError>;

    /// Opens the staged index.
    fn index(&self) -> Result<Self::Index, StoreAccessError>;

    /// Loads the blob with the given id from the object database.
    fn find_blob(
        &self,
        id: git2::Oid,
    ) -> Result<Self::Blob<'_>, StoreAccessError>;
}

/// A Git index.
pub trait GitIndex {
    /// Returns the blob id staged for `path` at stage 0, if any.
    fn blob_id(&self, path: &RelativePath) -> Option<git2::Oid>;
}

/// A Git blob.
pub trait GitBlob {
    /// Returns the blob's raw content.
    fn content(&self) -> &[u8];
}
