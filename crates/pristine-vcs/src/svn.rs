// Copyright 2026 Oxide Computer Company

//! Pristine content from Subversion working copies.

use crate::{
    FetchError, FetchPristine, LocateError, NotFoundReason, PristineBlob,
    StoreAccessError, VcsName,
    engine::ensure_sqlite,
    locate::{absolute_utf8, locate_dir_up},
    store::{WcDbConnection, WcDbStore},
};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use pristine_path::{ContentChecksum, RelativePath, resolve_relative_path};
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use tracing::debug;

/// The Subversion metadata directory name.
pub const SVN_DIR: &str = ".svn";

/// Present in Subversion 1.7+ working copies.
const WC_DB: &str = "wc.db";
/// Content-addressed pristine store (1.7+).
const PRISTINE_DIR: &str = "pristine";
/// Per-directory pristine copies (before 1.7).
const TEXT_BASE_DIR: &str = "text-base";
/// Suffix shared by both layouts.
const PRISTINE_SUFFIX: &str = ".svn-base";

const CHECKSUM_QUERY: &str =
    "SELECT checksum FROM nodes_current WHERE local_relpath = ?1";

/// Opens `wc.db` read-only with SQLite.
#[derive(Clone, Copy, Debug, Default)]
pub struct SqliteWcDb;

impl WcDbStore for SqliteWcDb {
    type Connection = Connection;

    fn open(&self, db_path: &Utf8Path) -> Result<Connection, StoreAccessError> {
        Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|error| StoreAccessError::Sqlite {
            operation: "open wc.db",
            error,
        })
    }
}

impl WcDbConnection for Connection {
    fn checksum(
        &self,
        relpath: &RelativePath,
    ) -> Result<Option<String>, StoreAccessError> {
        let mut stmt = self.prepare(CHECKSUM_QUERY).map_err(|error| {
            StoreAccessError::Sqlite {
                operation: "prepare checksum query",
                error,
            }
        })?;
        let checksum: Option<Option<String>> = stmt
            .query_row([relpath.as_str()], |row| row.get(0))
            .optional()
            .map_err(|error| StoreAccessError::Sqlite {
                operation: "query nodes_current",
                error,
            })?;
        Ok(checksum.map(Option::unwrap_or_default))
    }
}

/// Reads pristine content from Subversion working copies.
///
/// Both on-disk layouts are supported, chosen by whether `wc.db` exists in
/// the metadata directory:
///
/// - **1.7 and later**: the file's checksum is looked up in `wc.db`, and the
///   pristine copy lives at `pristine/<fan-out>/<digest>.svn-base`.
/// - **Before 1.7**: the pristine copy lives at
///   `text-base/<file name>.svn-base`.
///
/// Nothing in the working copy is ever written.
#[derive(Clone, Debug, Default)]
pub struct SvnFetcher<S = SqliteWcDb> {
    store: S,
}

impl SvnFetcher {
    /// Creates a fetcher backed by SQLite.
    pub fn new() -> Self {
        SvnFetcher { store: SqliteWcDb }
    }
}

impl<S: WcDbStore> SvnFetcher<S> {
    /// Creates a fetcher that opens working-copy databases through `store`.
    pub fn with_store(store: S) -> Self {
        SvnFetcher { store }
    }

    /// Returns the path of the pristine copy of `full_file_path`, given the
    /// `.svn` directory that owns it.
    ///
    /// The caller reads the returned file as the pristine content.
    pub fn locate_pristine_file(
        &self,
        full_file_path: &Utf8Path,
        svn_dir: &Utf8Path,
    ) -> Result<Utf8PathBuf, FetchError> {
        self.locate(full_file_path, svn_dir).map(|(path, _)| path)
    }

    /// Reads the pristine copy of `full_file_path`, given the `.svn`
    /// directory that owns it.
    ///
    /// Unlike Git, an empty pristine file is returned as an empty blob.
    pub fn fetch_with_metadata_dir(
        &self,
        full_file_path: &Utf8Path,
        svn_dir: &Utf8Path,
    ) -> Result<PristineBlob, FetchError> {
        let (pristine_path, relative_path) =
            self.locate(full_file_path, svn_dir)?;
        let content = fs::read(&pristine_path).map_err(|error| {
            FetchError::store_access(
                VcsName::Svn,
                full_file_path,
                StoreAccessError::ReadPristine { path: pristine_path, error },
            )
        })?;
        Ok(PristineBlob::from_vec(relative_path, content))
    }

    fn locate(
        &self,
        full_file_path: &Utf8Path,
        svn_dir: &Utf8Path,
    ) -> Result<(Utf8PathBuf, RelativePath), FetchError> {
        let not_found = |reason: NotFoundReason| {
            FetchError::not_found(VcsName::Svn, full_file_path, reason)
        };

        let relative_path = resolve_relative_path(full_file_path, svn_dir)
            .ok_or_else(|| not_found(NotFoundReason::OutsideRepository))?;

        let wc_db = svn_dir.join(WC_DB);
        let pristine_path = if wc_db.is_file() {
            self.locate_in_wc_db(
                full_file_path,
                svn_dir,
                &wc_db,
                &relative_path,
            )?
        } else {
            let file_name = relative_path
                .file_name()
                .ok_or_else(|| not_found(NotFoundReason::NotTracked))?;
            debug!(%svn_dir, file_name, "using text-base layout");
            svn_dir
                .join(TEXT_BASE_DIR)
                .join(format!("{file_name}{PRISTINE_SUFFIX}"))
        };

        if !pristine_path.is_file() {
            debug!(%pristine_path, "pristine file does not exist");
            return Err(not_found(NotFoundReason::MissingPristineFile));
        }
        Ok((pristine_path, relative_path))
    }

    fn locate_in_wc_db(
        &self,
        full_file_path: &Utf8Path,
        svn_dir: &Utf8Path,
        wc_db: &Utf8Path,
        relative_path: &RelativePath,
    ) -> Result<Utf8PathBuf, FetchError> {
        ensure_sqlite()?;
        debug!(%wc_db, %relative_path, "looking up checksum in wc.db");

        let access = |error: StoreAccessError| {
            FetchError::store_access(VcsName::Svn, full_file_path, error)
        };
        // The connection is closed at the end of this block, before any
        // filesystem probing.
        let checksum = {
            let conn = self.store.open(wc_db).map_err(access)?;
            conn.checksum(relative_path).map_err(access)?
        };

        let not_found = |reason: NotFoundReason| {
            FetchError::not_found(VcsName::Svn, full_file_path, reason)
        };
        let checksum =
            checksum.ok_or_else(|| not_found(NotFoundReason::NotTracked))?;
        if checksum.is_empty() {
            return Err(not_found(NotFoundReason::NoChecksum));
        }
        let checksum: ContentChecksum = checksum.parse().map_err(|error| {
            access(StoreAccessError::MalformedChecksum { checksum, error })
        })?;

        Ok(svn_dir
            .join(PRISTINE_DIR)
            .join(checksum.fan_out())
            .join(format!("{}{PRISTINE_SUFFIX}", checksum.digest())))
    }
}

impl<S: WcDbStore> FetchPristine for SvnFetcher<S> {
    fn vcs_name(&self) -> VcsName {
        VcsName::Svn
    }

    /// Finds the nearest `.svn` directory above `full_file_path` and reads
    /// the pristine copy through it.
    fn fetch_pristine(
        &self,
        full_file_path: &Utf8Path,
    ) -> Result<PristineBlob, FetchError> {
        let access = |error: LocateError| {
            FetchError::store_access(VcsName::Svn, full_file_path, error)
        };
        let file = absolute_utf8(full_file_path).map_err(access)?;
        let start_dir = file.parent().unwrap_or(&file);
        let svn_dir = locate_dir_up(SVN_DIR, start_dir)
            .map_err(access)?
            .ok_or_else(|| {
                FetchError::not_found(
                    VcsName::Svn,
                    full_file_path,
                    NotFoundReason::NoMetadataDir,
                )
            })?;
        self.fetch_with_metadata_dir(&file, &svn_dir)
    }
}
