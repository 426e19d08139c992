// Copyright 2026 Oxide Computer Company

//! Process-wide, one-time readiness checks for the store engines.

use crate::StoreUnavailableError;
use std::{fmt, sync::OnceLock};
use tracing::{debug, error};

/// The first SQLite release able to read a Subversion 1.7 `wc.db`.
const MIN_SQLITE_VERSION: i32 = 3_006_018;

static SQLITE: OnceLock<Result<(), StoreUnavailableError>> = OnceLock::new();
static GIT: OnceLock<Result<(), StoreUnavailableError>> = OnceLock::new();

/// A storage engine used to read VCS metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreEngine {
    /// SQLite, for Subversion 1.7+ working-copy databases.
    Sqlite,
    /// libgit2, for Git repositories.
    Git,
}

impl fmt::Display for StoreEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreEngine::Sqlite => write!(f, "SQLite"),
            StoreEngine::Git => write!(f, "libgit2"),
        }
    }
}

/// Checks, once per process, that the linked SQLite can read `wc.db`.
pub(crate) fn ensure_sqlite() -> Result<(), StoreUnavailableError> {
    SQLITE
        .get_or_init(|| {
            report(check_sqlite(rusqlite::version_number(), rusqlite::version()))
        })
        .clone()
}

/// Checks, once per process, that libgit2 is usable from any thread.
pub(crate) fn ensure_git() -> Result<(), StoreUnavailableError> {
    GIT.get_or_init(|| report(check_git(git2::Version::get()))).clone()
}

fn check_sqlite(
    version_number: i32,
    version: &str,
) -> Result<(), StoreUnavailableError> {
    if version_number < MIN_SQLITE_VERSION {
        return Err(StoreUnavailableError {
            engine: StoreEngine::Sqlite,
            reason: format!(
                "linked SQLite {version} is too old to read wc.db \
                 (need 3.6.18 or newer)"
            ),
        });
    }
    debug!(version, "SQLite engine ready");
    Ok(())
}

fn check_git(version: git2::Version) -> Result<(), StoreUnavailableError> {
    check_git_threads(version.threads(), version.libgit2_version())
}

fn check_git_threads(
    threads: bool,
    (major, minor, rev): (u32, u32, u32),
) -> Result<(), StoreUnavailableError> {
    if !threads {
        return Err(StoreUnavailableError {
            engine: StoreEngine::Git,
            reason: format!(
                "libgit2 {major}.{minor}.{rev} was built without thread \
                 support"
            ),
        });
    }
    debug!(
        version = %format_args!("{major}.{minor}.{rev}"),
        "libgit2 engine ready"
    );
    Ok(())
}

/// Runs inside `get_or_init`, so a failure is reported exactly once.
fn report(
    result: Result<(), StoreUnavailableError>,
) -> Result<(), StoreUnavailableError> {
    if let Err(err) = &result {
        error!(
            engine = %err.engine,
            reason = %err.reason,
            "store engine unavailable"
        );
    }
    result
}
