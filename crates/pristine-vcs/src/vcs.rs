// Copyright 2026 Oxide Computer Company

//! Selecting a version control system and fetching pristine content
//! through it.

use crate::{
    FetchError, GitFetcher, PristineBlob, StoreUnavailableError, SvnFetcher,
    VcsDetectError, VcsEnvError,
    git::GIT_DIR,
    locate::{locate_dir_up, locate_entry_up},
    svn::SVN_DIR,
};
use camino::Utf8Path;
use std::fmt;
use tracing::{debug, warn};

/// The environment variable that overrides VCS detection.
pub const VCS_ENV_VAR: &str = "PRISTINE_VCS";

/// Reads the VCS override from `var`.
///
/// Returns `Ok(None)` if the variable is unset, empty, or only whitespace.
/// The value is trimmed and matched case-insensitively.
fn read_vcs_env(var: &'static str) -> Result<Option<VcsName>, VcsEnvError> {
    match std::env::var(var) {
        Ok(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else if trimmed.eq_ignore_ascii_case("svn") {
                Ok(Some(VcsName::Svn))
            } else if trimmed.eq_ignore_ascii_case("git") {
                Ok(Some(VcsName::Git))
            } else {
                Err(VcsEnvError::Invalid { var, value: trimmed.to_owned() })
            }
        }
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(value)) => {
            Err(VcsEnvError::NonUtf8 { var, value })
        }
    }
}

/// The name of a version control system.
///
/// Used in error messages and for identifying which VCS is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum VcsName {
    /// Subversion, either layout.
    Svn,
    /// Git.
    Git,
}

impl fmt::Display for VcsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VcsName::Svn => write!(f, "svn"),
            VcsName::Git => write!(f, "git"),
        }
    }
}

/// Fetches the pristine (last-committed) content of a working-copy file.
///
/// Implemented by [`SvnFetcher`], [`GitFetcher`], and [`Vcs`]. Every call
/// opens its stores from scratch and releases them before returning, so a
/// fetcher can be shared freely and no handle outlives a call.
pub trait FetchPristine {
    /// Returns the VCS this fetcher reads.
    fn vcs_name(&self) -> VcsName;

    /// Fetches the pristine content of `full_file_path`.
    ///
    /// Relative paths are resolved against the current directory.
    fn fetch_pristine(
        &self,
        full_file_path: &Utf8Path,
    ) -> Result<PristineBlob, FetchError>;

    /// Fetches the pristine content of `full_file_path`, treating every
    /// failure other than an unavailable engine as "no baseline".
    ///
    /// Store access errors are logged at `warn` level so they stay
    /// traceable; ordinary not-found outcomes are logged at `debug`.
    fn fetch_or_unavailable(
        &self,
        full_file_path: &Utf8Path,
    ) -> Result<Option<PristineBlob>, StoreUnavailableError> {
        match self.fetch_pristine(full_file_path) {
            Ok(blob) => Ok(Some(blob)),
            Err(FetchError::NotFound { vcs_name, reason, .. }) => {
                debug!(
                    path = %full_file_path,
                    %vcs_name,
                    %reason,
                    "no pristine copy"
                );
                Ok(None)
            }
            Err(FetchError::StoreAccess { vcs_name, error, .. }) => {
                warn!(
                    path = %full_file_path,
                    %vcs_name,
                    error = &error as &(dyn std::error::Error + 'static),
                    "failed to read VCS metadata"
                );
                Ok(None)
            }
            Err(FetchError::StoreUnavailable(error)) => Err(error),
        }
    }
}

/// The version control system used to fetch pristine content.
///
/// Use [`Vcs::svn()`], [`Vcs::git()`], [`Vcs::detect()`], or
/// [`Vcs::for_file()`].
#[derive(Debug, Clone)]
pub struct Vcs(VcsKind);

/// The internal representation of a VCS.
#[derive(Debug, Clone)]
enum VcsKind {
    Svn(SvnFetcher),
    Git(GitFetcher),
}

impl Vcs {
    /// Creates a Subversion VCS.
    pub fn svn() -> Self {
        Vcs(VcsKind::Svn(SvnFetcher::new()))
    }

    /// Creates a Git VCS.
    pub fn git() -> Self {
        Vcs(VcsKind::Git(GitFetcher::new()))
    }

    /// Creates the VCS named by the `$PRISTINE_VCS` environment variable.
    ///
    /// Returns `Ok(None)` if the variable is unset or empty, and an error if
    /// it is not valid UTF-8 or names an unsupported VCS.
    pub fn from_env() -> Result<Option<Self>, VcsEnvError> {
        Ok(read_vcs_env(VCS_ENV_VAR)?.map(Self::from_name))
    }

    /// Detects the VCS that manages `full_file_path`.
    ///
    /// Searches upward from the file's directory for `.svn` and `.git`,
    /// and picks whichever is nearest to the file. (`.git` may be a
    /// directory or a file, as in worktrees and submodules.)
    pub fn detect(full_file_path: &Utf8Path) -> Result<Self, VcsDetectError> {
        let start_dir = full_file_path.parent().unwrap_or(full_file_path);
        // An empty parent means a bare file name in the current directory.
        let start_dir = if start_dir.as_str().is_empty() {
            Utf8Path::new(".")
        } else {
            start_dir
        };

        let svn_dir = locate_dir_up(SVN_DIR, start_dir)?;
        let git_dir = locate_entry_up(GIT_DIR, start_dir)?;
        let name = match (svn_dir, git_dir) {
            (Some(svn), Some(git)) => {
                // Both paths are ancestors-plus-one of the same directory, so
                // the longer one is nearer.
                if svn.components().count() >= git.components().count() {
                    VcsName::Svn
                } else {
                    VcsName::Git
                }
            }
            (Some(_), None) => VcsName::Svn,
            (None, Some(_)) => VcsName::Git,
            (None, None) => {
                return Err(VcsDetectError::NotFound {
                    path: full_file_path.to_owned(),
                });
            }
        };
        debug!(path = %full_file_path, vcs = %name, "detected VCS");
        Ok(Self::from_name(name))
    }

    /// Returns the VCS for `full_file_path`: the `$PRISTINE_VCS` override
    /// if set, otherwise the result of [`Vcs::detect`].
    pub fn for_file(full_file_path: &Utf8Path) -> Result<Self, VcsDetectError> {
        match Self::from_env()? {
            Some(vcs) => Ok(vcs),
            None => Self::detect(full_file_path),
        }
    }

    /// Returns the name of the VCS.
    pub fn name(&self) -> VcsName {
        match &self.0 {
            VcsKind::Svn(_) => VcsName::Svn,
            VcsKind::Git(_) => VcsName::Git,
        }
    }

    fn from_name(name: VcsName) -> Self {
        match name {
            VcsName::Svn => Self::svn(),
            VcsName::Git => Self::git(),
        }
    }
}

impl FetchPristine for Vcs {
    fn vcs_name(&self) -> VcsName {
        self.name()
    }

    fn fetch_pristine(
        &self,
        full_file_path: &Utf8Path,
    ) -> Result<PristineBlob, FetchError> {
        match &self.0 {
            VcsKind::Svn(fetcher) => fetcher.fetch_pristine(full_file_path),
            VcsKind::Git(fetcher) => fetcher.fetch_pristine(full_file_path),
        }
    }
}
