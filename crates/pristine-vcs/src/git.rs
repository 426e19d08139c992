// Copyright 2026 Oxide Computer Company

//! Pristine content from the Git index.

use crate::{
    FetchError, FetchPristine, NotFoundReason, PristineBlob, StoreAccessError,
    VcsName,
    engine::ensure_git,
    locate::{absolute_utf8, resolve_parent_symlinks},
    store::{GitBlob, GitIndex, GitRepo, GitStore},
};
use camino::{Utf8Path, Utf8PathBuf};
use git2::{ErrorCode, Oid, Repository};
use pristine_path::{RelativePath, resolve_relative_path};
use std::path::Path;
use tracing::debug;

/// The Git metadata directory name.
pub const GIT_DIR: &str = ".git";

/// Opens repositories with libgit2.
#[derive(Clone, Copy, Debug, Default)]
pub struct Git2Store;

impl GitStore for Git2Store {
    type Repo = Repository;

    fn discover(
        &self,
        start_dir: &Utf8Path,
    ) -> Result<Option<Repository>, StoreAccessError> {
        match Repository::discover(start_dir) {
            Ok(repo) => Ok(Some(repo)),
            Err(error) if error.code() == ErrorCode::NotFound => Ok(None),
            Err(error) => Err(StoreAccessError::Git {
                operation: "open repository",
                error,
            }),
        }
    }
}

impl GitRepo for Repository {
    type Index = git2::Index;
    type Blob<'repo>
        = git2::Blob<'repo>
    where
        Self: 'repo;

    fn metadata_dir(&self) -> Result<Utf8PathBuf, StoreAccessError> {
        // Linked worktrees and submodules keep their metadata elsewhere, so
        // anchor on the working tree when there is one.
        let dir = match self.workdir() {
            Some(workdir) => workdir.join(GIT_DIR),
            None => self.path().to_owned(),
        };
        Utf8PathBuf::from_path_buf(dir)
            .map_err(|path| StoreAccessError::NonUtf8Path { path })
    }

    fn index(&self) -> Result<git2::Index, StoreAccessError> {
        Repository::index(self).map_err(|error| StoreAccessError::Git {
            operation: "open index",
            error,
        })
    }

    fn find_blob(&self, id: Oid) -> Result<git2::Blob<'_>, StoreAccessError> {
        Repository::find_blob(self, id).map_err(|error| StoreAccessError::Git {
            operation: "load blob",
            error,
        })
    }
}

impl GitIndex for git2::Index {
    fn blob_id(&self, path: &RelativePath) -> Option<Oid> {
        self.get_path(Path::new(path.as_str()), 0).map(|entry| entry.id)
    }
}

impl GitBlob for git2::Blob<'_> {
    fn content(&self) -> &[u8] {
        git2::Blob::content(self)
    }
}

/// Reads pristine content from the staged Git index.
///
/// The repository is discovered upward from the file's directory, the file
/// is looked up in the index by its repository-relative path, and the
/// staged blob is copied out of the object database. Repository, index, and
/// blob handles are released before returning.
///
/// A staged blob with no content is reported as
/// [`NotFoundReason::EmptyBlob`] rather than as an empty [`PristineBlob`].
#[derive(Clone, Debug, Default)]
pub struct GitFetcher<S = Git2Store> {
    store: S,
}

impl GitFetcher {
    /// Creates a fetcher backed by libgit2.
    pub fn new() -> Self {
        GitFetcher { store: Git2Store }
    }
}

impl<S: GitStore> GitFetcher<S> {
    /// Creates a fetcher that opens repositories through `store`.
    pub fn with_store(store: S) -> Self {
        GitFetcher { store }
    }
}

impl<S: GitStore> FetchPristine for GitFetcher<S> {
    fn vcs_name(&self) -> VcsName {
        VcsName::Git
    }

    fn fetch_pristine(
        &self,
        full_file_path: &Utf8Path,
    ) -> Result<PristineBlob, FetchError> {
        ensure_git()?;

        let access = |error: StoreAccessError| {
            FetchError::store_access(VcsName::Git, full_file_path, error)
        };
        let not_found = |reason: NotFoundReason| {
            FetchError::not_found(VcsName::Git, full_file_path, reason)
        };

        // libgit2 reports the working tree with symlinks resolved.
        let file = resolve_parent_symlinks(
            &absolute_utf8(full_file_path).map_err(|e| access(e.into()))?,
        );
        let start_dir = file.parent().unwrap_or(&file);
        let repo = self
            .store
            .discover(start_dir)
            .map_err(access)?
            .ok_or_else(|| not_found(NotFoundReason::NotARepository))?;

        let metadata_dir = repo.metadata_dir().map_err(access)?;
        let relative_path = resolve_relative_path(&file, &metadata_dir)
            .ok_or_else(|| not_found(NotFoundReason::OutsideRepository))?;
        debug!(%metadata_dir, %relative_path, "looking up path in git index");

        let id = {
            let index = repo.index().map_err(access)?;
            index.blob_id(&relative_path)
        }
        .ok_or_else(|| not_found(NotFoundReason::NotTracked))?;

        let blob = repo.find_blob(id).map_err(access)?;
        let content = blob.content();
        if content.is_empty() {
            return Err(not_found(NotFoundReason::EmptyBlob));
        }
        Ok(PristineBlob::new(relative_path, content))
    }
}
