// Copyright 2026 Oxide Computer Company

//! Upward search for VCS metadata directories.

use crate::LocateError;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use tracing::debug;

/// Searches `start_dir` and then each of its ancestors for a directory named
/// `dir_name` (e.g. `.svn`), returning the first one found.
///
/// `start_dir` is made absolute against the current directory and
/// normalized lexically (`.` and `..` folded), so the search only ever
/// ascends parent links. The filesystem root is checked last. Ancestors
/// that cannot be read are treated as not containing `dir_name`.
///
/// Returns `Ok(None)` if no ancestor contains `dir_name`.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use pristine_vcs::locate_dir_up;
///
/// let svn_dir = locate_dir_up(".svn", Utf8Path::new("/work/repo/src"))
///     .expect("start directory is valid UTF-8");
/// ```
pub fn locate_dir_up(
    dir_name: &str,
    start_dir: &Utf8Path,
) -> Result<Option<Utf8PathBuf>, LocateError> {
    locate_up(dir_name, start_dir, |candidate| candidate.is_dir())
}

/// Like [`locate_dir_up`], but also accepts a plain file named `dir_name`.
///
/// Git worktrees and submodules use a `.git` file pointing elsewhere.
pub(crate) fn locate_entry_up(
    name: &str,
    start_dir: &Utf8Path,
) -> Result<Option<Utf8PathBuf>, LocateError> {
    locate_up(name, start_dir, |candidate| candidate.exists())
}

fn locate_up(
    name: &str,
    start_dir: &Utf8Path,
    matches: impl Fn(&Utf8Path) -> bool,
) -> Result<Option<Utf8PathBuf>, LocateError> {
    let start_dir = absolute_utf8(start_dir)?;
    for dir in start_dir.ancestors() {
        let candidate = dir.join(name);
        if matches(&candidate) {
            debug!(%candidate, "found metadata directory");
            return Ok(Some(candidate));
        }
    }
    debug!(name, %start_dir, "no metadata directory in any ancestor");
    Ok(None)
}

/// Makes `path` absolute and folds `.` and `..` components lexically.
///
/// Symlinks are not resolved.
pub(crate) fn absolute_utf8(
    path: &Utf8Path,
) -> Result<Utf8PathBuf, LocateError> {
    let absolute = if path.is_absolute() {
        path.to_owned()
    } else {
        let absolute = std::path::absolute(path).map_err(|source| {
            LocateError::Absolute { path: path.to_owned(), source }
        })?;
        Utf8PathBuf::try_from(absolute).map_err(|err| LocateError::NonUtf8 {
            path: err.into_path_buf(),
        })?
    };

    let mut normalized = Utf8PathBuf::new();
    for component in absolute.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                // Popping past the root leaves the root in place.
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

/// Resolves symlinks in the directory part of an absolute `file` path,
/// keeping the final component as given.
///
/// Falls back to `file` unchanged if the directory cannot be canonicalized
/// (for instance, because it was deleted).
pub(crate) fn resolve_parent_symlinks(file: &Utf8Path) -> Utf8PathBuf {
    let (Some(parent), Some(file_name)) = (file.parent(), file.file_name())
    else {
        return file.to_owned();
    };
    match parent.canonicalize_utf8() {
        Ok(parent) => parent.join(file_name),
        Err(error) => {
            debug!(%parent, %error, "cannot resolve symlinks, using path as is");
            file.to_owned()
        }
    }
}
