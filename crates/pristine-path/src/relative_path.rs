// Copyright 2026 Oxide Computer Company

//! Repository-relative paths, and resolving them from absolute paths.

use crate::RelativePathError;
use camino::Utf8Path;
use std::{fmt, str::FromStr};

/// A file's location relative to its repository root, in the convention VCS
/// stores use for lookups.
///
/// Construct via [`RelativePath::new`], [`FromStr`], or
/// [`resolve_relative_path`].
///
/// # Invariants
///
/// - Separators are forward slashes (backslashes are normalized on
///   construction).
/// - There is no leading separator.
/// - Every component is a plain file or directory name (no `.`, `..`, or
///   empty components).
///
/// The empty path is valid: it names the repository root itself.
///
/// # Examples
///
/// ```
/// use pristine_path::RelativePath;
///
/// let path = RelativePath::new("src\\foo.c").unwrap();
/// assert_eq!(path.as_str(), "src/foo.c");
/// assert_eq!(path.file_name(), Some("foo.c"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelativePath(String);

impl RelativePath {
    /// Creates a new `RelativePath`, normalizing backslashes to forward
    /// slashes.
    ///
    /// Returns an error if the path starts with a separator, contains a
    /// NUL byte, or has any component that is not a plain name.
    pub fn new(path: impl AsRef<str>) -> Result<Self, RelativePathError> {
        let normalized = path.as_ref().replace('\\', "/");
        if normalized.is_empty() {
            return Ok(RelativePath(normalized));
        }
        if normalized.contains('\0') {
            return Err(RelativePathError::NulByte);
        }
        if normalized.starts_with('/') {
            return Err(RelativePathError::LeadingSeparator(normalized));
        }
        if let Some(component) =
            normalized.split('/').find(|c| matches!(*c, "" | "." | ".."))
        {
            let component = component.to_owned();
            return Err(RelativePathError::InvalidComponent {
                path: normalized,
                component,
            });
        }
        Ok(RelativePath(normalized))
    }

    /// Returns the path as a forward-slash string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the path as a [`Utf8Path`].
    pub fn as_path(&self) -> &Utf8Path {
        Utf8Path::new(&self.0)
    }

    /// Returns true if this path names the repository root itself.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the final component, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.0.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Iterates over the path's components.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|c| !c.is_empty())
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RelativePath {
    type Err = RelativePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelativePath::new(s)
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolves `full_file_path` relative to the repository that owns
/// `metadata_dir`.
///
/// `metadata_dir` is the VCS metadata directory itself (e.g. `/repo/.svn` or
/// `/repo/.git/`), so the repository root is taken to be its parent.
///
/// Both paths are normalized first: backslashes become forward slashes,
/// trailing and doubled separators are dropped, and `.` and `..` components
/// are folded lexically. Matching against the repository root is
/// case-sensitive and component-aware, so `/repository/file` is not inside
/// `/repo`.
///
/// Returns `None` if the file is outside the repository. A file path equal
/// to the repository root yields the empty path.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use pristine_path::resolve_relative_path;
///
/// let rel = resolve_relative_path(
///     Utf8Path::new("/work/repo/src/foo.c"),
///     Utf8Path::new("/work/repo/.git/"),
/// )
/// .unwrap();
/// assert_eq!(rel.as_str(), "src/foo.c");
///
/// assert!(
///     resolve_relative_path(
///         Utf8Path::new("/elsewhere/foo.c"),
///         Utf8Path::new("/work/repo/.git"),
///     )
///     .is_none()
/// );
/// ```
pub fn resolve_relative_path(
    full_file_path: &Utf8Path,
    metadata_dir: &Utf8Path,
) -> Option<RelativePath> {
    let mut repo_root = LexicalPath::parse(metadata_dir.as_str());
    // Drop the metadata directory name to get the repository root.
    repo_root.components.pop()?;

    let file = LexicalPath::parse(full_file_path.as_str());
    if file.absolute != repo_root.absolute {
        return None;
    }
    let suffix = file.components.strip_prefix(repo_root.components.as_slice())?;

    RelativePath::new(suffix.join("/")).ok()
}

/// A path split into normalized components.
#[derive(Debug, PartialEq)]
struct LexicalPath<'a> {
    absolute: bool,
    components: Vec<&'a str>,
}

impl<'a> LexicalPath<'a> {
    fn parse(path: &'a str) -> Self {
        let absolute = path.starts_with(['/', '\\']);
        let mut components: Vec<&'a str> = Vec::new();
        for component in path.split(['/', '\\']) {
            match component {
                "" | "." => {}
                ".." => match components.last() {
                    Some(&last) if last != ".." => {
                        components.pop();
                    }
                    // `..` at the root stays at the root.
                    _ if absolute => {}
                    _ => components.push(component),
                },
                _ => components.push(component),
            }
        }
        LexicalPath { absolute, components }
    }
}
