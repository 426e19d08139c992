// Copyright 2026 Oxide Computer Company

//! Working-copy fixtures built with the same engines the crate reads.

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use git2::Repository;
use rusqlite::{Connection, params};
use std::fs;

pub const SHA1_A: &str = "$sha1$4b825dc642cb6eb9a060e54bf8d69288fbee4904";
pub const SHA1_B: &str = "$sha1$d670460b4b4aece5915caf5c68d12f560a9fe3e4";

/// Creates a temporary directory, canonicalized so that expected paths in
/// assertions match what the fetchers report.
pub fn temp_dir(prefix: &str) -> Result<(Utf8TempDir, Utf8PathBuf)> {
    let temp = Utf8TempDir::with_prefix(prefix)?;
    let root = temp.path().canonicalize_utf8()?;
    Ok((temp, root))
}

/// Writes `contents` to `root/rel`, creating parent directories.
pub fn write_file(
    root: &Utf8Path,
    rel: &str,
    contents: impl AsRef<[u8]>,
) -> Result<Utf8PathBuf> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents)?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Git
// ---------------------------------------------------------------------------

/// Initializes a git repository and configures the user.
pub fn init_git_repo(root: &Utf8Path) -> Result<Repository> {
    let repo = Repository::init(root)?;
    {
        let mut config = repo.config()?;
        config.set_str("user.email", "test@example.com")?;
        config.set_str("user.name", "Test User")?;
    }
    Ok(repo)
}

/// Writes `contents` to `rel` and stages it. Returns the file's path.
pub fn stage_file(
    repo: &Repository,
    root: &Utf8Path,
    rel: &str,
    contents: &str,
) -> Result<Utf8PathBuf> {
    let path = write_file(root, rel, contents)?;
    let mut index = repo.index()?;
    index.add_path(Utf8Path::new(rel).as_std_path())?;
    index.write()?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Subversion
// ---------------------------------------------------------------------------

/// Creates a 1.7-style `.svn` directory with an empty `nodes_current`
/// table. Returns the `.svn` path.
///
/// Real working copies expose `nodes_current` as a view over `NODES`; only
/// the two columns the lookup reads matter here.
pub fn init_svn_wc(root: &Utf8Path) -> Result<Utf8PathBuf> {
    let svn_dir = root.join(".svn");
    fs::create_dir_all(svn_dir.join("pristine"))?;
    let conn = Connection::open(svn_dir.join("wc.db"))?;
    conn.execute_batch(
        "CREATE TABLE nodes_current (
             local_relpath TEXT NOT NULL,
             checksum TEXT
         );",
    )?;
    Ok(svn_dir)
}

/// Records `relpath` in `wc.db` with the given checksum (`None` for NULL).
pub fn add_svn_node(
    svn_dir: &Utf8Path,
    relpath: &str,
    checksum: Option<&str>,
) -> Result<()> {
    let conn = Connection::open(svn_dir.join("wc.db"))?;
    conn.execute(
        "INSERT INTO nodes_current (local_relpath, checksum) VALUES (?1, ?2)",
        params![relpath, checksum],
    )?;
    Ok(())
}

/// Writes the pristine store entry for `checksum`. Returns its path.
pub fn write_svn_pristine(
    svn_dir: &Utf8Path,
    checksum: &str,
    contents: &str,
) -> Result<Utf8PathBuf> {
    let digest = &checksum[6..];
    write_file(
        svn_dir,
        &format!("pristine/{}/{digest}.svn-base", &digest[..2]),
        contents,
    )
}
