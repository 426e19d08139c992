// Copyright 2026 Oxide Computer Company

//! Exporting pristine content to files a diff tool can open.

use crate::{FetchPristine, MaterializeError, Vcs, errors::AtomicWriteError};
use atomicwrites::AtomicFile;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::io::Write;
use tracing::debug;

/// Writes pristine copies of working-copy files into an output directory.
///
/// Each copy lands at `<output_dir>/<path relative to its repository>`, so
/// files from one repository never collide. Only the output directory is
/// written; the repository and working copy are left untouched.
#[derive(Debug, Clone)]
pub struct Materializer {
    output_dir: Utf8PathBuf,
    vcs: Option<Vcs>,
}

impl Materializer {
    /// Creates a new materializer writing under `output_dir`.
    ///
    /// `output_dir` is relative to the current working directory. (It is
    /// also allowed to be absolute.) The VCS is chosen per file with
    /// [`Vcs::for_file`] unless overridden with
    /// [`with_vcs`](Self::with_vcs).
    pub fn new(output_dir: impl Into<Utf8PathBuf>) -> Self {
        Materializer { output_dir: output_dir.into(), vcs: None }
    }

    /// Overrides per-file VCS detection.
    pub fn with_vcs(mut self, vcs: Vcs) -> Self {
        self.vcs = Some(vcs);
        self
    }

    /// Returns the VCS override, if any.
    pub fn vcs(&self) -> Option<&Vcs> {
        self.vcs.as_ref()
    }

    /// Returns the output directory.
    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }

    /// Fetches the pristine copy of `full_file_path` and writes it under
    /// the output directory.
    ///
    /// Returns the path to the written file.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// let materializer = pristine_vcs::Materializer::new("/tmp/pristine");
    /// let pristine_path = materializer
    ///     .materialize("/work/repo/src/foo.c")
    ///     .expect("pristine copy written");
    /// assert_eq!(pristine_path, "/tmp/pristine/src/foo.c");
    /// ```
    pub fn materialize(
        &self,
        full_file_path: impl AsRef<Utf8Path>,
    ) -> Result<Utf8PathBuf, MaterializeError> {
        let full_file_path = full_file_path.as_ref();

        let blob = match &self.vcs {
            Some(vcs) => vcs.fetch_pristine(full_file_path)?,
            None => {
                Vcs::for_file(full_file_path)?.fetch_pristine(full_file_path)?
            }
        };

        let output_path = self.output_dir.join(blob.relative_path().as_path());
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                MaterializeError::CreateDir { path: parent.to_owned(), error }
            })?;
        }

        AtomicFile::new(
            &output_path,
            atomicwrites::OverwriteBehavior::AllowOverwrite,
        )
        .write(|f| f.write_all(blob.as_bytes()))
        .map_err(|error| {
            let error = match error {
                atomicwrites::Error::Internal(e) => AtomicWriteError::Rename(e),
                atomicwrites::Error::User(e) => AtomicWriteError::Write(e),
            };
            MaterializeError::WriteOutput { path: output_path.clone(), error }
        })?;

        debug!(
            path = %full_file_path,
            %output_path,
            len = blob.len(),
            "wrote pristine copy"
        );
        Ok(output_path)
    }
}

// Tests are in tests/integration/materialize.rs.
