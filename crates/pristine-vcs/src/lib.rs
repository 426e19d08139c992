// Copyright 2026 Oxide Computer Company

//! Read-only retrieval of pristine file content from Subversion and Git
//! working copies.
//!
//! A *pristine* copy is the last-committed version of a file, as recorded by
//! the VCS that manages it. A diff tool can compare a modified working-copy
//! file against it without anyone checking out a reference copy by hand.
//!
//! Lookup happens in three steps:
//!
//! 1. Find the metadata directory (`.svn` or `.git`) that owns the file
//!    ([`locate_dir_up`], or repository discovery for Git).
//! 2. Express the file's path relative to the repository root
//!    ([`pristine_path::resolve_relative_path`]).
//! 3. Query the VCS store: `wc.db` plus the pristine store (or the legacy
//!    `text-base` directory) for Subversion, the index plus the object
//!    database for Git.
//!
//! Every fetch opens its stores, uses them, and releases them before
//! returning. Nothing in the repository or working copy is ever written.
//!
//! # Usage
//!
//! ```no_run
//! use camino::Utf8Path;
//! use pristine_vcs::{FetchPristine, Vcs};
//!
//! let file = Utf8Path::new("/work/repo/src/foo.c");
//! // Honors $PRISTINE_VCS, otherwise picks the nearest .svn or .git.
//! let vcs = Vcs::for_file(file).expect("file is under version control");
//!
//! match vcs.fetch_or_unavailable(file) {
//!     Ok(Some(blob)) => println!("{} pristine bytes", blob.len()),
//!     Ok(None) => println!("no baseline to compare against"),
//!     Err(error) => eprintln!("{error}"),
//! }
//! ```
//!
//! # Exporting pristine copies
//!
//! ```no_run
//! use pristine_vcs::Materializer;
//!
//! let materializer = Materializer::new("/tmp/pristine");
//! let pristine_path = materializer
//!     .materialize("/work/repo/src/foo.c")
//!     .expect("pristine copy written");
//! ```

#![deny(missing_docs)]

mod blob;
mod engine;
mod errors;
mod git;
mod locate;
mod materialize;
pub mod store;
mod svn;
mod vcs;

pub use blob::PristineBlob;
pub use engine::StoreEngine;
pub use errors::{
    AtomicWriteError, FetchError, LocateError, MaterializeError,
    NotFoundReason, StoreAccessError, StoreUnavailableError, VcsDetectError,
    VcsEnvError,
};
pub use git::{GIT_DIR, Git2Store, GitFetcher};
pub use locate::locate_dir_up;
pub use materialize::Materializer;
pub use svn::{SVN_DIR, SqliteWcDb, SvnFetcher};
pub use vcs::{FetchPristine, VCS_ENV_VAR, Vcs, VcsName};
