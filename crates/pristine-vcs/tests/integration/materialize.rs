// Copyright 2026 Oxide Computer Company

//! Materializer tests.

use crate::fixtures::{
    SHA1_A, add_svn_node, init_git_repo, init_svn_wc, stage_file, temp_dir,
    write_file, write_svn_pristine,
};
use anyhow::Result;
use pristine_vcs::{
    FetchError, MaterializeError, Materializer, NotFoundReason, Vcs,
    VcsDetectError,
};
use std::fs;

#[test]
fn test_materialize_git_file() -> Result<()> {
    let (_temp, root) = temp_dir("pristine-materialize-")?;
    let repo_root = root.join("repo");
    fs::create_dir_all(&repo_root)?;
    let repo = init_git_repo(&repo_root)?;
    let file = stage_file(&repo, &repo_root, "src/foo.c", "pristine\n")?;
    fs::write(&file, "modified\n")?;

    let output_dir = root.join("out");
    let materializer = Materializer::new(&output_dir).with_vcs(Vcs::git());
    let output_path = materializer.materialize(&file)?;

    assert_eq!(output_path, output_dir.join("src/foo.c"));
    assert_eq!(fs::read_to_string(&output_path)?, "pristine\n");
    assert_eq!(fs::read_to_string(&file)?, "modified\n");
    Ok(())
}

#[test]
fn test_materialize_svn_file_detected() -> Result<()> {
    let (_temp, root) = temp_dir("pristine-materialize-")?;
    let wc = root.join("wc");
    let svn_dir = init_svn_wc(&wc)?;
    add_svn_node(&svn_dir, "docs/notes.txt", Some(SHA1_A))?;
    write_svn_pristine(&svn_dir, SHA1_A, "notes\n")?;
    let file = write_file(&wc, "docs/notes.txt", "notes, edited\n")?;

    let output_dir = root.join("out");
    let materializer = Materializer::new(&output_dir);
    assert!(materializer.vcs().is_none());
    let output_path = materializer.materialize(&file)?;

    assert_eq!(output_path, output_dir.join("docs/notes.txt"));
    assert_eq!(fs::read_to_string(&output_path)?, "notes\n");
    Ok(())
}

#[test]
fn test_materialize_overwrites_existing_output() -> Result<()> {
    let (_temp, root) = temp_dir("pristine-materialize-")?;
    let repo_root = root.join("repo");
    fs::create_dir_all(&repo_root)?;
    let repo = init_git_repo(&repo_root)?;
    let file = stage_file(&repo, &repo_root, "a.txt", "fresh\n")?;

    let output_dir = root.join("out");
    write_file(&output_dir, "a.txt", "stale\n")?;

    let output_path =
        Materializer::new(&output_dir).with_vcs(Vcs::git()).materialize(&file)?;
    assert_eq!(fs::read_to_string(&output_path)?, "fresh\n");
    Ok(())
}

#[test]
fn test_materialize_untracked_file() -> Result<()> {
    let (_temp, root) = temp_dir("pristine-materialize-")?;
    let repo_root = root.join("repo");
    fs::create_dir_all(&repo_root)?;
    init_git_repo(&repo_root)?;
    let file = write_file(&repo_root, "new.txt", "new\n")?;

    let output_dir = root.join("out");
    let error = Materializer::new(&output_dir)
        .with_vcs(Vcs::git())
        .materialize(&file)
        .expect_err("untracked file has no pristine copy");
    assert!(
        matches!(
            &error,
            MaterializeError::Fetch(FetchError::NotFound {
                reason: NotFoundReason::NotTracked,
                ..
            })
        ),
        "unexpected error: {error:?}"
    );
    assert!(!output_dir.exists(), "nothing is written on failure");
    Ok(())
}

#[test]
fn test_materialize_without_vcs() -> Result<()> {
    let (_temp, root) = temp_dir("pristine-materialize-")?;
    let file = write_file(&root, "loose.txt", "loose\n")?;

    let error = Materializer::new(root.join("out"))
        .materialize(&file)
        .expect_err("no VCS above the file");
    assert!(
        matches!(
            error,
            MaterializeError::VcsDetect(VcsDetectError::NotFound { .. })
        ),
        "unexpected error: {error:?}"
    );
    Ok(())
}
