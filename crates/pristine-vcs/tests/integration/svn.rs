// Copyright 2026 Oxide Computer Company

//! Subversion tests against working copies built with SQLite.

use crate::fixtures::{
    SHA1_A, SHA1_B, add_svn_node, init_svn_wc, temp_dir, write_file,
    write_svn_pristine,
};
use anyhow::Result;
use pristine_vcs::{
    FetchError, FetchPristine, NotFoundReason, SvnFetcher, Vcs, VcsName,
};
use std::fs;

#[test]
fn test_fetch_from_pristine_store() -> Result<()> {
    let (_temp, root) = temp_dir("pristine-svn-")?;
    let svn_dir = init_svn_wc(&root)?;
    add_svn_node(&svn_dir, "src/foo.c", Some(SHA1_A))?;
    write_svn_pristine(&svn_dir, SHA1_A, "int main();\n")?;
    let file = write_file(&root, "src/foo.c", "int main(void);\n")?;

    let fetcher = SvnFetcher::new();
    let pristine_path = fetcher.locate_pristine_file(&file, &svn_dir)?;
    assert_eq!(
        pristine_path,
        svn_dir
            .join("pristine/4b/4b825dc642cb6eb9a060e54bf8d69288fbee4904.svn-base")
    );

    let blob = fetcher.fetch_pristine(&file)?;
    assert_eq!(blob.relative_path().as_str(), "src/foo.c");
    assert_eq!(blob.as_bytes(), b"int main();\n");
    assert_eq!(blob.as_bytes_with_nul(), b"int main();\n\0");
    Ok(())
}

#[test]
fn test_fetch_picks_row_for_file() -> Result<()> {
    let (_temp, root) = temp_dir("pristine-svn-")?;
    let svn_dir = init_svn_wc(&root)?;
    add_svn_node(&svn_dir, "a.txt", Some(SHA1_A))?;
    add_svn_node(&svn_dir, "b.txt", Some(SHA1_B))?;
    write_svn_pristine(&svn_dir, SHA1_A, "a\n")?;
    write_svn_pristine(&svn_dir, SHA1_B, "b\n")?;
    let b = write_file(&root, "b.txt", "b, edited\n")?;

    let blob = SvnFetcher::new().fetch_pristine(&b)?;
    assert_eq!(blob.as_bytes(), b"b\n");
    Ok(())
}

#[test]
fn test_fetch_empty_pristine_file() -> Result<()> {
    let (_temp, root) = temp_dir("pristine-svn-")?;
    let svn_dir = init_svn_wc(&root)?;
    add_svn_node(&svn_dir, "empty.txt", Some(SHA1_A))?;
    write_svn_pristine(&svn_dir, SHA1_A, "")?;
    let file = write_file(&root, "empty.txt", "now has content\n")?;

    let blob = SvnFetcher::new().fetch_pristine(&file)?;
    assert!(blob.is_empty());
    assert_eq!(blob.as_bytes_with_nul(), b"\0");
    Ok(())
}

#[test]
fn test_fetch_not_found_reasons() -> Result<()> {
    let (_temp, root) = temp_dir("pristine-svn-")?;
    let svn_dir = init_svn_wc(&root)?;
    add_svn_node(&svn_dir, "added.txt", None)?;
    add_svn_node(&svn_dir, "lost.txt", Some(SHA1_B))?;
    let fetcher = SvnFetcher::new();

    let cases = [
        ("unversioned.txt", NotFoundReason::NotTracked),
        ("added.txt", NotFoundReason::NoChecksum),
        ("lost.txt", NotFoundReason::MissingPristineFile),
    ];
    for (name, expected) in cases {
        let file = write_file(&root, name, "contents\n")?;
        let error = fetcher
            .fetch_pristine(&file)
            .expect_err("file has no pristine copy");
        assert_eq!(error.not_found_reason(), Some(expected), "for {name}");
        assert!(fetcher.fetch_or_unavailable(&file)?.is_none());
    }
    Ok(())
}

#[test]
fn test_fetch_without_working_copy() -> Result<()> {
    let (_temp, root) = temp_dir("pristine-svn-")?;
    let file = write_file(&root, "loose.txt", "loose\n")?;

    let error = SvnFetcher::new()
        .fetch_pristine(&file)
        .expect_err("no .svn above the file");
    assert_eq!(error.not_found_reason(), Some(NotFoundReason::NoMetadataDir));
    Ok(())
}

#[test]
fn test_fetch_outside_given_working_copy() -> Result<()> {
    let (_temp, root) = temp_dir("pristine-svn-")?;
    let svn_dir = init_svn_wc(&root.join("wc"))?;
    let file = write_file(&root, "elsewhere/foo.c", "foo\n")?;

    let error = SvnFetcher::new()
        .fetch_with_metadata_dir(&file, &svn_dir)
        .expect_err("file is not inside the working copy");
    assert_eq!(
        error.not_found_reason(),
        Some(NotFoundReason::OutsideRepository)
    );
    Ok(())
}

#[test]
fn test_fetch_corrupt_wc_db() -> Result<()> {
    let (_temp, root) = temp_dir("pristine-svn-")?;
    let svn_dir = root.join(".svn");
    fs::create_dir_all(&svn_dir)?;
    fs::write(svn_dir.join("wc.db"), "this is not a database")?;
    let file = write_file(&root, "foo.c", "foo\n")?;

    let fetcher = SvnFetcher::new();
    let error = fetcher
        .fetch_pristine(&file)
        .expect_err("wc.db cannot be queried");
    assert!(
        matches!(error, FetchError::StoreAccess { vcs_name: VcsName::Svn, .. }),
        "unexpected error: {error:?}"
    );
    assert!(fetcher.fetch_or_unavailable(&file)?.is_none());
    Ok(())
}

#[test]
fn test_fetch_malformed_checksum() -> Result<()> {
    let (_temp, root) = temp_dir("pristine-svn-")?;
    let svn_dir = init_svn_wc(&root)?;
    add_svn_node(&svn_dir, "foo.c", Some("$sha1$"))?;
    let file = write_file(&root, "foo.c", "foo\n")?;

    let error = SvnFetcher::new()
        .fetch_pristine(&file)
        .expect_err("checksum has no digest");
    assert!(
        matches!(error, FetchError::StoreAccess { .. }),
        "unexpected error: {error:?}"
    );
    Ok(())
}

#[test]
fn test_fetch_from_text_base() -> Result<()> {
    let (_temp, root) = temp_dir("pristine-svn-")?;
    // Pre-1.7 working copies keep a .svn directory in every directory.
    let svn_dir = root.join("src/.svn");
    write_file(&svn_dir, "text-base/foo.c.svn-base", "int main();\n")?;
    let file = write_file(&root, "src/foo.c", "int main(void);\n")?;
    let other = write_file(&root, "src/bar.c", "bar\n")?;

    let fetcher = SvnFetcher::new();
    let blob = fetcher.fetch_pristine(&file)?;
    assert_eq!(blob.relative_path().as_str(), "foo.c");
    assert_eq!(blob.as_bytes(), b"int main();\n");

    let error = fetcher
        .fetch_pristine(&other)
        .expect_err("no text-base for bar.c");
    assert_eq!(
        error.not_found_reason(),
        Some(NotFoundReason::MissingPristineFile)
    );
    Ok(())
}

#[test]
fn test_detect_nearest_metadata_dir() -> Result<()> {
    let (_temp, root) = temp_dir("pristine-svn-")?;
    // An svn checkout nested inside a git repository.
    crate::fixtures::init_git_repo(&root)?;
    let svn_dir = init_svn_wc(&root.join("vendor/lib"))?;
    add_svn_node(&svn_dir, "lib.c", Some(SHA1_A))?;
    write_svn_pristine(&svn_dir, SHA1_A, "lib\n")?;
    let file = write_file(&root, "vendor/lib/lib.c", "lib, edited\n")?;

    let vcs = Vcs::detect(&file)?;
    assert_eq!(vcs.name(), VcsName::Svn);
    assert_eq!(vcs.fetch_pristine(&file)?.as_bytes(), b"lib\n");

    let outer = write_file(&root, "top.txt", "top\n")?;
    assert_eq!(Vcs::detect(&outer)?.name(), VcsName::Git);
    Ok(())
}
