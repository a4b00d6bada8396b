use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Command running from an empty working directory, logging into it.
fn cmd(workdir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("dir-indexer");
    cmd.current_dir(workdir.path())
        .env("LOG_FILE_PATH", workdir.path().join("test.log"))
        .env("TRACING_LEVEL", "warn")
        .env("NO_COLOR", "1");
    cmd
}

/// Layout:
///   root/
///     a.txt            (10 bytes)
///     sub/
///       b.txt          (20 bytes)
///       deep/
///         c.log        (5 bytes)
fn create_test_tree(root: &Path) {
    fs::create_dir_all(root.join("sub").join("deep")).unwrap();
    fs::write(root.join("a.txt"), vec![b'a'; 10]).unwrap();
    fs::write(root.join("sub").join("b.txt"), vec![b'b'; 20]).unwrap();
    fs::write(root.join("sub").join("deep").join("c.log"), vec![b'c'; 5]).unwrap();
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    let work = tempdir().unwrap();
    cmd(&work)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("index"))
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("search"));
}

#[test]
fn test_index_small_tree_writes_json_report() {
    let work = tempdir().unwrap();
    let src = tempdir().unwrap();
    create_test_tree(src.path());

    cmd(&work)
        .arg("index")
        .arg(src.path())
        .args(["-o", "report"])
        .assert()
        .success();

    assert!(work.path().join("report.json").exists());
    assert!(!work.path().join("report.db").exists());
}

#[test]
fn test_index_db_then_browse_and_search_store() {
    let work = tempdir().unwrap();
    let src = tempdir().unwrap();
    create_test_tree(src.path());

    cmd(&work)
        .arg("index")
        .arg(src.path())
        .args(["-o", "report", "--db"])
        .assert()
        .success();
    let store = work.path().join("report.db");
    assert!(store.exists());

    let listing = stdout_of(cmd(&work).arg("browse").arg(&store).arg("sub"));
    let deep = listing.find("deep/").expect("folder listed");
    let b = listing.find("b.txt").expect("file listed");
    assert!(deep < b, "folders come first:\n{}", listing);
    assert!(listing.contains("Showing 1-2 of 2"));

    let hits = stdout_of(cmd(&work).arg("search").arg(&store).arg("C.L"));
    assert!(hits.contains("/sub/deep"));
    assert!(hits.contains("c.log"));
    assert!(hits.contains("1 matches"));
}

#[test]
fn test_files_table_filters_by_extension_across_folders() {
    let work = tempdir().unwrap();
    let src = tempdir().unwrap();
    create_test_tree(src.path());
    cmd(&work)
        .arg("index")
        .arg(src.path())
        .args(["-o", "report", "--db"])
        .assert()
        .success();

    let table = stdout_of(
        cmd(&work)
            .arg("files")
            .arg(work.path().join("report.db"))
            .args(["--ext", ".TXT", "--sort", "size", "--desc"]),
    );
    let b = table.find("sub/b.txt").expect("nested file listed");
    let a = table.find("a.txt").expect("root file listed");
    assert!(b < a, "20 bytes sort above 10:\n{}", table);
    assert!(!table.contains("c.log"));
    assert!(table.contains("Showing 1-2 of 2 files"));
}

#[test]
fn test_index_empty_directory_writes_nothing() {
    let work = tempdir().unwrap();
    let src = tempdir().unwrap();
    fs::create_dir_all(src.path().join("only-folders")).unwrap();

    cmd(&work)
        .arg("index")
        .arg(src.path())
        .args(["-o", "report"])
        .assert()
        .success();

    assert!(!work.path().join("report.json").exists());
    assert!(!work.path().join("report.db").exists());
}

#[test]
fn test_browse_directory_in_memory() {
    let work = tempdir().unwrap();
    let src = tempdir().unwrap();
    create_test_tree(src.path());

    let listing = stdout_of(
        cmd(&work)
            .arg("browse")
            .arg(src.path())
            .args(["--sort", "size", "--desc", "--mixed"]),
    );
    let sub = listing.find("sub/").expect("folder listed");
    let a = listing.find("a.txt").expect("file listed");
    assert!(sub < a, "25 bytes of sub sort above a.txt:\n{}", listing);
}

#[test]
fn test_browse_unknown_folder_fails() {
    let work = tempdir().unwrap();
    let src = tempdir().unwrap();
    create_test_tree(src.path());

    cmd(&work)
        .arg("browse")
        .arg(src.path())
        .arg("nope")
        .assert()
        .failure();
}

#[test]
fn test_browse_rejects_unknown_sort_column() {
    let work = tempdir().unwrap();
    let src = tempdir().unwrap();

    cmd(&work)
        .arg("browse")
        .arg(src.path())
        .args(["--sort", "owner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown sort column"));
}

#[test]
fn test_index_missing_root_fails() {
    let work = tempdir().unwrap();

    cmd(&work)
        .arg("index")
        .arg(work.path().join("missing"))
        .assert()
        .failure();

    assert!(!work.path().join("dir-index.json").exists());
}

#[test]
fn test_oversized_embedding_needs_confirmation() {
    let work = tempdir().unwrap();
    let src = tempdir().unwrap();
    create_test_tree(src.path());

    cmd(&work)
        .env("DIR_INDEXER__MODE__RELATIONAL_THRESHOLD", "1")
        .arg("index")
        .arg(src.path())
        .args(["-o", "report", "--embedded"])
        .write_stdin("n\n")
        .assert()
        .failure();
    assert!(!work.path().join("report.json").exists());

    cmd(&work)
        .env("DIR_INDEXER__MODE__RELATIONAL_THRESHOLD", "1")
        .arg("index")
        .arg(src.path())
        .args(["-o", "report", "--embedded", "-y"])
        .assert()
        .success();
    assert!(work.path().join("report.json").exists());
}

#[test]
fn test_threshold_from_environment_selects_store() {
    let work = tempdir().unwrap();
    let src = tempdir().unwrap();
    create_test_tree(src.path());

    cmd(&work)
        .env("DIR_INDEXER__MODE__RELATIONAL_THRESHOLD", "2")
        .arg("index")
        .arg(src.path())
        .args(["-o", "report"])
        .assert()
        .success();

    assert!(work.path().join("report.db").exists());
}

#[test]
fn test_stats_on_store() {
    let work = tempdir().unwrap();
    let src = tempdir().unwrap();
    create_test_tree(src.path());
    cmd(&work)
        .arg("index")
        .arg(src.path())
        .args(["-o", "report", "--db"])
        .assert()
        .success();

    cmd(&work)
        .arg("stats")
        .arg(work.path().join("report.db"))
        .assert()
        .success()
        .stdout(predicate::str::contains("3 files"))
        .stdout(predicate::str::contains(".txt"))
        .stdout(predicate::str::contains("sub/b.txt"));
}

#[test]
fn test_print_config_shows_defaults() {
    let work = tempdir().unwrap();

    cmd(&work)
        .arg("print-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("relational_threshold: 200000"));
}
