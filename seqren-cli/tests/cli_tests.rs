use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

fn seqren() -> Command {
    let mut cmd = Command::cargo_bin("seqren").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help_command() {
    seqren()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("common prefix"));
}

#[test]
fn test_version_subcommand() {
    seqren()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("seqren 0.1.0"));
}

#[test]
fn test_version_subcommand_json() {
    seqren()
        .args(["version", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"name":"seqren","version":"0.1.0"}"#));
}

#[test]
fn test_rename_vacation_photos() {
    let temp_dir = TempDir::new().unwrap();
    temp_dir.child("IMG_001.jpg").write_str("one").unwrap();
    temp_dir.child("IMG_002.jpg").write_str("two").unwrap();
    temp_dir.child("notes.pdf").write_str("pdf").unwrap();

    seqren()
        .current_dir(temp_dir.path())
        .args(["rename", ".", "--prefix", "Vacation"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Renamed 2 of 2 files with prefix 'Vacation'",
        ))
        .stdout(predicate::str::contains("Skipped 1 files"))
        .stderr(predicate::str::contains("[ 50%] renamed ->"))
        .stderr(predicate::str::contains("[100%] renamed ->"));

    temp_dir.child("Vacation1.jpg").assert("one");
    temp_dir.child("Vacation2.jpg").assert("two");
    temp_dir.child("IMG_001.jpg").assert(predicate::path::missing());
    temp_dir.child("notes.pdf").assert(predicate::path::exists());
}

#[test]
fn test_rename_writes_job_log() {
    let temp_dir = TempDir::new().unwrap();
    temp_dir.child("a.txt").write_str("a").unwrap();

    seqren()
        .current_dir(temp_dir.path())
        .args(["rename", "a.txt", "--prefix", "Doc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Log: "));

    let logs = temp_dir.child(".seqren").child("logs");
    logs.assert(predicate::path::is_dir());
    let entries: Vec<_> = std::fs::read_dir(logs.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_no_journal_and_inline() {
    let temp_dir = TempDir::new().unwrap();
    temp_dir.child("a.txt").write_str("a").unwrap();
    temp_dir.child("b.txt").write_str("b").unwrap();

    seqren()
        .current_dir(temp_dir.path())
        .args([
            "rename", "b.txt", "a.txt", "--prefix", "Doc", "--inline", "--no-journal", "--pad",
            "2",
        ])
        .assert()
        .success();

    temp_dir.child("Doc01.txt").assert("b");
    temp_dir.child("Doc02.txt").assert("a");
    temp_dir.child(".seqren").assert(predicate::path::missing());
}

#[test]
fn test_dry_run_touches_nothing() {
    let temp_dir = TempDir::new().unwrap();
    temp_dir.child("a.png").write_str("a").unwrap();

    seqren()
        .current_dir(temp_dir.path())
        .args(["rename", "a.png", "--prefix", "Shot", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shot1.png"));

    temp_dir.child("a.png").assert(predicate::path::exists());
    temp_dir.child("Shot1.png").assert(predicate::path::missing());
}

#[test]
fn test_plan_command() {
    let temp_dir = TempDir::new().unwrap();
    temp_dir.child("a.py").write_str("").unwrap();
    temp_dir.child("b.gif").write_str("").unwrap();

    seqren()
        .current_dir(temp_dir.path())
        .args(["plan", ".", "-p", "File"])
        .assert()
        .success()
        .stdout(predicate::str::contains("File1.py"))
        .stdout(predicate::str::contains("File2.gif"))
        .stdout(predicate::str::contains("Seqren plan: 2 files"));

    temp_dir.child("a.py").assert(predicate::path::exists());
}

#[test]
fn test_extension_override() {
    let temp_dir = TempDir::new().unwrap();
    temp_dir.child("raw.heic").write_str("").unwrap();
    temp_dir.child("pic.jpg").write_str("").unwrap();

    seqren()
        .current_dir(temp_dir.path())
        .args(["rename", ".", "--prefix", "H", "--ext", "heic", "--no-journal"])
        .assert()
        .success();

    temp_dir.child("H1.heic").assert(predicate::path::exists());
    temp_dir.child("pic.jpg").assert(predicate::path::exists());
}

#[test]
fn test_directory_flag() {
    let temp_dir = TempDir::new().unwrap();
    let photos = temp_dir.child("photos");
    photos.create_dir_all().unwrap();
    photos.child("x.jpg").write_str("").unwrap();

    seqren()
        .current_dir(temp_dir.path())
        .args(["-C", "photos", "rename", ".", "--prefix", "P", "--no-journal"])
        .assert()
        .success();

    photos.child("P1.jpg").assert(predicate::path::exists());
}

#[test]
fn test_empty_prefix_is_invalid_input() {
    let temp_dir = TempDir::new().unwrap();
    temp_dir.child("a.jpg").write_str("").unwrap();

    seqren()
        .current_dir(temp_dir.path())
        .args(["rename", "a.jpg", "--prefix", ""])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid input"));

    temp_dir.child("a.jpg").assert(predicate::path::exists());
}

#[test]
fn test_prefix_with_separator_is_invalid_input() {
    let temp_dir = TempDir::new().unwrap();
    temp_dir.child("a.jpg").write_str("").unwrap();

    seqren()
        .current_dir(temp_dir.path())
        .args(["rename", "a.jpg", "--prefix", "sub/dir"])
        .assert()
        .code(2);
}

#[test]
fn test_missing_path_is_invalid_input() {
    let temp_dir = TempDir::new().unwrap();

    seqren()
        .current_dir(temp_dir.path())
        .args(["rename", "ghost.jpg", "--prefix", "G"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Cannot read"));
}

#[test]
fn test_collision_stops_batch_with_exit_code_1() {
    let temp_dir = TempDir::new().unwrap();
    temp_dir.child("a.jpg").write_str("a").unwrap();
    temp_dir.child("b.jpg").write_str("b").unwrap();
    temp_dir.child("Trip2.jpg").write_str("existing").unwrap();

    seqren()
        .current_dir(temp_dir.path())
        .args(["rename", "a.jpg", "b.jpg", "--prefix", "Trip", "--no-journal"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Stopped after renaming 1 of 2 files"))
        .stdout(predicate::str::contains("b.jpg"));

    temp_dir.child("Trip1.jpg").assert("a");
    temp_dir.child("b.jpg").assert("b");
    temp_dir.child("Trip2.jpg").assert("existing");
}
