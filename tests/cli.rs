use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Scratch tree with a log directory, a cache directory and a stray file.
fn setup_test_directory() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();

    fs::create_dir_all(root.join("logs/archive")).unwrap();
    fs::write(root.join("logs/app.log"), "log line").unwrap();
    fs::write(root.join("logs/archive/old.log"), "older line").unwrap();

    fs::create_dir_all(root.join("cache/shaders")).unwrap();
    fs::write(root.join("cache/shaders/0001.bin"), "bin").unwrap();

    fs::write(root.join("driver.sys"), "sys").unwrap();
    fs::create_dir_all(root.join("reports")).unwrap();

    dir
}

fn write_plan(root: &Path) -> std::path::PathBuf {
    let plan = format!(
        r#"
[[steps]]
kind = "clean"
category = "Logs"
path = '{logs}'

[[steps]]
kind = "clean"
category = "Shader cache"
path = '{cache}'
recursive = true

[[steps]]
kind = "clean"
category = "Driver"
path = '{driver}'
"#,
        logs = root.join("logs").display(),
        cache = root.join("cache").display(),
        driver = root.join("driver.sys").display(),
    );
    let path = root.join("plan.toml");
    fs::write(&path, plan).unwrap();
    path
}

fn tidysweep() -> Command {
    let mut cmd = Command::cargo_bin("tidysweep").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

fn reports_in(dir: &Path) -> Vec<std::path::PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            p.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("log_cleaner_report_")
        })
        .collect()
}

#[test]
fn test_scan_lists_targets_without_deleting() {
    let dir = setup_test_directory();
    let plan = write_plan(dir.path());

    tidysweep()
        .arg("scan")
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("Logs"))
        .stdout(predicate::str::contains("Shader cache"))
        .stdout(predicate::str::contains("3 entries"));

    assert!(dir.path().join("logs/archive/old.log").exists());
    assert!(dir.path().join("driver.sys").exists());
}

#[test]
fn test_clean_without_confirm_is_dry_run() {
    let dir = setup_test_directory();
    let plan = write_plan(dir.path());

    tidysweep()
        .arg("clean")
        .arg(&plan)
        .arg("--report-dir")
        .arg(dir.path().join("reports"))
        .assert()
        .success()
        .stdout(predicate::str::contains("dry-run"));

    assert!(dir.path().join("logs/app.log").exists());
    assert!(reports_in(&dir.path().join("reports")).is_empty());
}

#[test]
fn test_clean_with_confirm_deletes_and_writes_report() {
    let dir = setup_test_directory();
    let plan = write_plan(dir.path());
    let reports = dir.path().join("reports");

    tidysweep()
        .arg("clean")
        .arg(&plan)
        .arg("--confirm")
        .arg("--report-dir")
        .arg(&reports)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report saved"));

    assert!(dir.path().join("logs").exists());
    assert_eq!(fs::read_dir(dir.path().join("logs")).unwrap().count(), 0);
    assert_eq!(fs::read_dir(dir.path().join("cache")).unwrap().count(), 0);
    assert!(!dir.path().join("driver.sys").exists());

    let written = reports_in(&reports);
    assert_eq!(written.len(), 1);
    let text = fs::read_to_string(&written[0]).unwrap();
    assert!(text.starts_with("=== LOG CLEANUP REPORT ===\nDate and time: "));
    assert!(text.contains(&format!(
        "DIRECTORY: {}\n",
        dir.path().join("logs").join("archive").display()
    )));
    assert!(text.contains("old.log - removed"));
    assert!(text.contains("driver.sys - removed"));
    assert_eq!(text.matches(" - removed").count(), 6);
}

#[test]
fn test_parallel_clean_records_every_entry() {
    let dir = setup_test_directory();
    let plan = write_plan(dir.path());
    let reports = dir.path().join("reports");

    tidysweep()
        .arg("clean")
        .arg(&plan)
        .arg("--confirm")
        .arg("--parallel")
        .arg("--report-dir")
        .arg(&reports)
        .assert()
        .success();

    let written = reports_in(&reports);
    assert_eq!(written.len(), 1);
    let text = fs::read_to_string(&written[0]).unwrap();
    assert_eq!(text.matches(" - removed").count(), 6);
}

#[test]
fn test_unwritable_report_fails_after_cleaning() {
    let dir = setup_test_directory();
    let plan = write_plan(dir.path());

    tidysweep()
        .arg("clean")
        .arg(&plan)
        .arg("--confirm")
        .arg("--report-dir")
        .arg(dir.path().join("no/such/dir"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("report could not be saved"));

    // Deletions stand even though the report was lost.
    assert!(!dir.path().join("logs/app.log").exists());
}

#[test]
fn test_invalid_plan_is_rejected_before_cleaning() {
    let dir = setup_test_directory();
    let plan = dir.path().join("plan.toml");
    fs::write(&plan, "[[steps]]\nkind = \"nuke\"\n").unwrap();

    tidysweep()
        .arg("clean")
        .arg(&plan)
        .arg("--confirm")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot load plan"));

    assert!(dir.path().join("logs/app.log").exists());
}
