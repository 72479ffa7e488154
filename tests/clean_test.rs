//! Integration tests for `packstage clean`
//!
//! Clean removes the staging directory of a previous run and nothing
//! else. It must work even when the recipe's source selections no longer
//! resolve, and it never touches delivered artifacts.

mod common;

use common::TestProject;
use std::process::Command;

/// Helper to run packstage clean
fn run_clean(project: &TestProject, args: &[&str]) -> std::process::Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_packstage"));
    cmd.current_dir(project.path());
    cmd.arg("clean");
    for arg in args {
        cmd.arg(arg);
    }
    cmd.output().expect("Failed to execute packstage clean")
}

/// Helper to set up a project with leftovers from an earlier run
fn setup_staged_project() -> TestProject {
    let project = TestProject::new();
    project.create_file("packstage.toml", common::SAMPLE_DEB_RECIPE);
    project.create_file("tmp/trusty/DEBIAN/control", "Package: app\n");
    project.create_file("tmp/trusty/usr/bin/run.sh", "abc");
    project.create_file("tmp/app-0.9-1.deb", "old archive");
    project.create_file("dist/app-0.9-1.deb", "delivered archive");
    project
}

/// Test: clean removes the staging directory
#[test]
fn test_clean_removes_staging_directory() {
    let project = setup_staged_project();

    let output = run_clean(&project, &[]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "packstage clean should succeed: stdout={stdout}, stderr={stderr}"
    );
    assert!(stdout.contains("Removed"), "{stdout}");
    assert!(!project.path().join("tmp/trusty").exists());
}

/// Test: clean leaves the staging parent and delivered artifacts alone
#[test]
fn test_clean_preserves_artifacts() {
    let project = setup_staged_project();

    let output = run_clean(&project, &[]);
    assert!(output.status.success());

    // Only the per-platform working directory goes away
    assert!(project.file_exists("tmp/app-0.9-1.deb"));
    assert_eq!(project.read_file("dist/app-0.9-1.deb"), "delivered archive");
}

/// Test: clean succeeds when there is nothing to remove
#[test]
fn test_clean_reports_nothing_to_do() {
    let project = TestProject::new();
    project.create_file("packstage.toml", common::SAMPLE_DEB_RECIPE);

    let output = run_clean(&project, &[]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "packstage clean should succeed with nothing staged: {stdout}"
    );
    assert!(stdout.contains("Nothing to clean"), "{stdout}");
}

/// Test: clean does not need the selection roots to still exist
///
/// A build would fail to resolve `payload/` here; cleanup must not.
#[test]
fn test_clean_works_without_selection_roots() {
    let project = TestProject::new();
    project.create_file("packstage.toml", common::SAMPLE_DEB_RECIPE);
    project.create_file("tmp/trusty/usr/bin/run.sh", "abc");

    let output = run_clean(&project, &[]);

    assert!(
        output.status.success(),
        "packstage clean should succeed without payload/: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(!project.path().join("tmp/trusty").exists());
}

/// Test: clean fails without a recipe
#[test]
fn test_clean_fails_without_recipe() {
    let project = TestProject::new();

    let output = run_clean(&project, &[]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success(), "clean should fail without a recipe");
    assert!(stderr.contains("Recipe not found"), "{stderr}");
}

/// Test: --recipe resolves the staging directory against the recipe's
/// directory
#[test]
fn test_clean_with_explicit_recipe_path() {
    let project = TestProject::new();
    project.create_file("conf/custom.toml", common::SAMPLE_DEB_RECIPE);
    project.create_file("conf/tmp/trusty/usr/bin/run.sh", "abc");

    let output = run_clean(&project, &["--recipe", "conf/custom.toml"]);

    assert!(
        output.status.success(),
        "packstage clean should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(!project.path().join("conf/tmp/trusty").exists());
}
