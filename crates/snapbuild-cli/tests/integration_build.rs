//! Integration tests for `snapbuild build`, run through the library and the
//! compiled binary.

use assert_cmd::Command;
use predicates::prelude::*;
use snapbuild_cli::cli::{BuildArgs, TranspilationMode};
use snapbuild_cli::commands::build_execute;
use snapbuild_cli::error::{BuildError, CliError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn project(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    for (name, contents) in files {
        let path = temp.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
    temp
}

fn snapbuild(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("snapbuild").unwrap();
    cmd.current_dir(dir).arg("--no-color");
    cmd
}

#[tokio::test]
async fn test_build_commonjs_without_transpilation() {
    let temp = project(&[("src/index.js", "module.exports = 1;\n")]);

    let args = BuildArgs {
        transpilation_mode: Some(TranspilationMode::None),
        cwd: Some(temp.path().to_path_buf()),
        ..BuildArgs::default()
    };
    build_execute(args).await.unwrap();

    let bundle = fs::read_to_string(temp.path().join("dist/bundle.js")).unwrap();
    assert!(!bundle.trim().is_empty());
}

#[tokio::test]
async fn test_build_uses_config_file() {
    let temp = project(&[
        ("lib/snap.ts", "export const answer: number = 42;\n"),
        (
            "snap.config.json",
            r#"{ "src": "lib/snap.ts", "dist": "out", "outfileName": "snap.js" }"#,
        ),
    ]);

    let args = BuildArgs {
        cwd: Some(temp.path().to_path_buf()),
        ..BuildArgs::default()
    };
    build_execute(args).await.unwrap();

    let bundle = fs::read_to_string(temp.path().join("out/snap.js")).unwrap();
    assert!(bundle.contains("42"));
    assert!(!bundle.contains(": number"));
}

#[tokio::test]
async fn test_build_missing_source_is_an_error() {
    let temp = TempDir::new().unwrap();

    let args = BuildArgs {
        cwd: Some(temp.path().to_path_buf()),
        ..BuildArgs::default()
    };
    let err = build_execute(args).await.unwrap_err();

    assert!(matches!(err, CliError::Build(BuildError::EntryNotFound(_))));
    assert!(!temp.path().join("dist/bundle.js").exists());
}

#[tokio::test]
async fn test_build_unresolved_import_is_a_bundle_error() {
    let temp = project(&[("src/index.js", "import x from './nope.js';\nexport default x;\n")]);

    let args = BuildArgs {
        cwd: Some(temp.path().to_path_buf()),
        ..BuildArgs::default()
    };
    let err = build_execute(args).await.unwrap_err();

    assert!(matches!(err, CliError::Bundle(_)));
    assert!(!temp.path().join("dist/bundle.js").exists());
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("snapbuild")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn test_binary_build_succeeds() {
    let temp = project(&[("src/index.js", "module.exports = 1;\n")]);

    snapbuild(temp.path())
        .args(["build", "--transpilation-mode", "none"])
        .assert()
        .success();

    assert!(temp.path().join("dist/bundle.js").is_file());
}

#[test]
fn test_binary_missing_source_fails() {
    let temp = TempDir::new().unwrap();

    snapbuild(temp.path())
        .args(["build", "--src", "src/missing.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source file not found"));
}

#[test]
fn test_binary_rejects_invalid_outfile_name() {
    let temp = project(&[("src/index.js", "module.exports = 1;\n")]);

    snapbuild(temp.path())
        .args(["build", "--outfile-name", "bundle.ts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must end in .js"));
}

#[test]
fn test_binary_rejects_deps_without_local_and_deps() {
    let temp = project(&[("src/index.js", "module.exports = 1;\n")]);

    snapbuild(temp.path())
        .args(["build", "--deps-to-transpile", "foo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("localAndDeps"));

    assert!(!temp.path().join("dist/bundle.js").exists());
}

#[test]
fn test_binary_rejects_unknown_config_field() {
    let temp = project(&[
        ("src/index.js", "module.exports = 1;\n"),
        ("snap.config.json", r#"{ "entry": "src/index.js" }"#),
    ]);

    snapbuild(temp.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
