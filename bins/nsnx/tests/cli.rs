use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

const WORKSPACE: &str = r#"{
  "version": 2,
  "projects": {
    "app": {
      "root": "apps/app",
      "targets": {
        "ios": {
          "executor": "@nativescript/nx:build",
          "options": {"platform": "ios"},
          "configurations": {"prod": {"release": true}}
        }
      }
    }
  }
}"#;

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("apps/app")).unwrap();
    std::fs::write(dir.path().join("workspace.json"), WORKSPACE).unwrap();
    dir
}

fn nsnx(workspace: &Path) -> Command {
    let mut cmd = Command::cargo_bin("nsnx").unwrap();
    cmd.arg("--no-color").arg("--workspace").arg(workspace);
    cmd
}

#[test]
fn print_shows_compiled_command() {
    let dir = workspace();
    nsnx(dir.path())
        .args(["print", "app:ios"])
        .assert()
        .success()
        .stdout(predicate::str::contains("debug ios --force"));
}

#[test]
fn print_includes_configuration_and_passthrough() {
    let dir = workspace();
    nsnx(dir.path())
        .args(["print", "app:ios:prod", "--env.foo=bar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("debug ios --release --force --env.foo=bar"));
}

#[test]
fn option_values_named_build_do_not_switch_to_build() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("build");
    std::fs::create_dir_all(root.join("apps/app")).unwrap();
    std::fs::write(root.join("workspace.json"), WORKSPACE).unwrap();

    Command::cargo_bin("nsnx")
        .unwrap()
        .current_dir(dir.path())
        .args(["--no-color", "--workspace", "build", "print", "app:ios", "--log", "build"])
        .assert()
        .success()
        .stdout(predicate::str::contains("debug ios --force --log build"));
}

#[test]
fn missing_workspace_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    nsnx(dir.path())
        .args(["print", "app:ios"])
        .assert()
        .code(3);
}

#[test]
fn unknown_target_is_config_error() {
    let dir = workspace();
    nsnx(dir.path())
        .args(["print", "app:web"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("web"));
}

#[test]
fn malformed_selector_is_validation_error() {
    let dir = workspace();
    nsnx(dir.path()).args(["print", "app"]).assert().code(2);
}

#[cfg(unix)]
#[test]
fn run_reports_cli_exit_status() {
    let dir = workspace();
    let config = dir.path().join(".nsnx.toml");

    std::fs::write(&config, "[cli]\nprogram = \"true\"\n").unwrap();
    nsnx(dir.path())
        .args(["run", "app:ios"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Running NativeScript CLI within apps/app"))
        .stdout(predicate::str::contains("Done."));

    std::fs::write(&config, "[cli]\nprogram = \"false\"\n").unwrap();
    nsnx(dir.path()).args(["run", "app:ios"]).assert().code(1);
}
