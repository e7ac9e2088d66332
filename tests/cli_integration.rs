//! Integration tests for the pwvault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! Passwords are supplied through `PWVAULT_PASSWORD` /
//! `PWVAULT_NEW_PASSWORD` so no interactive prompt is ever shown.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;

const MASTER: &str = "correct-Horse-42!";

/// Helper: get a Command pointing at the pwvault binary, isolated from
/// the caller's environment.
fn pwvault(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("pwvault").expect("binary should exist");
    cmd.current_dir(dir)
        .env_remove("PWVAULT_FILE")
        .env_remove("PWVAULT_PASSWORD")
        .env_remove("PWVAULT_NEW_PASSWORD")
        .env_remove("PWVAULT_LOG");
    cmd
}

/// Helper: `pwvault` with the master password and vault file set.
fn unlocked(dir: &Path, vault: &Path) -> Command {
    let mut cmd = pwvault(dir);
    cmd.env("PWVAULT_PASSWORD", MASTER).env("PWVAULT_FILE", vault);
    cmd
}

fn init_vault(tmp: &TempDir) -> PathBuf {
    let vault = tmp.path().join("vault.json");
    unlocked(tmp.path(), &vault)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault created"));
    vault
}

/// Add an entry and return the id printed on the last stdout line.
fn add_entry(tmp: &TempDir, vault: &Path, title: &str, username: &str, password: &str) -> String {
    let output = unlocked(tmp.path(), vault)
        .args(["add", "--title", title, "--username", username])
        .args(["--password", password])
        .output()
        .unwrap();
    assert!(output.status.success(), "add failed: {output:?}");

    String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .last()
        .unwrap()
        .trim()
        .to_string()
}

#[test]
fn help_flag_shows_usage() {
    let tmp = TempDir::new().unwrap();
    pwvault(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local encrypted password vault"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("passwd"))
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn no_args_shows_help() {
    let tmp = TempDir::new().unwrap();
    pwvault(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn init_creates_vault_and_refuses_to_overwrite() {
    let tmp = TempDir::new().unwrap();
    let vault = init_vault(&tmp);
    assert!(vault.exists());

    unlocked(tmp.path(), &vault)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_uses_config_file_name() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join(".pwvault.toml"),
        "vault_file = \"configured.json\"\n",
    )
    .unwrap();

    pwvault(tmp.path())
        .env("PWVAULT_PASSWORD", MASTER)
        .arg("init")
        .assert()
        .success();
    assert!(tmp.path().join("configured.json").exists());
}

#[test]
fn init_rejects_short_master_password() {
    let tmp = TempDir::new().unwrap();
    let vault = tmp.path().join("vault.json");
    pwvault(tmp.path())
        .env("PWVAULT_PASSWORD", "short")
        .env("PWVAULT_FILE", &vault)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));
    assert!(!vault.exists());
}

#[test]
fn add_list_search_show_flow() {
    let tmp = TempDir::new().unwrap();
    let vault = init_vault(&tmp);
    let id = add_entry(&tmp, &vault, "GitHub", "alice", "S3cret!");
    add_entry(&tmp, &vault, "Bank", "bob", "b4nk!");

    // list and search work without the master password.
    pwvault(tmp.path())
        .env("PWVAULT_FILE", &vault)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub"))
        .stdout(predicate::str::contains("Bank"))
        .stdout(predicate::str::contains(&id));

    pwvault(tmp.path())
        .env("PWVAULT_FILE", &vault)
        .args(["search", "git"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub"))
        .stdout(predicate::str::contains("Bank").not());

    unlocked(tmp.path(), &vault)
        .args(["show", "--title", "github"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("S3cret!"));

    unlocked(tmp.path(), &vault)
        .args(["show", "--id", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("S3cret!"));
}

#[test]
fn secrets_are_not_stored_in_clear_text() {
    let tmp = TempDir::new().unwrap();
    let vault = init_vault(&tmp);
    add_entry(&tmp, &vault, "GitHub", "alice", "S3cret!");

    let raw = std::fs::read_to_string(&vault).unwrap();
    assert!(raw.contains("GitHub"));
    assert!(!raw.contains("alice"));
    assert!(!raw.contains("S3cret!"));
}

#[test]
fn wrong_master_password_fails() {
    let tmp = TempDir::new().unwrap();
    let vault = init_vault(&tmp);
    let id = add_entry(&tmp, &vault, "GitHub", "alice", "S3cret!");

    pwvault(tmp.path())
        .env("PWVAULT_PASSWORD", "correct-Horse-43!")
        .env("PWVAULT_FILE", &vault)
        .args(["show", "--id", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication failed"))
        .stdout(predicate::str::contains("S3cret!").not());
}

#[test]
fn edit_updates_only_given_fields() {
    let tmp = TempDir::new().unwrap();
    let vault = init_vault(&tmp);
    let id = add_entry(&tmp, &vault, "GitHub", "alice", "S3cret!");

    unlocked(tmp.path(), &vault)
        .args(["edit", &id, "--username", "carol"])
        .assert()
        .success();

    unlocked(tmp.path(), &vault)
        .args(["show", "--id", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("carol"))
        .stdout(predicate::str::contains("S3cret!"));
}

#[test]
fn edit_without_fields_fails() {
    let tmp = TempDir::new().unwrap();
    let vault = init_vault(&tmp);
    let id = add_entry(&tmp, &vault, "GitHub", "alice", "S3cret!");

    unlocked(tmp.path(), &vault)
        .args(["edit", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to change"));
}

#[test]
fn delete_removes_entry() {
    let tmp = TempDir::new().unwrap();
    let vault = init_vault(&tmp);
    let id = add_entry(&tmp, &vault, "GitHub", "alice", "S3cret!");

    unlocked(tmp.path(), &vault)
        .args(["delete", &id, "--force"])
        .assert()
        .success();

    unlocked(tmp.path(), &vault)
        .args(["show", "--id", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    unlocked(tmp.path(), &vault)
        .args(["delete", &id, "--force"])
        .assert()
        .failure();
}

#[test]
fn passwd_rewraps_without_touching_entries() {
    let tmp = TempDir::new().unwrap();
    let vault = init_vault(&tmp);
    let id = add_entry(&tmp, &vault, "GitHub", "alice", "S3cret!");

    unlocked(tmp.path(), &vault)
        .env("PWVAULT_NEW_PASSWORD", "another-Passw0rd!")
        .arg("passwd")
        .assert()
        .success();

    unlocked(tmp.path(), &vault)
        .args(["show", "--id", &id])
        .assert()
        .failure();

    pwvault(tmp.path())
        .env("PWVAULT_PASSWORD", "another-Passw0rd!")
        .env("PWVAULT_FILE", &vault)
        .args(["show", "--id", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("S3cret!"));
}

#[test]
fn missing_vault_is_reported() {
    let tmp = TempDir::new().unwrap();
    pwvault(tmp.path())
        .env("PWVAULT_FILE", tmp.path().join("nope.json"))
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Vault not found"));
}

#[test]
fn generate_prints_password_of_requested_length() {
    let tmp = TempDir::new().unwrap();
    let output = pwvault(tmp.path())
        .args(["generate", "--length", "32", "--no-symbols"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let password = stdout.lines().next().unwrap();
    assert_eq!(password.len(), 32);
    assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn generate_with_nothing_selected_fails() {
    let tmp = TempDir::new().unwrap();
    pwvault(tmp.path())
        .args(["generate", "--no-upper", "--no-lower", "--no-digits", "--no-symbols"])
        .assert()
        .failure();
}

#[test]
fn strength_rates_password() {
    let tmp = TempDir::new().unwrap();
    pwvault(tmp.path())
        .args(["strength", "abc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("weak"))
        .stdout(predicate::str::contains("Password is too short"));
}

#[test]
fn completions_bash() {
    let tmp = TempDir::new().unwrap();
    pwvault(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pwvault"));
}

#[test]
fn completions_cover_every_clap_shell() {
    let tmp = TempDir::new().unwrap();
    for shell in ["zsh", "fish", "powershell", "elvish"] {
        pwvault(tmp.path())
            .args(["completions", shell])
            .assert()
            .success()
            .stdout(predicate::str::is_empty().not());
    }
}

#[test]
fn completions_unknown_shell_fails() {
    let tmp = TempDir::new().unwrap();
    pwvault(tmp.path())
        .args(["completions", "csh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'csh'"));
}
