//! Binary-level behaviour: argument count, config loading, log file, exit codes.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn backup_helper_cmd(workdir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("backup-helper"));
    cmd.current_dir(workdir).env_remove("RUST_LOG");
    cmd
}

fn log_files(workdir: &Path) -> Vec<PathBuf> {
    fs::read_dir(workdir)
        .expect("read workdir")
        .map(|e| e.expect("entry").path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("backup-helper-") && n.ends_with(".log"))
        })
        .collect()
}

fn write_script(path: &Path, body: &str) {
    fs::write(path, body).expect("write script");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod");
}

#[test]
fn no_arguments_exits_one_and_leaves_a_log() {
    let workdir = TempDir::new().unwrap();
    backup_helper_cmd(workdir.path())
        .assert()
        .code(1)
        .stderr(contains("expected exactly two arguments"));

    let logs = log_files(workdir.path());
    assert_eq!(logs.len(), 1, "one log file per run");
    let log = fs::read_to_string(&logs[0]).unwrap();
    assert!(log.contains("program failed"), "log:\n{log}");
}

#[test]
fn three_arguments_exit_one() {
    let workdir = TempDir::new().unwrap();
    backup_helper_cmd(workdir.path())
        .args(["a", "b", "c"])
        .assert()
        .code(1);
}

#[test]
fn help_exits_zero() {
    let workdir = TempDir::new().unwrap();
    backup_helper_cmd(workdir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("<SOURCE>"));
}

#[test]
fn missing_config_exits_one() {
    let workdir = TempDir::new().unwrap();
    backup_helper_cmd(workdir.path())
        .args(["src", "dst"])
        .assert()
        .code(1)
        .stderr(contains("config.json"));
}

#[test]
fn unsendable_report_fails_the_run_after_a_complete_backup() {
    let workdir = TempDir::new().unwrap();
    let tools = workdir.path().join("tools");
    let source = workdir.path().join("source");
    let destination = workdir.path().join("destination");
    for dir in [&tools, &source, &destination] {
        fs::create_dir_all(dir).unwrap();
    }
    fs::write(source.join("a.txt"), "1").unwrap();
    fs::write(source.join("b.txt"), "2").unwrap();
    fs::write(destination.join("a.txt"), "1").unwrap();
    fs::write(destination.join("c.txt"), "old").unwrap();

    write_script(&tools.join("verify"), "#!/bin/sh\necho \"<ok> $2\"\n");
    write_script(
        &tools.join("sync"),
        "#!/bin/sh\nfor arg; do src=\"$dst\"; dst=\"$arg\"; done\n\
         find \"$dst\" -mindepth 1 -maxdepth 1 -exec rm -rf {} +\n\
         cp -R \"$src.\" \"$dst\"\necho synced\n",
    );

    let config = format!(
        r#"{{
            "MailHost": "127.0.0.1", "MailPort": 1,
            "MailUser": "u", "MailPass": "p", "MailEncryption": "PLAINTEXT",
            "FromMail": "backup@example.com", "ToMail": "me@example.com",
            "Tools": {{
                "VerifyProgram": "{verify}", "VerifyArgs": ["-recursive"],
                "SyncProgram": "{sync}", "SyncArgs": ["--archive", "--delete"]
            }}
        }}"#,
        verify = tools.join("verify").display(),
        sync = tools.join("sync").display(),
    );
    fs::write(workdir.path().join("config.json"), config).unwrap();

    backup_helper_cmd(workdir.path())
        .arg(&source)
        .arg(&destination)
        .assert()
        .code(1)
        .stderr(contains("[sync] synced"))
        .stderr(contains("PLAINTEXT"));

    assert!(destination.join("b.txt").exists());
    assert!(!destination.join("c.txt").exists());
    assert_eq!(fs::read_to_string(destination.join("a.txt")).unwrap(), "1");

    let logs = log_files(workdir.path());
    assert_eq!(logs.len(), 1);
    let log = fs::read_to_string(&logs[0]).unwrap();
    assert!(log.contains("[verify:source] <ok>"), "log:\n{log}");
    assert!(log.contains("[verify:destination] <ok>"), "log:\n{log}");
    assert!(log.contains("folder check passed"), "log:\n{log}");
    assert!(log.contains("report not sent"), "log:\n{log}");
}
