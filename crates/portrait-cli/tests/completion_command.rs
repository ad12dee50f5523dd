use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_portrait_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("portrait")
}

#[test]
fn test_completion_command_help() {
    let mut cmd = Command::new(get_portrait_bin());
    cmd.arg("completion").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Generate shell completion scripts"))
        .stdout(predicate::str::contains("SUPPORTED SHELLS"))
        .stdout(predicate::str::contains("INSTALLATION"))
        .stdout(predicate::str::contains("~/.bashrc"))
        .stdout(predicate::str::contains("~/.zshrc"));
}

#[test]
fn test_completion_bash_generates_script() {
    let mut cmd = Command::new(get_portrait_bin());
    cmd.arg("completion").arg("--shell").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("_portrait()"))
        .stdout(predicate::str::contains("complete -F _portrait"));
}

#[test]
fn test_completion_zsh_mentions_subcommands() {
    let mut cmd = Command::new(get_portrait_bin());
    cmd.arg("completion").arg("--shell").arg("zsh");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("#compdef portrait"))
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("registry"));
}

#[test]
fn test_completion_requires_shell() {
    let mut cmd = Command::new(get_portrait_bin());
    cmd.arg("completion");

    cmd.assert().failure();
}
