use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn qterm(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("qterm").unwrap();
    cmd.env_remove("QTERM_API_KEY")
        .env_remove("QTERM_LOG")
        .arg("--no-color")
        .arg("--config-dir")
        .arg(dir.path());
    cmd
}

#[test]
fn run_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    qterm(&dir)
        .args(["run", "help"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("COMMANDS:"))
        .stdout(predicate::str::contains("  latest_optics"))
        .stdout(predicate::str::contains("Change color (green/amber/blue/white)"));
}

#[test]
fn run_unknown_command_fails() {
    let dir = tempfile::tempdir().unwrap();
    qterm(&dir)
        .args(["run", "teleport", "alice"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Command not found. Type 'help' for options.",
        ));
}

#[test]
fn run_commands_that_need_no_network() {
    let dir = tempfile::tempdir().unwrap();
    qterm(&dir)
        .args(["run", "ask"])
        .assert()
        .success()
        .stdout("Please enter your question\n");

    qterm(&dir)
        .args(["run", "arxiv", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Please specify a search query"));

    qterm(&dir)
        .args(["run", "theme", "amber"])
        .assert()
        .success()
        .stdout("Theme set to amber\n");
}

#[test]
fn run_html_escapes_output() {
    let dir = tempfile::tempdir().unwrap();
    qterm(&dir)
        .args(["run", "--html", "help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("arxiv &lt;query&gt; [n]"))
        .stdout(predicate::str::contains("<query>").not());
}

#[test]
fn config_shows_defaults_and_masks_key() {
    let dir = tempfile::tempdir().unwrap();
    qterm(&dir)
        .env("QTERM_API_KEY", "sk-secret")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"model\": \"deepseek-chat\""))
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("sk-secret").not());
}

#[test]
fn config_init_writes_file_without_env_key() {
    let dir = tempfile::tempdir().unwrap();
    qterm(&dir)
        .env("QTERM_API_KEY", "sk-secret")
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let written = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
    assert!(written.contains("deepseek-chat"));
    assert!(!written.contains("sk-secret"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{"temperature": 5.0}"#).unwrap();

    qterm(&dir)
        .args(["run", "help"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Config error: temperature"));
}

#[test]
fn theme_from_config_file_is_used() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{"theme": "blue"}"#).unwrap();

    qterm(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"theme\": \"blue\""));
}
