//! Binary surface tests

use assert_cmd::Command;
use predicates::prelude::*;

fn dailybot() -> Command {
    let mut cmd = Command::cargo_bin("dailybot").unwrap();
    // Keep the developer's environment out of the run
    for var in [
        "DAILYBOT_API_URL",
        "DAILYBOT_CLI_TOKEN",
        "DAILYBOT_API_KEY",
        "DAILYBOT_CONFIG_DIR",
        "DAILYBOT_NET_TIMEOUT",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn prints_version() {
    dailybot()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dailybot"));
}

#[test]
fn help_lists_commands() {
    dailybot()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("login")
                .and(predicate::str::contains("update"))
                .and(predicate::str::contains("agent"))
                .and(predicate::str::contains("config")),
        );
}

#[test]
fn health_rejects_conflicting_flags() {
    dailybot()
        .args(["agent", "health", "--ok", "--fail"])
        .assert()
        .failure();
}

#[test]
fn agent_command_without_credentials_fails() {
    let dir = tempfile::tempdir().unwrap();
    dailybot()
        .args(["agent", "update", "Deployed"])
        .arg("--config-dir")
        .arg(dir.path())
        .arg("--api-url")
        .arg("http://127.0.0.1:9")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("DAILYBOT_API_KEY"));
}

#[test]
fn config_key_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    dailybot()
        .args(["config", "key=abcdef123", "--color", "never"])
        .arg("--config-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("API key saved (abcd****)"));

    dailybot()
        .args(["config", "key", "--color", "never"])
        .arg("--config-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("key: abcd****"));
}
