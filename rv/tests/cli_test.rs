//! Binary tests for `rv`
//!
//! Each run happens in an empty temp dir with HOME pointed at it, so no
//! stray config file is picked up.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn rv(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rv").expect("binary should build");
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_short_run_logs_rounds_and_shutdown() {
    let home = TempDir::new().unwrap();

    rv(&home)
        .args(["--run-for-ms", "400", "--pacing-delay-ms", "20", "--seed", "7"])
        .assert()
        .success()
        .stderr(predicate::str::contains("rolled and smoked a cigarette"))
        .stderr(predicate::str::contains("supplier: sending"))
        .stderr(predicate::str::contains("coordinator: shutting down"))
        .stderr(predicate::str::contains("coordinator: stopped reading messages"))
        .stderr(predicate::str::contains("supplier: shutdown complete"))
        .stderr(predicate::str::contains("broker: shutdown complete"))
        .stderr(predicate::str::contains("has-tobacco: shutdown complete"))
        .stderr(predicate::str::contains("has-papers: shutdown complete"))
        .stderr(predicate::str::contains("has-lighter: shutdown complete"))
        .stderr(predicate::str::contains("coordinator: shutdown complete"))
        .stderr(predicate::str::contains("main: shutdown complete"));
}

#[test]
fn test_round_limit_ends_run_early() {
    let home = TempDir::new().unwrap();

    rv(&home)
        .args(["--run-for-ms", "60000", "--pacing-delay-ms", "0", "--max-rounds", "4"])
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .success()
        .stderr(predicate::str::contains("round limit reached"))
        .stderr(predicate::str::contains("main: shutdown complete"))
        .stderr(predicate::str::contains("coordinator: shutting down").not());
}

#[test]
fn test_config_file_is_read() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("rv.yml");
    std::fs::write(&config, "run-for-ms: 300\npacing-delay-ms: 10\nlog-level: warn\n").unwrap();

    // At WARN the per-round lines are filtered out
    rv(&home)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("rolled and smoked a cigarette").not());
}

#[test]
fn test_local_config_file_is_found() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join(".rendezvous.yml"), "run-for-ms: 200\nmax-rounds: 2\n").unwrap();

    rv(&home)
        .arg("--pacing-delay-ms")
        .arg("0")
        .assert()
        .success()
        .stderr(predicate::str::contains("Loaded config from: .rendezvous.yml"));
}

#[test]
fn test_zero_run_time_is_rejected() {
    let home = TempDir::new().unwrap();

    rv(&home)
        .args(["--run-for-ms", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("run-for-ms must be greater than zero"));
}

#[test]
fn test_missing_config_file_fails() {
    let home = TempDir::new().unwrap();

    rv(&home)
        .args(["--config", "does-not-exist.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_shutdown_lines_follow_the_ring() {
    let home = TempDir::new().unwrap();

    let output = rv(&home)
        .args(["--run-for-ms", "300", "--pacing-delay-ms", "0", "--seed", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let at = |line: &str| stderr.find(line).unwrap_or_else(|| panic!("missing {:?}", line));

    let supplier = at("supplier: shutdown complete");
    let broker = at("broker: shutdown complete");
    assert!(supplier < broker);
    for consumer in ["has-tobacco", "has-papers", "has-lighter"] {
        assert!(broker < at(&format!("{}: shutdown complete", consumer)));
    }
    assert!(at("has-lighter: shutdown complete") < at("coordinator: shutdown complete"));
    assert!(at("coordinator: shutdown complete") < at("main: shutdown complete"));
}
