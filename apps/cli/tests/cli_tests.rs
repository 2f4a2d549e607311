//! mirobot-cli 端到端测试（模拟机械臂，无硬件）

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mirobot-cli").unwrap();
    cmd.arg("--config")
        .arg(config_dir.path().join("config.toml"))
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_home_simulated() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["--simulate", "--poll-interval-ms", "5", "home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("回零完成"));
}

#[test]
fn test_status_simulated() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["--simulate", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Idle"))
        .stdout(predicate::str::contains("198.670"));
}

#[test]
fn test_move_simulated() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["--simulate", "--poll-interval-ms", "5"])
        .args(["move", "--joints", "45,-15,30,0,0,0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("移动完成"));
}

#[test]
fn test_move_wrong_joint_count_fails() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["--simulate", "move", "--joints", "1,2,3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("6"));
}

#[test]
fn test_move_out_of_limits_fails() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["--simulate", "move", "--joints", "0,90,0,0,0,0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("J2"));
}

#[test]
fn test_goto_simulated() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["--simulate", "--poll-interval-ms", "5"])
        .args(["goto", "--pose", "150,50,50,0,0,0", "--fast"])
        .assert()
        .success();
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["config", "set", "--port", "/dev/ttyUSB0", "--baud", "9600"])
        .assert()
        .success();

    cli(&dir)
        .args(["config", "get", "port"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/dev/ttyUSB0"));

    cli(&dir)
        .args(["config", "get", "baud"])
        .assert()
        .success()
        .stdout(predicate::str::contains("9600"));
}

#[test]
fn test_config_get_unset() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["config", "get", "port"])
        .assert()
        .success()
        .stdout(predicate::str::contains("未设置"));
}

#[test]
fn test_demo_with_code() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["--simulate", "--poll-interval-ms", "5"])
        .args(["demo", "--code", "120,40,60", "--pause-ms", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("X=120.0"))
        .stdout(predicate::str::contains("演示结束"));
}

#[test]
fn test_demo_reads_stdin() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["--simulate", "--poll-interval-ms", "5"])
        .args(["demo", "--pause-ms", "0"])
        .write_stdin("not a pose\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("not a pose"))
        .stdout(predicate::str::contains("X=150.0"));
}

#[test]
fn test_cycle_bounded() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["--simulate", "--poll-interval-ms", "5"])
        .args(["cycle", "--cycles", "1", "--dwell-ms", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("完成 1 次往复"));
}

#[test]
fn test_config_check_shows_read_timeout() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["config", "set", "--read-timeout-ms", "1500"])
        .assert()
        .success();

    cli(&dir)
        .args(["config", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("读超时: Some(1500) ms"));
}
