//! Drives `crsstat` on captured status command output.

use assert_cmd::Command;
use predicates::prelude::*;

fn colored_crsstat(home: &tempfile::TempDir) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("crsstat");
    cmd.env("HOME", home.path())
        .env_remove("RUST_LOG")
        .env_remove("NO_COLOR");
    cmd
}

fn crsstat(home: &tempfile::TempDir) -> Command {
    let mut cmd = colored_crsstat(home);
    cmd.args(["--color", "never"]);
    cmd
}

fn stdout_lines(cmd: &mut Command) -> Vec<String> {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn verbose_table() {
    let home = tempfile::tempdir().unwrap();
    let lines = stdout_lines(crsstat(&home).args(["--input", "tests/data/verbose.txt"]));

    assert!(lines[0].starts_with("Name"));
    assert!(lines[0].ends_with("State details"));
    assert!(lines[1].starts_with("-----"));

    let rows = &lines[2..];
    assert_eq!(rows.len(), 5);
    assert!(rows[0].starts_with("ora.LISTENER.lsnr"));
    assert!(rows[0].contains("Listener"));
    assert!(rows[0].contains(" L "));
    assert!(rows[1].contains("OFFLINE") && rows[1].contains("rac2"));
    assert!(rows[3].starts_with("ora.orcl.db"));
    assert!(rows[3].ends_with(" 1  1 Abnormal Termination"));
    assert!(rows[4].contains("SCAN VIP"));
}

#[test]
fn legacy_table() {
    let home = tempfile::tempdir().unwrap();
    let lines = stdout_lines(crsstat(&home).args([
        "--input",
        "tests/data/legacy.txt",
        "--format",
        "legacy",
    ]));

    assert!(lines[0].ends_with("Host"));
    assert_eq!(lines.len(), 5);
    assert!(lines[2].contains("application") && lines[2].ends_with("rac1"));
    assert!(lines[3].starts_with("ora.rac1.vip"));
}

#[test]
fn search_matches_details_case_insensitively() {
    let home = tempfile::tempdir().unwrap();
    let lines = stdout_lines(crsstat(&home).args([
        "--input",
        "tests/data/verbose.txt",
        "ABNORMAL",
    ]));

    assert_eq!(lines.len(), 3);
    assert!(lines[2].contains("rac2"));
}

#[test]
fn split_sections() {
    let home = tempfile::tempdir().unwrap();
    let lines = stdout_lines(crsstat(&home).args(["--input", "tests/data/verbose.txt", "-c"]));

    let local = lines.iter().position(|l| l == "Local Resources").unwrap();
    let cluster = lines.iter().position(|l| l == "Cluster Resources").unwrap();
    assert!(local < cluster);

    let listener = lines.iter().position(|l| l.starts_with("ora.LISTENER")).unwrap();
    let database = lines.iter().position(|l| l.starts_with("ora.orcl.db")).unwrap();
    assert!(local < listener && listener < cluster && cluster < database);
}

#[test]
fn empty_input_prints_the_header() {
    let home = tempfile::tempdir().unwrap();
    let lines = stdout_lines(crsstat(&home).args(["--input", "tests/data/empty.txt"]));

    assert_eq!(lines.len(), 2);
}

#[test]
fn latin1_details_do_not_abort() {
    let home = tempfile::tempdir().unwrap();
    let input = home.path().join("status.txt");
    std::fs::write(
        &input,
        b"NAME=ora.a.db\nTYPE=ora.database.type\nTARGET=ONLINE\nSTATE=ONLINE on node1\n\
          STATE_DETAILS=Caf\xE9\nNAME=ora.b.db\nTYPE=ora.database.type\nTARGET=ONLINE\n\
          STATE=ONLINE on node2\nSTATE_DETAILS=Open\n",
    )
    .unwrap();

    let lines = stdout_lines(crsstat(&home).arg("--input").arg(&input));
    assert_eq!(lines.len(), 4);
    assert!(lines[2].starts_with("ora.a.db") && lines[2].ends_with("Caf\u{FFFD}"));
    assert!(lines[3].starts_with("ora.b.db") && lines[3].ends_with("Open"));
}

#[test]
fn anomalies_are_colored() {
    let home = tempfile::tempdir().unwrap();
    colored_crsstat(&home)
        .args(["--input", "tests/data/legacy.txt", "--format", "legacy"])
        .args(["--color", "always", "vip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{1b}[1;31mora.rac1.vip"));
}

#[test]
fn version() {
    let home = tempfile::tempdir().unwrap();
    crsstat(&home)
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_input_fails() {
    let home = tempfile::tempdir().unwrap();
    crsstat(&home)
        .args(["--input", "tests/data/nothing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error:"));
}

#[test]
fn unknown_home_fails() {
    let home = tempfile::tempdir().unwrap();
    crsstat(&home)
        .args(["--home"])
        .arg(home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot discover"));
}

#[test]
fn broken_config_fails() {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("broken.cfg");
    std::fs::write(&config, "[default]\ninit = perhaps\n").unwrap();

    crsstat(&home)
        .args(["--input", "tests/data/empty.txt", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}
