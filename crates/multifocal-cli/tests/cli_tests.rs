//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Runs the binary inside `dir`, with the history and `$HOME` pointed there.
fn multifocal(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("multifocal").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("MULTIFOCAL_DATA_DIR", dir.path().join("data"))
        .env_remove("RUST_LOG");
    cmd
}

fn calc_reference(dir: &TempDir, name: &str) {
    multifocal(dir)
        .args(["calc", "--name", name])
        .args(["--far-right-sph", "-2.00", "--near-right-sph", "-1.00"])
        .args(["--far-left-sph", "-2.25", "--near-left-sph", "-1.00"])
        .assert()
        .success();
}

fn exported_ids(dir: &TempDir) -> Vec<String> {
    let output = multifocal(dir)
        .args(["history", "export", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let records: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    records
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    multifocal(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("calc"))
        .stdout(predicate::str::contains("history"))
        .stdout(predicate::str::contains("shell"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    multifocal(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("multifocal"));
}

#[test]
fn calc_prints_rounded_addition() {
    let dir = TempDir::new().unwrap();
    multifocal(&dir)
        .args(["calc", "--far-right-sph", "-2.00", "--near-right-sph", "-1.00"])
        .args(["--far-left-sph", "-2.25", "--near-left-sph", "-1.00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Addition: 1.13"))
        .stdout(predicate::str::contains("OD 1.00  OE 1.25"))
        .stderr(predicate::str::contains("1 in history"));

    assert!(dir.path().join("data/calculation-history.json").exists());
}

#[test]
fn calc_with_defaults_is_zero() {
    let dir = TempDir::new().unwrap();
    multifocal(&dir)
        .arg("calc")
        .assert()
        .success()
        .stdout(predicate::str::contains("Addition: 0.00"));
}

#[test]
fn calc_rejects_invalid_fields() {
    let dir = TempDir::new().unwrap();
    multifocal(&dir)
        .args(["calc", "--near-left-axis", "200", "--far-right-sph", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("near-left axis must be between 0 and 180"))
        .stderr(predicate::str::contains("2 invalid field(s), nothing saved"));

    assert!(!dir.path().join("data").exists());
}

#[test]
fn list_empty_history() {
    let dir = TempDir::new().unwrap();
    multifocal(&dir)
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No calculations saved yet."));
}

#[test]
fn list_pages_newest_first() {
    let dir = TempDir::new().unwrap();
    for name in ["first", "second", "third", "fourth"] {
        calc_reference(&dir, name);
    }

    multifocal(&dir)
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fourth"))
        .stdout(predicate::str::contains("second"))
        .stdout(predicate::str::contains("first").not())
        .stdout(predicate::str::contains("Page 1 of 2"));

    multifocal(&dir)
        .args(["history", "list", "--page", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("first"))
        .stdout(predicate::str::contains("Page 2 of 2"));

    multifocal(&dir)
        .args(["history", "list", "--page", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn show_and_delete_one() {
    let dir = TempDir::new().unwrap();
    calc_reference(&dir, "Ana");
    calc_reference(&dir, "Bruno");
    let ids = exported_ids(&dir);
    assert_eq!(ids.len(), 2);

    multifocal(&dir)
        .args(["history", "show", &ids[1]])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name:   Ana"))
        .stdout(predicate::str::contains("Addition: 1.13"));

    multifocal(&dir)
        .args(["history", "delete", &ids[1]])
        .assert()
        .success()
        .stdout(predicate::str::contains("Calculation deleted successfully!"));

    multifocal(&dir)
        .args(["history", "delete", &ids[1]])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing deleted"));

    multifocal(&dir)
        .args(["history", "show", &ids[1]])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no calculation with id"));

    assert_eq!(exported_ids(&dir), vec![ids[0].clone()]);
}

#[test]
fn show_describes_attached_image() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("rx.png"), [0x89, b'P', b'N', b'G']).unwrap();
    multifocal(&dir)
        .args(["calc", "--image", "rx.png"])
        .assert()
        .success();
    let ids = exported_ids(&dir);

    multifocal(&dir)
        .args(["history", "show", &ids[0]])
        .assert()
        .success()
        .stdout(predicate::str::contains("Image:  image/png, 4 bytes"));
}

#[test]
fn clear_asks_for_confirmation() {
    let dir = TempDir::new().unwrap();
    calc_reference(&dir, "Ana");

    multifocal(&dir)
        .args(["history", "clear"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled, history untouched."));
    assert_eq!(exported_ids(&dir).len(), 1);

    multifocal(&dir)
        .args(["history", "clear"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("History cleared successfully!"))
        .stdout(predicate::str::contains("1 calculation(s) removed."));
    assert!(exported_ids(&dir).is_empty());

    multifocal(&dir)
        .args(["history", "clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("History is already empty."));
}

#[test]
fn export_text_and_speech() {
    let dir = TempDir::new().unwrap();
    calc_reference(&dir, "Ana");

    multifocal(&dir)
        .args(["history", "export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: Ana\n"))
        .stdout(predicate::str::contains("Result: 1.13"));

    multifocal(&dir)
        .args(["history", "export", "--format", "speech"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: Ana, Date: "))
        .stdout(predicate::str::contains(", Result: 1.13"));

    multifocal(&dir)
        .args(["history", "export", "--format", "yaml"])
        .assert()
        .failure();
}

#[test]
fn export_to_file() {
    let dir = TempDir::new().unwrap();
    calc_reference(&dir, "Ana");

    multifocal(&dir)
        .args(["history", "export", "--output", "out.txt"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Exported 1 calculation(s)"));

    let text = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
    assert!(text.starts_with("Name: Ana\n"));
}

#[test]
fn config_flag_must_exist() {
    let dir = TempDir::new().unwrap();
    multifocal(&dir)
        .args(["--config", "missing.toml", "history", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn config_page_size_is_honoured() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("multifocal.toml"), "page_size = 1\n").unwrap();
    calc_reference(&dir, "Ana");
    calc_reference(&dir, "Bruno");

    multifocal(&dir)
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page 1 of 2"));
}

#[test]
fn init_creates_then_skips() {
    let dir = TempDir::new().unwrap();
    multifocal(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created multifocal.toml"));
    assert!(dir.path().join("multifocal.toml").exists());

    multifocal(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping"));
}

#[test]
fn shell_session() {
    let dir = TempDir::new().unwrap();
    multifocal(&dir)
        .arg("shell")
        .write_stdin(
            "set far-right sph -2.00\n\
             set near-right sph -1.00\n\
             set far-left sph -2.25\n\
             set near-left sph -1.00\n\
             name Ana\n\
             calc\n\
             list\n\
             quit\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Addition: 1.13"))
        .stdout(predicate::str::contains("Page 1 of 1"));

    assert_eq!(exported_ids(&dir).len(), 1);
}
