use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CARD: &str = "КАРТОЧКА ПРЕДПРИЯТИЯ

ООО \"ПАРТНЕР\"

ИНН / КПП
9716000221 / 971601419

ОГРН
1027716000229

Наименование банка
АЛЬФА-БАНК

БИК банка
044525593

Расчётный счет
40702810123450101230

Корреспондентский счет
30101810200000000593

Телефон
+7 (495) 123-45-67
";

fn rekvizity(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rekvizity").unwrap();
    cmd.env("XDG_CONFIG_HOME", home);
    cmd
}

#[test]
fn test_extract_json_from_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("card.txt");
    fs::write(&input, CARD).unwrap();

    rekvizity(dir.path())
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"inn\""))
        .stdout(predicate::str::contains("9716000221"))
        .stdout(predicate::str::contains("+7 (495) 123-45-67"));
}

#[test]
fn test_extract_text_from_stdin() {
    let dir = TempDir::new().unwrap();

    rekvizity(dir.path())
        .args(["extract", "-", "-f", "text", "--show-confidence"])
        .write_stdin(CARD)
        .assert()
        .success()
        .stdout(predicate::str::contains("OGRN:"))
        .stdout(predicate::str::contains("1027716000229"))
        .stdout(predicate::str::contains("confidence:"))
        .stdout(predicate::str::contains("Missing:"))
        .stdout(predicate::str::contains("director"));
}

#[test]
fn test_extract_csv_to_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("card.txt");
    let output = dir.path().join("card.csv");
    fs::write(&input, CARD).unwrap();

    rekvizity(dir.path())
        .arg("extract")
        .arg(&input)
        .args(["-f", "csv", "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted"));

    let csv = fs::read_to_string(&output).unwrap();
    assert!(csv.starts_with("field,value\n"));
    assert!(csv.contains("bankBik,044525593"));
}

#[test]
fn test_extract_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    rekvizity(dir.path())
        .args(["extract", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_config_from_file_changes_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("card.txt");
    let config = dir.path().join("custom.json");
    fs::write(&input, CARD).unwrap();
    fs::write(&config, r#"{"extraction":{"format_phone":false}}"#).unwrap();

    rekvizity(dir.path())
        .arg("-c")
        .arg(&config)
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("+74951234567"));
}

#[test]
fn test_batch_with_summary() {
    let dir = TempDir::new().unwrap();
    let cards = dir.path().join("cards");
    let out = dir.path().join("out");
    fs::create_dir_all(&cards).unwrap();
    fs::write(cards.join("a.txt"), CARD).unwrap();
    fs::write(cards.join("b.txt"), "ИНН 7707083893").unwrap();

    let pattern = format!("{}/*.txt", cards.display());
    rekvizity(dir.path())
        .args(["batch", &pattern, "--summary", "-j", "2", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"))
        .stdout(predicate::str::contains("Summary written"));

    assert!(out.join("a.json").exists());
    assert!(out.join("b.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("filename,status,companyName,inn"));
    assert!(lines[1].starts_with("a.txt,success,ПАРТНЕР,9716000221"));
    assert!(lines[2].starts_with("b.txt,success"));
}

#[test]
fn test_batch_keeps_outputs_with_same_stem() {
    let dir = TempDir::new().unwrap();
    let cards = dir.path().join("cards");
    let out = dir.path().join("out");
    fs::create_dir_all(&cards).unwrap();
    fs::write(cards.join("card.txt"), CARD).unwrap();
    fs::write(cards.join("card.ocr"), "ИНН 7707083893").unwrap();

    let pattern = format!("{}/card.*", cards.display());
    rekvizity(dir.path())
        .args(["batch", &pattern, "-o"])
        .arg(&out)
        .assert()
        .success();

    let first = fs::read_to_string(out.join("card.json")).unwrap();
    let second = fs::read_to_string(out.join("card-2.json")).unwrap();
    assert!(first.contains("7707083893"));
    assert!(second.contains("9716000221"));
}

#[test]
fn test_batch_without_matches_fails() {
    let dir = TempDir::new().unwrap();
    let pattern = format!("{}/*.txt", dir.path().display());

    rekvizity(dir.path())
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn test_config_init_set_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    rekvizity(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    rekvizity(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "output.format", "csv"])
        .assert()
        .success();

    rekvizity(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "output.format"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"csv\""));

    rekvizity(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    rekvizity(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "extraction.no_such_option", "true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cards_pass() {
    let dir = TempDir::new().unwrap();

    rekvizity(dir.path())
        .args(["cards", "--verbose-fields"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pattern library"))
        .stdout(predicate::str::contains("cards successful"));
}

#[test]
fn test_cards_baseline_roundtrip() {
    let dir = TempDir::new().unwrap();
    let baseline = dir.path().join("baseline.json");

    rekvizity(dir.path())
        .arg("cards")
        .arg("--save-baseline")
        .arg(&baseline)
        .assert()
        .success()
        .stderr(predicate::str::contains("Baseline saved"));
    assert!(fs::read_to_string(&baseline).unwrap().contains("\"version\""));

    rekvizity(dir.path())
        .arg("cards")
        .arg("--baseline")
        .arg(&baseline)
        .assert()
        .success()
        .stdout(predicate::str::contains("Baseline"))
        .stdout(predicate::str::contains("success rate +0%"));
}

#[test]
fn test_cards_missing_baseline_fails() {
    let dir = TempDir::new().unwrap();

    rekvizity(dir.path())
        .args(["cards", "--baseline", "no-such-baseline.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read baseline"));
}
