use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn trialbal(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("trialbal").unwrap();
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

fn write_tb(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("tb.csv");
    std::fs::write(
        &path,
        "Account,Dr,Cr\nSales,,1000\nRent,300,\nCash in Hand,700,\nCapital,,0\n",
    )
    .unwrap();
    path
}

#[test]
fn parse_prints_rows_and_audit_as_json() {
    let home = tempfile::tempdir().unwrap();
    let file = write_tb(home.path());
    trialbal(home.path())
        .args(["parse", file.to_str().unwrap(), "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Particulars\": \"Sales\""))
        .stdout(predicate::str::contains("\"totalRows\": 4"));
}

#[test]
fn parse_header_only_file_fails() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("empty.csv");
    std::fs::write(&file, "Particulars,Debit,Credit\n").unwrap();
    trialbal(home.path())
        .args(["parse", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: File contains no data"));
}

#[test]
fn parse_missing_column_names_it() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("two.csv");
    std::fs::write(&file, "Particulars,Debit\nCash,100\n").unwrap();
    trialbal(home.path())
        .args(["parse", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required columns: Credit"));
}

#[test]
fn report_before_import_fails() {
    let home = tempfile::tempdir().unwrap();
    trialbal(home.path())
        .args(["report", "pnl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No reports stored yet"));
}

#[test]
fn import_then_report() {
    let home = tempfile::tempdir().unwrap();
    let file = write_tb(home.path());
    trialbal(home.path())
        .args(["init", "--company", "Acme Traders"])
        .assert()
        .success();
    trialbal(home.path())
        .args(["import", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 rows stored"));
    trialbal(home.path())
        .args(["report", "pnl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Traders"))
        .stdout(predicate::str::contains("NET PROFIT"))
        .stdout(predicate::str::contains("700.00"));
    trialbal(home.path())
        .args(["report", "balance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Net Profit"));
    trialbal(home.path())
        .args(["report", "ratios"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current Ratio"));
    trialbal(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored rows:   4"));
}

#[test]
fn cleanup_writes_csv_by_extension() {
    let home = tempfile::tempdir().unwrap();
    let file = write_tb(home.path());
    let out = home.path().join("clean.csv");
    trialbal(home.path())
        .args(["cleanup", file.to_str().unwrap(), "--output", out.to_str().unwrap()])
        .assert()
        .success();
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("Particulars,Debit,Credit\nSales,,1000\n"));
}

#[test]
fn sample_round_trips_through_parse() {
    let home = tempfile::tempdir().unwrap();
    let out = home.path().join("sample.csv");
    trialbal(home.path())
        .args(["sample", "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("sample entries"));
    trialbal(home.path())
        .args(["parse", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 invalid"));
}

#[test]
fn sample_defaults_to_workbook() {
    let home = tempfile::tempdir().unwrap();
    trialbal(home.path())
        .current_dir(home.path())
        .arg("sample")
        .assert()
        .success()
        .stdout(predicate::str::contains("sample_trial_balance.xlsx"));
    let bytes = std::fs::read(home.path().join("sample_trial_balance.xlsx")).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn parse_windows_1252_csv_warns() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("legacy.csv");
    std::fs::write(&file, b"Particulars,Debit,Credit\nCaf\xe9 Supplies,100,\nCapital,,100\n").unwrap();
    trialbal(home.path())
        .args(["parse", file.to_str().unwrap(), "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Caf\u{e9} Supplies"))
        .stdout(predicate::str::contains("decoded as Windows-1252"));
}

#[cfg(feature = "pdf")]
#[test]
fn export_pnl_writes_pdf() {
    let home = tempfile::tempdir().unwrap();
    let file = write_tb(home.path());
    trialbal(home.path())
        .args(["import", file.to_str().unwrap()])
        .assert()
        .success();
    let out = home.path().join("pnl.pdf");
    trialbal(home.path())
        .args(["export", "pnl", "--output", out.to_str().unwrap()])
        .assert()
        .success();
    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}
