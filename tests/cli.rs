//! Tests for the colframe binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn sleep_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "name,order,sleep").unwrap();
    writeln!(file, "Cheetah,Carnivora,12.1").unwrap();
    writeln!(file, "Owl monkey,Primates,17.0").unwrap();
    writeln!(file, "Dog,Carnivora,10.1").unwrap();
    writeln!(file, "Goat,Artiodactyla,NA").unwrap();
    file
}

fn colframe() -> Command {
    Command::cargo_bin("colframe").unwrap()
}

#[test]
fn test_group_count_as_csv() {
    let file = sleep_csv();
    colframe()
        .arg(file.path())
        .args(["--group-by", "order", "--count", "--format", "csv"])
        .assert()
        .success()
        .stdout("order,n\nCarnivora,2\nPrimates,1\nArtiodactyla,1\n");
}

#[test]
fn test_sort_select_head() {
    let file = sleep_csv();
    colframe()
        .arg(file.path())
        .args(["--select", "name,sleep", "--sort-by", "sleep", "--desc", "--head", "2"])
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout("name,sleep\nOwl monkey,17\nCheetah,12.1\n");
}

#[test]
fn test_json_output() {
    let file = sleep_csv();
    colframe()
        .arg(file.path())
        .args(["--head", "1", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Cheetah\""));
}

#[test]
fn test_table_output() {
    let file = sleep_csv();
    colframe()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("A Table: 4 x 3"))
        .stdout(predicate::str::contains("<Double>"));
}

#[test]
fn test_unknown_column_fails() {
    let file = sleep_csv();
    colframe()
        .arg(file.path())
        .args(["--select", "weight"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("weight"));
}

#[test]
fn test_missing_file_fails() {
    colframe()
        .arg("does-not-exist.csv")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to open file"));
}
