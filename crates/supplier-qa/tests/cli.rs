use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const QUESTIONNAIRE_JSON: &str = r#"{
  "id": "supplier-cert",
  "title": "Supplier certification",
  "questions": [
    { "qid": 1001, "prompt": "Do you export controlled goods?", "response": "Y/N",
      "required": true, "comment_type": "YN_WARNING_Y",
      "warning_message": "Export-control documentation will be requested." },
    { "qid": 1002, "prompt": "Are you a registered small business?", "response": "Y/N",
      "required": true, "skip_logic_answer": "0", "skip_logic_jump": "1004" },
    { "qid": 1003, "prompt": "SBA registration number", "response": "TEXT_NUMBER_6",
      "required": true },
    { "qid": 1004, "prompt": "Certifications held",
      "response": "List2List:ISO 9001|Quality|0;AS9100|Aerospace|2" },
    { "qid": 1005, "prompt": "Certification renewal", "response": "DATE", "required": true }
  ]
}"#;

const QUESTIONNAIRE_TOML: &str = r#"
id = "supplier-lint"
title = "Lint fixture"

[[questions]]
qid = 1
prompt = "Certified?"
response = "Y/N"

[[questions]]
qid = 2
prompt = "Loop back"
response = "Y/N"
skip_logic_answer = "1"
skip_logic_jump = "1"
"#;

fn cli() -> Command {
    let mut command = Command::cargo_bin("supplier-qa").expect("bin");
    command.env_remove("SUPPLIER_QA_LOG");
    command
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("fixture written");
    path
}

#[test]
fn parse_prints_options() {
    cli()
        .args(["parse", "DROPDOWN:Level 1(AA);Level 2(AB)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kind: Dropdown"))
        .stdout(predicate::str::contains("option: Level 1 (AA)"));
}

#[test]
fn strict_parse_reports_reason() {
    cli()
        .args(["parse", "--strict", "TEXT_NUMBER_abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a positive integer"));

    cli()
        .args(["parse", "TEXT_NUMBER_abc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("canonical: TEXT"));
}

#[test]
fn zcode_encode_and_decode() {
    cli()
        .args(["zcode", "encode", "S", "WOSB", "VOSB"])
        .assert()
        .success()
        .stdout("22 (010110) S,WOSB,VOSB\n");

    cli()
        .args(["zcode", "decode", "63", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"binary\": \"111111\""));

    cli()
        .args(["zcode", "decode", "64"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the range"));

    cli()
        .args(["zcode", "encode", "--strict", "S", "XYZ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown z-code 'XYZ'"));
}

#[test]
fn lint_reports_backward_skip() {
    let temp = TempDir::new().expect("tempdir");
    let path = write(temp.path(), "form.toml", QUESTIONNAIRE_TOML);

    cli()
        .arg("lint")
        .arg("--questionnaire")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2: skip target 1"))
        .stdout(predicate::str::contains("will be ignored"));

    cli()
        .arg("lint")
        .arg("--strict")
        .arg("--questionnaire")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 issue(s) treated as errors"));
}

#[test]
fn evaluate_reports_skips_and_progress() {
    let temp = TempDir::new().expect("tempdir");
    let form = write(temp.path(), "form.json", QUESTIONNAIRE_JSON);
    let answers = write(temp.path(), "answers.json", r#"{ "1001": "N", "1002": "N" }"#);

    cli()
        .arg("evaluate")
        .arg("--questionnaire")
        .arg(&form)
        .arg("--answers")
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("progress: 2/3 (67%)"))
        .stdout(predicate::str::contains("next: 1005"))
        .stdout(predicate::str::contains("skipped: 1003"))
        .stdout(predicate::str::contains("complete: no"));

    cli()
        .arg("evaluate")
        .arg("--questionnaire")
        .arg(&form)
        .arg("--answers")
        .arg(&answers)
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"percent\": 67"))
        .stdout(predicate::str::contains("\"next_question\": \"1005\""));
}

#[test]
fn evaluate_reports_warning_transitions() {
    let temp = TempDir::new().expect("tempdir");
    let form = write(temp.path(), "form.json", QUESTIONNAIRE_JSON);
    let previous = write(temp.path(), "previous.json", r#"{ "1001": "N" }"#);
    let answers = write(temp.path(), "answers.json", r#"{ "1001": "Y" }"#);

    cli()
        .arg("evaluate")
        .arg("--questionnaire")
        .arg(&form)
        .arg("--answers")
        .arg(&answers)
        .arg("--previous")
        .arg(&previous)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "warning 1001: Export-control documentation will be requested.",
        ))
        .stdout(predicate::str::contains("widgets 1001: warning"));

    cli()
        .arg("evaluate")
        .arg("--questionnaire")
        .arg(&form)
        .arg("--answers")
        .arg(&answers)
        .arg("--previous")
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("warning 1001").not());
}

#[test]
fn evaluate_ignores_answers_only_in_previous() {
    let temp = TempDir::new().expect("tempdir");
    let form = write(temp.path(), "form.json", QUESTIONNAIRE_JSON);
    let previous = write(temp.path(), "previous.json", r#"{ "1001": "N", "1002": "N" }"#);
    let answers = write(temp.path(), "answers.json", r#"{ "1001": "Y", "9999": "x" }"#);

    cli()
        .arg("evaluate")
        .arg("--questionnaire")
        .arg(&form)
        .arg("--answers")
        .arg(&answers)
        .arg("--previous")
        .arg(&previous)
        .assert()
        .success()
        .stdout(predicate::str::contains("progress: 1/4 (25%)"))
        .stdout(predicate::str::contains("next: 1002"))
        .stdout(predicate::str::contains("skipped:").not())
        .stdout(predicate::str::contains(
            "warning 1001: Export-control documentation will be requested.",
        ));
}

#[test]
fn evaluate_finish_requires_completion() {
    let temp = TempDir::new().expect("tempdir");
    let form = write(temp.path(), "form.json", QUESTIONNAIRE_JSON);
    let partial = write(temp.path(), "partial.json", r#"{ "1001": "N" }"#);
    let complete = write(
        temp.path(),
        "complete.json",
        r#"{ "1001": "N", "1002": "N", "1005": "2027-06-30" }"#,
    );

    cli()
        .arg("evaluate")
        .arg("--finish")
        .arg("--questionnaire")
        .arg(&form)
        .arg("--answers")
        .arg(&partial)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not complete"));

    cli()
        .arg("evaluate")
        .arg("--finish")
        .arg("--questionnaire")
        .arg(&form)
        .arg("--answers")
        .arg(&complete)
        .assert()
        .success()
        .stdout(predicate::str::contains("complete: yes"))
        .stdout(predicate::str::contains("answer set: "));
}

#[test]
fn rejects_unknown_questionnaire_extension() {
    let temp = TempDir::new().expect("tempdir");
    let path = write(temp.path(), "form.yaml", QUESTIONNAIRE_JSON);

    cli()
        .arg("lint")
        .arg("--questionnaire")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must have a .json or .toml extension"));
}

#[test]
fn schema_describes_questions() {
    cli()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"questions\""));
}
