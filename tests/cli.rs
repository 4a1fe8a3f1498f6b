mod common;

use std::fs;

use assert_cmd::Command;
use predicates::str::contains;

use common::TestWorkspace;

fn warehouse() -> Command {
    Command::cargo_bin("survey-warehouse").expect("binary exists")
}

fn build(workspace: &TestWorkspace) {
    let data_dir = workspace.write_surveys();
    warehouse()
        .args([
            "build",
            "--data-dir",
            data_dir.to_str().unwrap(),
            "--database",
            workspace.database().to_str().unwrap(),
        ])
        .assert()
        .success();
}

#[test]
fn build_creates_database_file() {
    let workspace = TestWorkspace::new();
    build(&workspace);
    assert!(workspace.database().exists());
}

#[test]
fn build_fails_when_a_year_is_missing() {
    let workspace = TestWorkspace::new();
    let data_dir = workspace.write_surveys();
    warehouse()
        .args([
            "build",
            "--data-dir",
            data_dir.to_str().unwrap(),
            "--database",
            workspace.database().to_str().unwrap(),
            "--year",
            "2019",
        ])
        .assert()
        .failure()
        .stderr(contains("error:"))
        .stderr(contains("kaggle_survey_2019_responses.csv"));
    assert!(!workspace.database().exists());
}

#[test]
fn query_emits_csv_for_year_specific_selections() {
    let workspace = TestWorkspace::new();
    build(&workspace);
    let output = workspace.path().join("titles.csv");
    warehouse()
        .args([
            "query",
            "--database",
            workspace.database().to_str().unwrap(),
            "--select",
            "Q5:2020,2021",
            "--select",
            "Q23:2022",
            "--format",
            "csv",
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let contents = fs::read_to_string(&output).expect("read output");
    let lines = contents.lines().collect::<Vec<_>>();
    assert!(lines[0].starts_with("surveyed_year,question_index"));
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("2020,Q5,Multiple choice,"));
    assert!(lines[1].ends_with(",Data Analyst,1"));
    assert!(lines[4].starts_with("2022,Q23,"));
}

#[test]
fn query_emits_json() {
    let workspace = TestWorkspace::new();
    build(&workspace);
    let output = warehouse()
        .args([
            "query",
            "--database",
            workspace.database().to_str().unwrap(),
            "--select",
            "Q2:2022",
            "--format",
            "json",
        ])
        .output()
        .expect("run query");
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let rows = rows.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["question_description"], "What is your gender?");
}

#[test]
fn query_rejects_malformed_selector() {
    warehouse()
        .args(["query", "--select", "Q5"])
        .assert()
        .failure()
        .stderr(contains("invalid question selector"));
}

#[test]
fn columns_shows_normalization_rules() {
    let workspace = TestWorkspace::new();
    let data_dir = workspace.write_surveys();
    let input = data_dir.join("kaggle_survey_2020_responses.csv");
    warehouse()
        .args(["columns", "-i", input.to_str().unwrap(), "--year", "2020"])
        .assert()
        .success()
        .stdout(contains("Q29_A_Part_1"))
        .stdout(contains("Q29A"))
        .stdout(contains("lettered"))
        .stdout(contains("Multiple selection"));
}

#[test]
fn questions_lists_one_year() {
    let workspace = TestWorkspace::new();
    build(&workspace);
    warehouse()
        .args([
            "questions",
            "--database",
            workspace.database().to_str().unwrap(),
            "--year",
            "2022",
        ])
        .assert()
        .success()
        .stdout(contains("Q12"))
        .stdout(contains("Are you currently a student?"));
}

#[test]
fn report_writes_topic_csv_files() {
    let workspace = TestWorkspace::new();
    build(&workspace);
    let out_dir = workspace.path().join("report");
    warehouse()
        .args([
            "report",
            "--database",
            workspace.database().to_str().unwrap(),
            "--topic",
            "programming_languages",
            "--topic",
            "job_titles",
            "--output-dir",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success();

    let languages =
        fs::read_to_string(out_dir.join("programming_languages.csv")).expect("languages csv");
    assert!(languages.lines().any(|line| line.starts_with("2022,Q12,")));
    assert!(out_dir.join("job_titles.csv").exists());
    assert!(!out_dir.join("databases.csv").exists());
}

#[test]
fn report_prints_year_panels() {
    let workspace = TestWorkspace::new();
    build(&workspace);
    warehouse()
        .args([
            "report",
            "--database",
            workspace.database().to_str().unwrap(),
            "--topic",
            "job_titles",
        ])
        .assert()
        .success()
        .stdout(contains("== Data science job titles =="))
        .stdout(contains("Data Engineer"));
}

#[test]
fn report_rejects_unknown_topic() {
    let workspace = TestWorkspace::new();
    build(&workspace);
    warehouse()
        .args([
            "report",
            "--database",
            workspace.database().to_str().unwrap(),
            "--topic",
            "salaries",
        ])
        .assert()
        .failure()
        .stderr(contains("unknown topic 'salaries'"));
}

#[test]
fn config_file_supplies_years_and_paths() {
    let workspace = TestWorkspace::new();
    let data_dir = workspace.write_surveys();
    let database = workspace.path().join("out").join("survey.db");
    let config = workspace.write(
        "survey.yaml",
        &format!(
            "data_dir: {}\ndatabase: {}\nyears: [2021]\n",
            data_dir.display(),
            database.display()
        ),
    );
    warehouse()
        .args(["build", "--config", config.to_str().unwrap()])
        .assert()
        .success();
    warehouse()
        .args(["questions", "--config", config.to_str().unwrap(), "--year", "2021"])
        .assert()
        .success()
        .stdout(contains("Q7"));
}

#[test]
fn query_against_missing_database_fails_without_creating_it() {
    let workspace = TestWorkspace::new();
    let database = workspace.path().join("typo.db");
    warehouse()
        .args([
            "query",
            "--database",
            database.to_str().unwrap(),
            "--select",
            "Q5:2020",
        ])
        .assert()
        .failure()
        .stderr(contains("typo.db"));
    assert!(!database.exists());
}

#[test]
fn report_accepts_zero_bar_width() {
    let workspace = TestWorkspace::new();
    build(&workspace);
    warehouse()
        .args([
            "report",
            "--database",
            workspace.database().to_str().unwrap(),
            "--topic",
            "job_titles",
            "--bar-width",
            "0",
        ])
        .assert()
        .success()
        .stdout(contains("Data Scientist"));
}
