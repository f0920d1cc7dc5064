//! Integration tests for the issue-sheet binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ISSUES_CSV: &str = "\
number,title,state,asignnees,labels
123,ABC,open,john,\"psp_5,osp_2\"
456,DEF,closed,\"mike,michael\",\"enhancement,osp_5,psp_13\"
555,Untriaged,open,,bug
";

const BOARD_JSON: &str = r#"[
  ["pipeline_id", "pipeline_name", "issue_number", "is_epic", "estimate_value", "position"],
  ["opq", "New Issues", 123, false, 3, 0],
  ["opq", "New Issues", 456, true, 8, 1]
]"#;

const EPICS_JSON: &str = r#"{ "456": { "issues": [{ "issue_number": 123, "repo_id": 8514 }] } }"#;

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

fn issue_sheet(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("issue-sheet").unwrap();
    // Keep a developer's ./issue-sheet.toml out of the picture.
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    issue_sheet(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("join"))
        .stdout(predicate::str::contains("links"));
}

#[test]
fn test_join_csv_tracker_with_json_board() {
    let dir = TempDir::new().unwrap();
    let issues = write(dir.path(), "issues.csv", ISSUES_CSV);
    let board = write(dir.path(), "board.json", BOARD_JSON);

    issue_sheet(&dir)
        .args(["join", "--issues", &issues, "--board", &board])
        .args(["--pessimistic-prefix", "psp_", "--optimistic-prefix", "osp_"])
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "pipeline_name,position,is_epic,number,title,state,asignees,labels,most_likely_sp,pessimistic_sp,optimistic_sp\n",
        ))
        .stdout(predicate::str::contains("New Issues,0,false,123,ABC,open,john,,3,5,2\n"))
        .stdout(predicate::str::contains(
            "New Issues,1,true,456,DEF,closed,\"mike,michael\",enhancement,8,13,5\n",
        ))
        .stdout(predicate::str::contains(",,,555,Untriaged,open,,bug,,NaN,NaN\n"));
}

#[test]
fn test_join_with_epic_data_adds_parent_epics() {
    let dir = TempDir::new().unwrap();
    let issues = write(dir.path(), "issues.csv", ISSUES_CSV);
    let board = write(dir.path(), "board.json", BOARD_JSON);
    let epics = write(dir.path(), "epics.json", EPICS_JSON);
    let out = dir.path().join("joined.json");

    issue_sheet(&dir)
        .args(["join", "--issues", &issues, "--board", &board, "--epics", &epics])
        .args(["--output", &out.to_string_lossy()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let joined: Vec<Vec<serde_json::Value>> =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(joined[0].last().unwrap(), "parent_epics");
    assert_eq!(joined[1][9], "456");
    assert_eq!(joined[2][9], "");
    assert_eq!(joined[3][9], "");
}

#[test]
fn test_join_reads_prefixes_and_format_from_config() {
    let dir = TempDir::new().unwrap();
    let issues = write(dir.path(), "issues.csv", ISSUES_CSV);
    let board = write(dir.path(), "board.json", BOARD_JSON);
    write(
        dir.path(),
        "issue-sheet.toml",
        "[labels]\npessimistic_prefix = \"psp_\"\n[output]\nformat = \"csv\"\n",
    );

    issue_sheet(&dir)
        .args(["join", "--issues", &issues, "--board", &board])
        .assert()
        .success()
        .stdout(predicate::str::contains("most_likely_sp,pessimistic_sp\n"))
        .stdout(predicate::str::contains("New Issues,0,false,123,ABC,open,john,osp_2,3,5\n"));
}

#[test]
fn test_join_json_output_writes_whole_numbers_as_integers() {
    let dir = TempDir::new().unwrap();
    let issues = write(dir.path(), "issues.csv", ISSUES_CSV);
    let board = write(dir.path(), "board.json", BOARD_JSON);

    issue_sheet(&dir)
        .args(["join", "--issues", &issues, "--board", &board])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"["New Issues",0,false,123,"ABC","open","john","psp_5,osp_2",3]"#,
        ));
}

#[test]
fn test_join_keeps_numeric_looking_csv_text() {
    let dir = TempDir::new().unwrap();
    let issues = write(
        dir.path(),
        "issues.csv",
        "number,title,state,asignnees,labels\n123,1.10,open,007,1e3\n",
    );
    let board = write(dir.path(), "board.json", BOARD_JSON);

    issue_sheet(&dir)
        .args(["join", "--issues", &issues, "--board", &board, "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New Issues,0,false,123,1.10,open,007,1e3,3\n"));
}

#[test]
fn test_invalid_prefix_in_config_fails() {
    let dir = TempDir::new().unwrap();
    let issues = write(dir.path(), "issues.csv", ISSUES_CSV);
    let board = write(dir.path(), "board.json", BOARD_JSON);
    write(
        dir.path(),
        "issue-sheet.toml",
        "[labels]\noptimistic_prefix = \"a,b\"\n",
    );

    issue_sheet(&dir)
        .args(["join", "--issues", &issues, "--board", &board])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse configuration file"))
        .stderr(predicate::str::contains("invalid label prefix 'a,b'"));
}

#[test]
fn test_join_reports_missing_columns() {
    let dir = TempDir::new().unwrap();
    let issues = write(
        dir.path(),
        "issues.csv",
        "number,title,asignnees\n123,ABC,john\n",
    );
    let board = write(dir.path(), "board.json", BOARD_JSON);

    issue_sheet(&dir)
        .args(["join", "--issues", &issues, "--board", &board])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "insufficient tracker issue column(s): state,labels",
        ));
}

#[test]
fn test_join_rejects_header_only_board() {
    let dir = TempDir::new().unwrap();
    let issues = write(dir.path(), "issues.csv", ISSUES_CSV);
    let board = write(dir.path(), "board.csv", "pipeline_name,issue_number\n");

    issue_sheet(&dir)
        .args(["join", "--issues", &issues, "--board", &board])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no board issues"));
}

#[test]
fn test_invalid_prefix_flag_fails() {
    let dir = TempDir::new().unwrap();
    let issues = write(dir.path(), "issues.csv", ISSUES_CSV);
    let board = write(dir.path(), "board.json", BOARD_JSON);

    issue_sheet(&dir)
        .args(["join", "--issues", &issues, "--board", &board])
        .args(["--pessimistic-prefix", "a,b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid pessimistic_prefix 'a,b'"));
}

#[test]
fn test_issues_subcommand_flattens_payload() {
    let dir = TempDir::new().unwrap();
    let payload = write(
        dir.path(),
        "issues.json",
        r#"[{ "number": 7, "title": "T", "state": "open",
              "assignees": [{ "login": "a" }, { "login": "b" }],
              "labels": [{ "name": "bug" }] }]"#,
    );

    issue_sheet(&dir)
        .args(["issues", &payload, "--format", "csv"])
        .assert()
        .success()
        .stdout("number,title,state,asignnees,labels\n7,T,open,\"a,b\",bug\n");
}

#[test]
fn test_board_subcommand_flattens_payload() {
    let dir = TempDir::new().unwrap();
    let payload = write(
        dir.path(),
        "board.json",
        r#"{ "pipelines": [{ "id": "p1", "name": "Icebox",
              "issues": [{ "issue_number": 9, "is_epic": false }] }] }"#,
    );

    issue_sheet(&dir)
        .args(["board", &payload, "--format", "csv"])
        .assert()
        .success()
        .stdout(
            "pipeline_id,pipeline_name,issue_number,is_epic,estimate_value,position\np1,Icebox,9,false,,\n",
        );
}

#[test]
fn test_links_subcommand_prints_relations() {
    let dir = TempDir::new().unwrap();
    issue_sheet(&dir)
        .args(["links", r#"<U1>; rel="next", <U2>; rel="last", U3; rel="prev""#])
        .assert()
        .success()
        .stdout("{\"next\":\"U1\",\"last\":\"U2\"}\n");
}

#[test]
fn test_explicit_missing_config_fails() {
    let dir = TempDir::new().unwrap();
    issue_sheet(&dir)
        .args(["--config", "absent.toml", "links", "<U1>; rel=next"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read configuration file"));
}
