//! Loading records and batch files from disk.

use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;

use skillmesh_cli::batch;
use skillmesh_cli::commands::{execute, Request, Workspace};
use skillmesh_cli::config::Config;
use skillmesh_cli::error::CliError;
use skillmesh_cli::records::RecordSource;

fn file_with(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const RECORDS: &str = r#"[
  {"id": 10, "fullName": "Grace Hopper", "experienceYears": 30, "expectedSalary": 200000,
   "resumeText": "Compilers and COBOL.", "skills": ["COBOL", "Compilers"]},
  {"id": 11, "fullName": "Linus", "experienceYears": 12, "expectedSalary": 150000,
   "resumeText": "Kernel work in C.", "skills": ["C", "Linux"]},
  {"id": 12, "fullName": "Ada", "skills": ["Mathematics"]}
]"#;

#[test]
fn loads_camel_case_records_with_defaults() {
    let file = file_with(RECORDS);
    let records = RecordSource::File(file.path().to_path_buf()).load().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].full_name, "Grace Hopper");
    assert_eq!(records[2].experience_years, 0);
    assert_eq!(records[2].expected_salary, 0);
}

#[test]
fn file_records_drive_commands() {
    let file = file_with(RECORDS);
    let records = RecordSource::File(file.path().to_path_buf()).load().unwrap();
    let workspace = Workspace::new(records);

    let value = execute(&Request::Rank, &workspace).unwrap();
    let ids: Vec<u64> = value["candidates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![10, 11, 12]);

    let value = execute(&Request::Autocomplete { prefix: "co".into() }, &workspace).unwrap();
    assert_eq!(value["suggestions"], serde_json::json!(["COBOL", "Compilers"]));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = RecordSource::File(dir.path().join("absent.json")).load().unwrap_err();
    assert!(matches!(err, CliError::Io { .. }));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn malformed_json_is_an_input_error() {
    let file = file_with("[{\"id\": 1,");
    let err = RecordSource::File(file.path().to_path_buf()).load().unwrap_err();
    assert!(matches!(err, CliError::Parse { .. }));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn invalid_record_is_rejected() {
    let file = file_with(r#"[{"id": 1, "fullName": "X", "experienceYears": 3}]"#);
    let err = RecordSource::File(file.path().to_path_buf()).load().unwrap_err();
    assert!(matches!(err, CliError::Core(_)));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn batch_file_round_trip() {
    let requests = file_with(
        "{\"op\":\"shortlist\",\"budget\":100000}\n{\"op\":\"search\",\"keyword\":\"Python\"}\n",
    );
    let lines = batch::read_requests(requests.path()).unwrap();
    let workspace = Arc::new(Workspace::new(RecordSource::Demo.load().unwrap()));
    let responses = batch::run(lines, workspace, &Config::default()).await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["trace"]["algorithmName"], "Greedy Shortlist");
    assert_eq!(responses[1]["candidates"].as_array().unwrap().len(), 3);
}
