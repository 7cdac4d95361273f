//! Integration tests for `cgw-publish push`
//!
//! The external publisher is a stub shell script installed on a prepended
//! PATH, so these tests are unix-only.

#![cfg(unix)]

use crate::helpers::{TestRelease, cgw_command, path_with};
use anyhow::Result;

fn push_args(release: &TestRelease) -> Vec<String> {
  vec![
    "push".to_string(),
    "--manifest".to_string(),
    release.manifest_path.display().to_string(),
    "--content-dir".to_string(),
    release.content_dir.display().to_string(),
    "--host".to_string(),
    "https://gateway.test/admin".to_string(),
  ]
}

#[test]
fn test_push_end_to_end_with_stub_publisher() -> Result<()> {
  let release = TestRelease::sample()?;
  release.add_file("app-1.0.tar.gz", b"tarball bytes")?;
  release.add_file("sha256-abc.sig", b"sig")?;
  release.add_file("other.txt", b"skipped")?;
  let bin_dir = release.install_stub_publisher("echo metadata pushed")?;

  let results_path = release.path.join("results.txt");
  let mut args = push_args(&release);
  args.push("--results-path".to_string());
  args.push(results_path.display().to_string());

  let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
  let output = cgw_command(&release.path, &arg_refs)
    .env("PATH", path_with(&bin_dir))
    .env("CGW_USERNAME", "svc")
    .env("CGW_PASSWORD", "tok")
    .output()?;

  assert!(
    output.status.success(),
    "push failed: {}",
    String::from_utf8_lossy(&output.stderr)
  );

  // Metadata document: one component record plus one checksum record
  let document = release.read_file("metadata.yaml")?;
  let records: Vec<serde_yaml::Value> = serde_yaml::from_str(&document)?;
  assert_eq!(records.len(), 2);
  assert_eq!(records[0]["type"].as_str().unwrap(), "file");
  assert_eq!(records[0]["action"].as_str().unwrap(), "create");
  assert_eq!(records[1]["metadata"]["label"].as_str().unwrap(), "Checksum - Signature");

  // Result record captures the publisher output
  let result: serde_json::Value = serde_json::from_str(&release.read_file("push-result.json")?)?;
  assert_eq!(result["no_of_files_processed"], serde_json::json!(2));
  assert!(result["metadata_file_path"].as_str().unwrap().ends_with("metadata.yaml"));
  assert!(result["command_output"].as_str().unwrap().contains("metadata pushed"));

  // Results channel points at the result record
  let channel = std::fs::read_to_string(&results_path)?;
  assert!(channel.trim().ends_with("push-result.json"));

  Ok(())
}

#[test]
fn test_push_json_summary() -> Result<()> {
  let release = TestRelease::sample()?;
  release.add_file("app-1.0.tar.gz", b"tarball bytes")?;
  release.add_file("other.txt", b"skipped")?;
  let bin_dir = release.install_stub_publisher("echo ok")?;

  let mut args = push_args(&release);
  args.push("--json".to_string());
  let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
  let output = cgw_command(&release.path, &arg_refs)
    .env("PATH", path_with(&bin_dir))
    .env("CGW_USERNAME", "svc")
    .env("CGW_PASSWORD", "tok")
    .output()?;

  assert!(output.status.success());

  let summary: serde_json::Value = serde_json::from_str(&String::from_utf8_lossy(&output.stdout))?;
  assert_eq!(summary["records"], serde_json::json!(1));
  assert_eq!(summary["skipped"], serde_json::json!(["other.txt"]));
  assert_eq!(summary["publisher_status"], serde_json::json!(0));

  Ok(())
}

#[test]
fn test_push_missing_credentials_fails_before_hashing() -> Result<()> {
  let release = TestRelease::sample()?;
  release.add_file("app-1.0.tar.gz", b"tarball bytes")?;

  let args = push_args(&release);
  let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
  let output = cgw_command(&release.path, &arg_refs)
    .env_remove("CGW_USERNAME")
    .env_remove("CGW_PASSWORD")
    .output()?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("CGW_USERNAME"));
  assert!(!release.file_exists("metadata.yaml"), "no partial output on early failure");

  Ok(())
}

#[test]
fn test_push_publisher_failure_still_writes_result() -> Result<()> {
  let release = TestRelease::sample()?;
  release.add_file("app-1.0.tar.gz", b"tarball bytes")?;
  let bin_dir = release.install_stub_publisher("echo gateway rejected upload >&2\nexit 2")?;

  let args = push_args(&release);
  let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
  let output = cgw_command(&release.path, &arg_refs)
    .env("PATH", path_with(&bin_dir))
    .env("CGW_USERNAME", "svc")
    .env("CGW_PASSWORD", "tok")
    .output()?;

  // Non-zero publisher exit is the task's failure, publisher exit code class
  assert_eq!(output.status.code(), Some(3));

  // But the diagnostics were persisted first
  let result: serde_json::Value = serde_json::from_str(&release.read_file("push-result.json")?)?;
  assert!(result["command_output"].as_str().unwrap().contains("gateway rejected upload"));

  Ok(())
}

#[test]
fn test_push_missing_publisher_binary_is_launch_failure() -> Result<()> {
  let release = TestRelease::sample()?;
  release.add_file("app-1.0.tar.gz", b"tarball bytes")?;
  let empty_bin = release.path.join("empty-bin");
  std::fs::create_dir_all(&empty_bin)?;

  let args = push_args(&release);
  let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
  let output = cgw_command(&release.path, &arg_refs)
    .env("PATH", empty_bin.display().to_string())
    .env("CGW_USERNAME", "svc")
    .env("CGW_PASSWORD", "tok")
    .output()?;

  assert_eq!(output.status.code(), Some(3));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Failed to launch publisher"));
  assert!(
    !release.file_exists("push-result.json"),
    "launch failure happens before any result is written"
  );

  Ok(())
}

#[test]
fn test_push_stub_receives_metadata_path() -> Result<()> {
  let release = TestRelease::sample()?;
  release.add_file("app-1.0.tar.gz", b"tarball bytes")?;
  // Record the arguments the publisher was invoked with
  let bin_dir = release.install_stub_publisher("echo \"$@\" > \"$(dirname \"$0\")/../argv.txt\"")?;

  let args = push_args(&release);
  let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
  let output = cgw_command(&release.path, &arg_refs)
    .env("PATH", path_with(&bin_dir))
    .env("CGW_USERNAME", "svc")
    .env("CGW_PASSWORD", "tok")
    .output()?;

  assert!(output.status.success());

  let argv = release.read_file("argv.txt")?;
  assert!(argv.contains("--CGW_hostname https://gateway.test/admin"));
  assert!(argv.contains("--CGW_username svc"));
  assert!(argv.contains("--CGW_filepath"));
  assert!(argv.contains("metadata.yaml"));

  Ok(())
}
