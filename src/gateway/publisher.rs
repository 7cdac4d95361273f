//! External publisher invocation and result record bookkeeping
//!
//! The publisher binary is a black box: it takes the metadata document plus
//! credentials and returns textual diagnostics. We capture that text
//! verbatim into the run's result record and never try to parse it.

use crate::core::config::GatewayCredentials;
use crate::core::error::{CgwError, CgwResult, PublisherError, ResultExt};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Name of the external publisher binary
pub const PUBLISHER_COMMAND: &str = "push-cgw-metadata";

/// Captured outcome of one publisher invocation
#[derive(Debug, Clone)]
pub struct CommandCapture {
  /// Exit status code; None when the process was killed by a signal
  pub status: Option<i32>,
  /// Combined stdout + stderr, treated as opaque text
  pub output: String,
}

impl CommandCapture {
  /// Whether the publisher reported success
  pub fn success(&self) -> bool {
    self.status == Some(0)
  }

  /// Turn a failed invocation into the error surfaced to the pipeline
  pub fn into_error(self) -> CgwError {
    CgwError::Publisher(PublisherError::CommandFailed {
      status: self.status.unwrap_or(-1),
      output: self.output,
    })
  }
}

/// The run's result record, written as JSON after the publisher step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushResult {
  pub no_of_files_processed: usize,
  pub metadata_file_path: String,
  pub command_output: String,
}

impl PushResult {
  /// Write the result record as pretty-printed JSON
  pub fn write(&self, path: &Path) -> CgwResult<()> {
    let body = serde_json::to_string_pretty(self)?;
    fs::write(path, body + "\n").with_context(|| format!("Failed to write result record to {}", path.display()))?;
    Ok(())
  }
}

/// Invoke the publisher with the metadata document
///
/// A spawn failure is fatal; a non-zero exit is returned in the capture so
/// the caller can persist the diagnostics before deciding to fail.
pub fn push_metadata(
  hostname: &str,
  credentials: &GatewayCredentials,
  metadata_path: &Path,
) -> CgwResult<CommandCapture> {
  invoke_publisher(PUBLISHER_COMMAND, hostname, credentials, metadata_path)
}

fn invoke_publisher(
  program: &str,
  hostname: &str,
  credentials: &GatewayCredentials,
  metadata_path: &Path,
) -> CgwResult<CommandCapture> {
  let output = Command::new(program)
    .args(publisher_args(hostname, credentials, metadata_path))
    .output()
    .map_err(|e| {
      CgwError::Publisher(PublisherError::LaunchFailed {
        command: program.to_string(),
        reason: e.to_string(),
      })
    })?;

  let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
  let stderr = String::from_utf8_lossy(&output.stderr);
  if !stderr.is_empty() {
    if !combined.is_empty() && !combined.ends_with('\n') {
      combined.push('\n');
    }
    combined.push_str(&stderr);
  }

  Ok(CommandCapture {
    status: output.status.code(),
    output: combined,
  })
}

/// Argument list for the publisher binary
///
/// The token travels only here, process-to-process; it is never logged.
fn publisher_args(hostname: &str, credentials: &GatewayCredentials, metadata_path: &Path) -> Vec<OsString> {
  vec![
    OsString::from("--CGW_hostname"),
    OsString::from(hostname),
    OsString::from("--CGW_username"),
    OsString::from(&credentials.username),
    OsString::from("--CGW_password"),
    OsString::from(&credentials.token),
    OsString::from("--CGW_filepath"),
    metadata_path.as_os_str().to_os_string(),
  ]
}
