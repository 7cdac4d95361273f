//! Error types for cgw-publish with contextual messages and exit codes
//!
//! This module provides a unified error type that categorizes errors and provides
//! contextual help messages to users. Fatal errors abort the run before any
//! partial output is written; the publisher result record is the one exception
//! (see `gateway::publisher`).

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for cgw-publish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (manifest, invalid args, missing credentials)
  User = 1,
  /// System error (I/O, hashing, output writing)
  System = 2,
  /// Publisher error (launch failure, non-zero exit)
  Publish = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for cgw-publish
#[derive(Debug)]
pub enum CgwError {
  /// Manifest errors
  Manifest(ManifestError),

  /// Publisher invocation errors
  Publisher(PublisherError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl CgwError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    CgwError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    CgwError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      CgwError::Message { message, context, help } => CgwError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      CgwError::Io(e) => CgwError::Io(io::Error::new(e.kind(), format!("{}: {}", ctx_str, e))),
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      CgwError::Manifest(_) => ExitCode::User,
      CgwError::Publisher(_) => ExitCode::Publish,
      CgwError::Io(_) => ExitCode::System,
      CgwError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      CgwError::Manifest(e) => e.help_message(),
      CgwError::Publisher(e) => e.help_message(),
      CgwError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for CgwError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CgwError::Manifest(e) => write!(f, "{}", e),
      CgwError::Publisher(e) => write!(f, "{}", e),
      CgwError::Io(e) => write!(f, "I/O error: {}", e),
      CgwError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for CgwError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      CgwError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for CgwError {
  fn from(err: io::Error) -> Self {
    CgwError::Io(err)
  }
}

impl From<String> for CgwError {
  fn from(msg: String) -> Self {
    CgwError::message(msg)
  }
}

impl From<&str> for CgwError {
  fn from(msg: &str) -> Self {
    CgwError::message(msg)
  }
}

impl From<serde_json::Error> for CgwError {
  fn from(err: serde_json::Error) -> Self {
    CgwError::message(format!("JSON error: {}", err))
  }
}

impl From<serde_yaml::Error> for CgwError {
  fn from(err: serde_yaml::Error) -> Self {
    CgwError::message(format!("YAML error: {}", err))
  }
}

impl From<std::env::VarError> for CgwError {
  fn from(err: std::env::VarError) -> Self {
    CgwError::message(format!("Environment variable error: {}", err))
  }
}

/// Manifest-related errors
#[derive(Debug)]
pub enum ManifestError {
  /// Manifest file not found
  NotFound { path: PathBuf },

  /// Manifest exists but does not parse or fails validation
  Malformed { path: PathBuf, reason: String },

  /// Missing required field
  MissingField { field: String },
}

impl ManifestError {
  fn help_message(&self) -> Option<String> {
    match self {
      ManifestError::NotFound { .. } => {
        Some("Pass the release data file produced by the pipeline with --manifest.".to_string())
      }
      ManifestError::Malformed { .. } => Some(
        "The manifest must contain a contentGateway object with productName, productCode, productVersionName and components."
          .to_string(),
      ),
      _ => None,
    }
  }
}

impl fmt::Display for ManifestError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ManifestError::NotFound { path } => {
        write!(f, "Manifest not found: {}", path.display())
      }
      ManifestError::Malformed { path, reason } => {
        write!(f, "Malformed manifest {}: {}", path.display(), reason)
      }
      ManifestError::MissingField { field } => {
        write!(f, "Missing required field in manifest: {}", field)
      }
    }
  }
}

/// Publisher invocation errors
#[derive(Debug)]
pub enum PublisherError {
  /// The external command could not be launched at all
  LaunchFailed { command: String, reason: String },

  /// The external command ran and returned a non-zero status
  CommandFailed { status: i32, output: String },
}

impl PublisherError {
  fn help_message(&self) -> Option<String> {
    match self {
      PublisherError::LaunchFailed { command, .. } => Some(format!(
        "Ensure '{}' is installed and on PATH in the pipeline image.",
        command
      )),
      PublisherError::CommandFailed { .. } => {
        Some("The captured publisher output is in the result record; check it for the gateway's diagnostics.".to_string())
      }
    }
  }
}

impl fmt::Display for PublisherError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PublisherError::LaunchFailed { command, reason } => {
        write!(f, "Failed to launch publisher '{}': {}", command, reason)
      }
      PublisherError::CommandFailed { status, output } => {
        write!(f, "Publisher exited with status {}\n{}", status, output.trim_end())
      }
    }
  }
}

/// Result type alias for cgw-publish
pub type CgwResult<T> = Result<T, CgwError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> CgwResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> CgwResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<CgwError>,
{
  fn context(self, ctx: impl Into<String>) -> CgwResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> CgwResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &CgwError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

/// Convert anyhow::Error to CgwError (test helpers and interop)
impl From<anyhow::Error> for CgwError {
  fn from(err: anyhow::Error) -> Self {
    CgwError::message(err.to_string())
  }
}
