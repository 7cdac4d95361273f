//! Run configuration for cgw-publish
//!
//! Everything here is assembled once from CLI arguments and the environment
//! and treated as immutable for the rest of the run. Record defaults live in
//! an explicit struct handed to the generator rather than module-level state.

use crate::core::error::{CgwError, CgwResult, ManifestError};
use serde_json::{Map, Value};
use std::env;
use std::path::{Path, PathBuf};

/// Default content gateway admin endpoint
pub const DEFAULT_HOSTNAME: &str = "https://developers.redhat.com/content-gateway/rest/admin";

/// Environment variable holding the gateway username
pub const USERNAME_VAR: &str = "CGW_USERNAME";

/// Environment variable holding the gateway token
pub const PASSWORD_VAR: &str = "CGW_PASSWORD";

/// File name prefix that marks companion checksum artifacts
pub const CHECKSUM_PREFIX: &str = "sha256";

/// Configuration for a push run
///
/// Output paths default to siblings of the manifest so the pipeline can pick
/// them up from one well-known directory.
#[derive(Debug, Clone)]
pub struct PushConfig {
  pub manifest_path: PathBuf,
  pub content_dir: PathBuf,
  pub hostname: String,
  pub metadata_path: PathBuf,
  pub result_path: PathBuf,
}

impl PushConfig {
  /// Build a push configuration, deriving output paths alongside the manifest
  pub fn new(
    manifest_path: PathBuf,
    content_dir: PathBuf,
    hostname: String,
    metadata_path: Option<PathBuf>,
    result_path: Option<PathBuf>,
  ) -> Self {
    let base = manifest_path.parent().map(Path::to_path_buf).unwrap_or_default();
    let metadata_path = metadata_path.unwrap_or_else(|| base.join("metadata.yaml"));
    let result_path = result_path.unwrap_or_else(|| base.join("push-result.json"));

    Self {
      manifest_path,
      content_dir,
      hostname,
      metadata_path,
      result_path,
    }
  }

  /// Validate the configuration before any file processing
  pub fn validate(&self) -> CgwResult<()> {
    if !self.manifest_path.exists() {
      return Err(CgwError::Manifest(ManifestError::NotFound {
        path: self.manifest_path.clone(),
      }));
    }

    if !self.content_dir.is_dir() {
      return Err(CgwError::with_help(
        format!("Content directory not found: {}", self.content_dir.display()),
        "Pass the directory of built artifacts with --content-dir",
      ));
    }

    if self.hostname.is_empty() {
      return Err(CgwError::message("Gateway hostname must not be empty"));
    }

    Ok(())
  }
}

/// Gateway credentials resolved from the environment
///
/// Never logged and never serialized; the token only ever travels as an
/// argument to the publisher process.
#[derive(Clone)]
pub struct GatewayCredentials {
  pub username: String,
  pub token: String,
}

impl GatewayCredentials {
  /// Resolve credentials from CGW_USERNAME / CGW_PASSWORD
  pub fn from_env() -> CgwResult<Self> {
    let username = env::var(USERNAME_VAR).map_err(|_| {
      CgwError::with_help(
        format!("{} is not set", USERNAME_VAR),
        "Export the gateway service-account username into the task environment",
      )
    })?;
    let token = env::var(PASSWORD_VAR).map_err(|_| {
      CgwError::with_help(
        format!("{} is not set", PASSWORD_VAR),
        "Export the gateway service-account token into the task environment",
      )
    })?;

    Ok(Self { username, token })
  }
}

impl std::fmt::Debug for GatewayCredentials {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("GatewayCredentials")
      .field("username", &self.username)
      .field("token", &"<redacted>")
      .finish()
  }
}

/// Default values merged into every metadata record
///
/// Component attributes always win over these; the generator fills them in
/// only for keys the component (or checksum branch) did not supply.
#[derive(Debug, Clone)]
pub struct RecordDefaults {
  pub file_type: String,
  pub hidden: bool,
  pub invisible: bool,
}

impl Default for RecordDefaults {
  fn default() -> Self {
    Self {
      file_type: "FILE".to_string(),
      hidden: false,
      invisible: false,
    }
  }
}

impl RecordDefaults {
  /// The defaults as an ordered key/value mapping, in serialization order
  pub fn as_entries(&self) -> Vec<(String, Value)> {
    vec![
      ("type".to_string(), Value::String(self.file_type.clone())),
      ("hidden".to_string(), Value::Bool(self.hidden)),
      ("invisible".to_string(), Value::Bool(self.invisible)),
    ]
  }

  /// The defaults as an ordered map (checksum records start from this)
  pub fn as_map(&self) -> Map<String, Value> {
    self.as_entries().into_iter().collect()
  }
}
