//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Manifest used by most tests: one component, simple product identity
pub const SAMPLE_MANIFEST: &str = r#"{
  "contentGateway": {
    "productName": "Sample Product",
    "productCode": "SP",
    "productVersionName": "1.2.0",
    "components": [
      {"name": "app", "type": "FILE"}
    ]
  }
}"#;

/// A throwaway release workspace: manifest file plus a content directory
pub struct TestRelease {
  _root: TempDir,
  pub path: PathBuf,
  pub manifest_path: PathBuf,
  pub content_dir: PathBuf,
}

impl TestRelease {
  /// Create a workspace with the given manifest body
  pub fn new(manifest_json: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    let manifest_path = path.join("data.json");
    std::fs::write(&manifest_path, manifest_json)?;

    let content_dir = path.join("content");
    std::fs::create_dir_all(&content_dir)?;

    Ok(Self {
      _root: root,
      path,
      manifest_path,
      content_dir,
    })
  }

  /// Create a workspace with the sample manifest
  pub fn sample() -> Result<Self> {
    Self::new(SAMPLE_MANIFEST)
  }

  /// Add an artifact file to the content directory
  pub fn add_file(&self, name: &str, bytes: &[u8]) -> Result<()> {
    std::fs::write(self.content_dir.join(name), bytes)?;
    Ok(())
  }

  /// Check if a file exists relative to the workspace root
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Read a file relative to the workspace root
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// Install a stub push-cgw-metadata script; returns the bin dir for PATH
  #[cfg(unix)]
  pub fn install_stub_publisher(&self, body: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let bin_dir = self.path.join("bin");
    std::fs::create_dir_all(&bin_dir)?;
    let script = bin_dir.join("push-cgw-metadata");
    std::fs::write(&script, format!("#!/bin/sh\n{}\n", body))?;
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;
    Ok(bin_dir)
  }
}

/// Build a cgw-publish command without running it (for env/PATH tweaking)
pub fn cgw_command(cwd: &Path, args: &[&str]) -> Command {
  let bin = env!("CARGO_BIN_EXE_cgw-publish");
  let mut cmd = Command::new(bin);
  cmd.current_dir(cwd).args(args);
  cmd
}

/// Run cgw-publish and fail the test if it exits non-zero
pub fn run_cgw(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = cgw_command(cwd, args).output().context("Failed to run cgw-publish")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "cgw-publish command failed: cgw-publish {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// PATH value with the given directory prepended
#[cfg(unix)]
pub fn path_with(dir: &Path) -> String {
  let existing = std::env::var("PATH").unwrap_or_default();
  format!("{}:{}", dir.display(), existing)
}
