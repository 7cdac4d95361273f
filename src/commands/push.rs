//! Push command implementation
//!
//! The pipeline step proper: manifest → generate → write document → invoke
//! publisher → write result record → emit the result path. The result record
//! is written even when the publisher fails, so its diagnostics survive; the
//! failure is then propagated as the task's own failure.

use crate::core::config::{GatewayCredentials, PushConfig, RecordDefaults};
use crate::core::error::{CgwResult, ResultExt};
use crate::gateway::manifest::ReleaseManifest;
use crate::gateway::metadata::generate_metadata;
use crate::gateway::publisher::{PushResult, push_metadata};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Machine-readable summary printed under --json
#[derive(Debug, Serialize)]
struct PushSummary {
  records: usize,
  skipped: Vec<String>,
  metadata_file_path: String,
  result_file_path: String,
  publisher_status: Option<i32>,
}

/// Run the push command
pub fn run_push(config: PushConfig, results_path: Option<PathBuf>, json: bool) -> CgwResult<()> {
  config.validate()?;

  let manifest = ReleaseManifest::load(&config.manifest_path)?;

  // Resolve credentials before touching any artifact bytes
  let credentials = GatewayCredentials::from_env()?;

  if !json {
    println!(
      "📦 Generating metadata for {} {} ({} components)",
      manifest.product_name,
      manifest.product_version_name,
      manifest.components.len()
    );
  }

  let defaults = RecordDefaults::default();
  let generated = generate_metadata(&manifest, &config.content_dir, &defaults, !json)?;

  if !json {
    for name in &generated.skipped {
      println!("⏭️  Skipped (no matching component): {}", name);
    }
    println!(
      "📝 Writing {} record(s) to {}",
      generated.records.len(),
      config.metadata_path.display()
    );
  }

  generated.write_document(&config.metadata_path)?;

  if !json {
    println!("🚀 Invoking publisher against {}", config.hostname);
  }

  let capture = push_metadata(&config.hostname, &credentials, &config.metadata_path)?;

  let result = PushResult {
    no_of_files_processed: generated.records.len(),
    metadata_file_path: config.metadata_path.display().to_string(),
    command_output: capture.output.clone(),
  };
  result.write(&config.result_path)?;

  if let Some(path) = results_path {
    fs::write(&path, format!("{}\n", config.result_path.display()))
      .with_context(|| format!("Failed to write results channel {}", path.display()))?;
  }

  if json {
    let summary = PushSummary {
      records: generated.records.len(),
      skipped: generated.skipped,
      metadata_file_path: config.metadata_path.display().to_string(),
      result_file_path: config.result_path.display().to_string(),
      publisher_status: capture.status,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
  } else {
    println!("🧾 Result record: {}", config.result_path.display());
  }

  if !capture.success() {
    return Err(capture.into_error());
  }

  if !json {
    println!("✅ Published {} record(s)", result.no_of_files_processed);
  }

  Ok(())
}
