//! Plan command implementation
//!
//! Dry-run counterpart of push: generate the metadata document and print it
//! without writing files or invoking the publisher. The YAML goes to stdout
//! so it can be piped; skipped-file notes go to stderr.

use crate::core::config::RecordDefaults;
use crate::core::error::CgwResult;
use crate::gateway::manifest::ReleaseManifest;
use crate::gateway::metadata::{MetadataRecord, generate_metadata};
use serde::Serialize;
use std::path::Path;

/// Machine-readable plan output printed under --json
#[derive(Debug, Serialize)]
struct PlanSummary<'a> {
  records: &'a [MetadataRecord],
  skipped: &'a [String],
}

/// Run the plan command
pub fn run_plan(manifest_path: &Path, content_dir: &Path, json: bool) -> CgwResult<()> {
  let manifest = ReleaseManifest::load(manifest_path)?;
  let defaults = RecordDefaults::default();
  let generated = generate_metadata(&manifest, content_dir, &defaults, false)?;

  if json {
    let summary = PlanSummary {
      records: &generated.records,
      skipped: &generated.skipped,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
  } else {
    for name in &generated.skipped {
      eprintln!("⏭️  Skipped (no matching component): {}", name);
    }
    print!("{}", generated.to_yaml()?);
  }

  Ok(())
}
