//! Artifact matching and metadata record generation
//!
//! This is the heart of the tool: every file in the content directory either
//! fans out into one record per matching component, becomes a standalone
//! checksum record, or is skipped. Records are emitted in listing order,
//! then manifest component order, so identical inputs always produce a
//! byte-identical document.

use crate::core::config::{CHECKSUM_PREFIX, RecordDefaults};
use crate::core::error::{CgwResult, ResultExt};
use crate::gateway::checksum::{ContentDigest, download_url, short_url};
use crate::gateway::manifest::{ComponentSpec, ReleaseManifest};
use crate::ui::progress::FileProgress;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// One publish record handed to the external publisher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataRecord {
  /// Always the literal "file"
  #[serde(rename = "type")]
  pub record_type: String,

  /// Always the literal "create"
  pub action: String,

  /// Ordered attribute mapping for the gateway
  pub metadata: Map<String, Value>,
}

/// The generator's output: ordered records plus skipped-file diagnostics
#[derive(Debug, Clone)]
pub struct GeneratedMetadata {
  pub records: Vec<MetadataRecord>,
  pub skipped: Vec<String>,
}

impl GeneratedMetadata {
  /// Serialize the record list to the YAML document the publisher consumes
  pub fn to_yaml(&self) -> CgwResult<String> {
    Ok(serde_yaml::to_string(&self.records)?)
  }

  /// Write the YAML document to the metadata path
  pub fn write_document(&self, path: &Path) -> CgwResult<()> {
    let document = self.to_yaml()?;
    fs::write(path, document).with_context(|| format!("Failed to write metadata to {}", path.display()))?;
    Ok(())
  }
}

/// Generate metadata records for every matchable file in the content directory
///
/// Files are visited in name order. A file matching N components yields N
/// records; an unmatched `sha256*` file yields one checksum record; anything
/// else is skipped and reported back to the caller.
pub fn generate_metadata(
  manifest: &ReleaseManifest,
  content_dir: &Path,
  defaults: &RecordDefaults,
  show_progress: bool,
) -> CgwResult<GeneratedMetadata> {
  let files = list_content_files(content_dir)?;

  let mut progress = if show_progress && !files.is_empty() {
    Some(FileProgress::new(files.len(), "Hashing artifacts"))
  } else {
    None
  };

  let mut records = Vec::new();
  let mut skipped = Vec::new();

  for file_name in &files {
    let matches: Vec<&ComponentSpec> = manifest
      .components
      .iter()
      .filter(|c| file_name.starts_with(&c.name))
      .collect();

    if !matches.is_empty() {
      let digest = ContentDigest::from_file(&content_dir.join(file_name))?;
      for component in matches {
        records.push(component_record(manifest, component, file_name, &digest, defaults));
      }
    } else if file_name.starts_with(CHECKSUM_PREFIX) {
      let digest = ContentDigest::from_file(&content_dir.join(file_name))?;
      records.push(checksum_record(manifest, file_name, &digest, defaults));
    } else {
      skipped.push(file_name.clone());
    }

    if let Some(bar) = progress.as_mut() {
      bar.inc();
    }
  }

  Ok(GeneratedMetadata { records, skipped })
}

/// List regular files in the content directory, sorted by name
///
/// Sorting makes re-runs on identical inputs byte-identical; subdirectories
/// and non-UTF-8 names are ignored.
fn list_content_files(content_dir: &Path) -> CgwResult<Vec<String>> {
  let entries =
    fs::read_dir(content_dir).with_context(|| format!("Failed to list content dir {}", content_dir.display()))?;

  let mut files = Vec::new();
  for entry in entries {
    let entry = entry.with_context(|| format!("Failed to list content dir {}", content_dir.display()))?;
    if entry.file_type().map(|t| t.is_file()).unwrap_or(false)
      && let Ok(name) = entry.file_name().into_string()
    {
      files.push(name);
    }
  }

  files.sort();
  Ok(files)
}

/// Build the record for one (file, matching component) pair
fn component_record(
  manifest: &ReleaseManifest,
  component: &ComponentSpec,
  file_name: &str,
  digest: &ContentDigest,
  defaults: &RecordDefaults,
) -> MetadataRecord {
  // Component attributes pass through verbatim; the `name` match key lives
  // outside `attrs` and never reaches the gateway
  let mut metadata = component.attrs.clone();

  set_computed_fields(&mut metadata, manifest, file_name, digest);
  metadata.insert("label".to_string(), Value::String(file_name.to_string()));
  fill_absent(&mut metadata, defaults);

  MetadataRecord {
    record_type: "file".to_string(),
    action: "create".to_string(),
    metadata,
  }
}

/// Build the record for an unmatched checksum companion file
fn checksum_record(
  manifest: &ReleaseManifest,
  file_name: &str,
  digest: &ContentDigest,
  defaults: &RecordDefaults,
) -> MetadataRecord {
  let mut metadata = defaults.as_map();
  set_computed_fields(&mut metadata, manifest, file_name, digest);
  metadata.insert("label".to_string(), Value::String(checksum_label(file_name).to_string()));

  MetadataRecord {
    record_type: "file".to_string(),
    action: "create".to_string(),
    metadata,
  }
}

/// Classify a checksum companion file by suffix
///
/// Unknown suffixes fall back to the plain "Checksum" label so the field is
/// always set.
fn checksum_label(file_name: &str) -> &'static str {
  if file_name.ends_with(".gpg") {
    "Checksum - GPG"
  } else if file_name.ends_with(".sig") {
    "Checksum - Signature"
  } else {
    "Checksum"
  }
}

/// Set the computed fields every record carries
fn set_computed_fields(metadata: &mut Map<String, Value>, manifest: &ReleaseManifest, file_name: &str, digest: &ContentDigest) {
  metadata.insert("productName".to_string(), Value::String(manifest.product_name.clone()));
  metadata.insert("productCode".to_string(), Value::String(manifest.product_code.clone()));
  metadata.insert(
    "productVersionName".to_string(),
    Value::String(manifest.product_version_name.clone()),
  );
  metadata.insert("downloadURL".to_string(), Value::String(download_url(digest, file_name)));
  metadata.insert(
    "shortURL".to_string(),
    Value::String(short_url(&manifest.product_code, file_name)),
  );
}

/// Fill-if-absent merge: defaults only land on keys the record does not have
///
/// Precedence is fixed: component data wins over defaults.
fn fill_absent(metadata: &mut Map<String, Value>, defaults: &RecordDefaults) {
  for (key, value) in defaults.as_entries() {
    metadata.entry(key).or_insert(value);
  }
}
