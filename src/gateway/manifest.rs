//! Release manifest parsing
//!
//! The release data file carries a `contentGateway` object with the product
//! identity and the ordered component list. Loaded once per run; read-only
//! afterwards.

use crate::core::error::{CgwError, CgwResult, ManifestError, ResultExt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Top-level shape of the release data file
#[derive(Debug, Clone, Deserialize)]
struct ManifestDocument {
  #[serde(rename = "contentGateway")]
  content_gateway: ReleaseManifest,
}

/// Product identity plus the ordered component list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseManifest {
  #[serde(rename = "productName")]
  pub product_name: String,

  #[serde(rename = "productCode")]
  pub product_code: String,

  #[serde(rename = "productVersionName")]
  pub product_version_name: String,

  pub components: Vec<ComponentSpec>,
}

/// One named component and its publisher-recognized attributes
///
/// `name` is a match key only and never appears in generated metadata. All
/// other keys pass through verbatim, in manifest order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentSpec {
  pub name: String,

  #[serde(flatten)]
  pub attrs: Map<String, Value>,
}

impl ReleaseManifest {
  /// Load and validate the manifest from a release data file
  pub fn load(path: &Path) -> CgwResult<Self> {
    if !path.exists() {
      return Err(CgwError::Manifest(ManifestError::NotFound {
        path: path.to_path_buf(),
      }));
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read manifest from {}", path.display()))?;

    let document: ManifestDocument = serde_json::from_str(&content).map_err(|e| {
      CgwError::Manifest(ManifestError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
      })
    })?;

    let manifest = document.content_gateway;
    manifest.validate()?;
    Ok(manifest)
  }

  /// Validate fields serde cannot express (non-empty match keys)
  fn validate(&self) -> CgwResult<()> {
    for field in [
      ("productName", &self.product_name),
      ("productCode", &self.product_code),
      ("productVersionName", &self.product_version_name),
    ] {
      if field.1.is_empty() {
        return Err(CgwError::Manifest(ManifestError::MissingField {
          field: format!("contentGateway.{}", field.0),
        }));
      }
    }

    for (idx, component) in self.components.iter().enumerate() {
      if component.name.is_empty() {
        return Err(CgwError::Manifest(ManifestError::MissingField {
          field: format!("contentGateway.components[{}].name", idx),
        }));
      }
    }

    Ok(())
  }
}
