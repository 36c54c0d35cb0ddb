//! Declared state.
//!
//! # Data Flow
//! ```text
//! manifest file (TOML)
//!     → schema.rs (typed frontends, ACLs, map entries)
//!     → validation.rs (blank fields, ACL name charset, duplicates)
//!     → Manifest (validated) → reconcile
//! ```

pub mod schema;
pub mod validation;

use std::fs;
use std::path::Path;

use thiserror::Error;

pub use schema::{AclSpec, Manifest, MapEntrySpec};
pub use validation::{validate_manifest, ManifestIssue};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid manifest: {}", join(.0))]
    Invalid(Vec<ManifestIssue>),
}

fn join(issues: &[ManifestIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate a manifest from TOML text.
pub fn parse_manifest(content: &str) -> Result<Manifest, ManifestError> {
    let manifest: Manifest = toml::from_str(content)?;
    validate_manifest(&manifest).map_err(ManifestError::Invalid)?;
    Ok(manifest)
}

pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    parse_manifest(&fs::read_to_string(path)?)
}
