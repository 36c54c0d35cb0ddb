//! Manifest validation.
//!
//! Catches what would otherwise fail half-way through an apply: blank
//! identifiers, ACL names HAProxy rejects, and duplicate declarations.

use std::collections::HashSet;
use std::fmt;

use crate::manifest::schema::Manifest;

/// A problem found in a manifest, addressed by its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestIssue {
    pub path: String,
    pub message: String,
}

impl fmt::Display for ManifestIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Letters, digits, `-`, `_`, `.` and `:`, case sensitive.
pub fn is_valid_acl_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

pub fn validate_manifest(manifest: &Manifest) -> Result<(), Vec<ManifestIssue>> {
    let mut issues = Vec::new();
    let mut issue = |path: String, message: &str| {
        issues.push(ManifestIssue {
            path,
            message: message.to_string(),
        })
    };

    let mut frontends = HashSet::new();
    for (i, frontend) in manifest.frontends.iter().enumerate() {
        if is_blank(&frontend.name) {
            issue(format!("frontends[{}].name", i), "must not be blank");
        } else if !frontends.insert(frontend.name.as_str()) {
            issue(format!("frontends[{}].name", i), "declared more than once");
        }
    }

    let mut acls = HashSet::new();
    for (i, acl) in manifest.acls.iter().enumerate() {
        if is_blank(&acl.parent_name) {
            issue(format!("acls[{}].parent_name", i), "must not be blank");
        }
        if !is_valid_acl_name(&acl.name) {
            issue(
                format!("acls[{}].name", i),
                "must contain only letters, digits, '-', '_', '.' or ':'",
            );
        } else if !acls.insert((acl.parent_name.as_str(), acl.parent_type, acl.name.as_str())) {
            issue(format!("acls[{}].name", i), "declared more than once for this parent");
        }
        if is_blank(&acl.criterion) {
            issue(format!("acls[{}].criterion", i), "must not be blank");
        }
        if matches!(acl.index, Some(index) if index < 0) {
            issue(format!("acls[{}].index", i), "must not be negative");
        }
    }

    let mut entries = HashSet::new();
    for (i, entry) in manifest.map_entries.iter().enumerate() {
        if is_blank(&entry.map) {
            issue(format!("map_entries[{}].map", i), "must not be blank");
        }
        if is_blank(&entry.key) {
            issue(format!("map_entries[{}].key", i), "must not be blank");
        } else if !entries.insert((entry.map.as_str(), entry.key.as_str())) {
            issue(format!("map_entries[{}].key", i), "declared more than once for this map");
        }
        if is_blank(&entry.value) {
            issue(format!("map_entries[{}].value", i), "must not be blank");
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
