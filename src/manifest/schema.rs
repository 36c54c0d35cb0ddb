//! Declared objects, as written in a manifest file.

use serde::{Deserialize, Serialize};

use crate::models::{Acl, AclParent, Frontend, MapEntry, ParentType};

/// Everything a manifest can declare.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Manifest {
    pub frontends: Vec<Frontend>,
    pub acls: Vec<AclSpec>,
    pub map_entries: Vec<MapEntrySpec>,
}

impl Manifest {
    pub fn is_empty(&self) -> bool {
        self.frontends.is_empty() && self.acls.is_empty() && self.map_entries.is_empty()
    }
}

/// An ACL together with the parent it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AclSpec {
    pub parent_name: String,
    pub parent_type: ParentType,
    pub name: String,
    pub criterion: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
}

impl AclSpec {
    pub fn parent(&self) -> AclParent {
        AclParent::new(self.parent_name.clone(), self.parent_type)
    }

    pub fn acl(&self) -> Acl {
        Acl {
            name: self.name.clone(),
            criterion: self.criterion.clone(),
            index: self.index,
            value: self.value.clone(),
        }
    }
}

/// A runtime map entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MapEntrySpec {
    pub map: String,
    pub key: String,

    #[serde(default = "default_value")]
    pub value: String,

    /// Write the map file to disk immediately.
    #[serde(default = "default_force_sync")]
    pub force_sync: bool,
}

fn default_value() -> String {
    "defaultValue".to_string()
}

fn default_force_sync() -> bool {
    true
}

impl MapEntrySpec {
    pub fn entry(&self) -> MapEntry {
        MapEntry::new(self.key.clone(), self.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProxyMode, Toggle};

    #[test]
    fn test_parse_full_manifest() {
        let manifest: Manifest = toml::from_str(
            r#"
            [[frontends]]
            name = "http-in"
            mode = "http"
            maxconn = 2000
            http-buffer-request = "enabled"

            [frontends.forwardfor]
            enabled = "enabled"

            [[acls]]
            parent_name = "http-in"
            parent_type = "frontend"
            name = "is_api"
            criterion = "path_beg"
            value = "/api"

            [[map_entries]]
            map = "hosts"
            key = "test/metrics"
            "#,
        )
        .unwrap();

        let frontend = &manifest.frontends[0];
        assert_eq!(frontend.mode, Some(ProxyMode::Http));
        assert_eq!(frontend.http_buffer_request, Some(Toggle::Enabled));
        assert_eq!(frontend.forwardfor.as_ref().unwrap().enabled, Toggle::Enabled);

        let acl = &manifest.acls[0];
        assert_eq!(acl.parent(), AclParent::frontend("http-in"));
        assert_eq!(acl.acl().index, None);

        let entry = &manifest.map_entries[0];
        assert_eq!(entry.value, "defaultValue");
        assert!(entry.force_sync);
    }

    #[test]
    fn test_empty_manifest() {
        let manifest: Manifest = toml::from_str("").unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_unknown_parent_type_rejected() {
        let result: Result<Manifest, _> = toml::from_str(
            r#"
            [[acls]]
            parent_name = "x"
            parent_type = "listen"
            name = "a"
            criterion = "src"
            value = "1.2.3.4"
            "#,
        );
        assert!(result.is_err());
    }
}
