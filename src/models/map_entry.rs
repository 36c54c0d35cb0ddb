//! Runtime map entries.

use serde::{Deserialize, Serialize};

use crate::transport::error::{DataplaneError, DataplaneResult};

/// One `key value` line of an HAProxy map.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MapEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub key: String,

    pub value: String,
}

impl MapEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: None,
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Body of an update: only the value is ever sent.
#[derive(Debug, Serialize)]
pub(crate) struct MapEntryValue<'a> {
    pub value: &'a str,
}

/// Address of a map entry in the form `map/<map>/entry/<key>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntryId {
    pub map: String,
    pub key: String,
}

impl MapEntryId {
    const FORMAT: &'static str = "map/<mapName>/entry/<key>, e.g. map/test/entry/my-key";

    /// Parse an id; the key may itself contain `/`.
    pub fn parse(id: &str) -> DataplaneResult<Self> {
        let invalid = || DataplaneError::InvalidId {
            expected: Self::FORMAT,
            actual: id.to_string(),
        };

        let rest = id.strip_prefix("map/").ok_or_else(invalid)?;
        let (map, key) = rest.split_once("/entry/").ok_or_else(invalid)?;
        if map.is_empty() || key.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            map: map.to_string(),
            key: key.to_string(),
        })
    }
}

impl std::fmt::Display for MapEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "map/{}/entry/{}", self.map, self.key)
    }
}
