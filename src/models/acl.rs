//! ACL records and their parent scope.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of section an ACL lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentType {
    Frontend,
    Backend,
}

impl ParentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParentType::Frontend => "frontend",
            ParentType::Backend => "backend",
        }
    }
}

impl fmt::Display for ParentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frontend" => Ok(ParentType::Frontend),
            "backend" => Ok(ParentType::Backend),
            other => Err(format!(
                "unknown parent type '{}', expected 'frontend' or 'backend'",
                other
            )),
        }
    }
}

/// The `(parent_name, parent_type)` pair that scopes an ACL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct AclParent {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParentType,
}

impl AclParent {
    pub fn new(name: impl Into<String>, kind: ParentType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn frontend(name: impl Into<String>) -> Self {
        Self::new(name, ParentType::Frontend)
    }

    pub fn backend(name: impl Into<String>) -> Self {
        Self::new(name, ParentType::Backend)
    }

    /// Query pairs identifying the parent.
    pub(crate) fn query(&self) -> [(&'static str, String); 2] {
        [
            ("parent_name", self.name.clone()),
            ("parent_type", self.kind.as_str().to_string()),
        ]
    }
}

impl fmt::Display for AclParent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.kind)
    }
}

/// An ACL line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Acl {
    /// Case-sensitive ACL name.
    #[serde(rename = "acl_name")]
    pub name: String,

    /// Sample fetch the ACL evaluates.
    pub criterion: String,

    /// Line index within the parent; assigned by the server when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,

    /// Pattern compared against the criterion.
    #[serde(default)]
    pub value: String,
}

impl Acl {
    pub fn new(name: impl Into<String>, criterion: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            criterion: criterion.into(),
            index: None,
            value: value.into(),
        }
    }

    pub fn with_index(mut self, index: i64) -> Self {
        self.index = Some(index);
        self
    }

    /// True when criterion and value match, ignoring the index.
    pub fn same_rule(&self, other: &Acl) -> bool {
        self.name == other.name && self.criterion == other.criterion && self.value == other.value
    }
}
