//! Configuration version and transaction records.

use serde::{Deserialize, Serialize};

/// Raw configuration as returned by `GET configuration/raw`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Configuration {
    /// Optimistic-concurrency token.
    #[serde(rename = "_version")]
    pub version: i64,

    /// Opaque configuration text.
    #[serde(default)]
    pub data: String,
}

/// Server-side lifecycle state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Open and accepting staged changes.
    #[serde(rename = "in_progress", alias = "pending")]
    Pending,
    Success,
    Failed,
    /// Base version no longer matches the live configuration.
    Outdated,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "in_progress",
            TransactionStatus::Success => "success",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Outdated => "outdated",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A staging area bound to a base configuration version.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Transaction {
    pub id: String,

    #[serde(rename = "_version", default)]
    pub version: i64,

    pub status: TransactionStatus,
}

/// Envelope used by the API for reads: `{"_version": N, "data": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Versioned<T> {
    #[serde(rename = "_version", default)]
    pub version: Option<i64>,
    pub data: T,
}
