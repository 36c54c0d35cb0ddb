//! Error taxonomy for Dataplane API calls.

use thiserror::Error;

/// Errors that can occur while talking to the Dataplane API.
#[derive(Debug, Error)]
pub enum DataplaneError {
    /// Connection failure, timeout, or any other reqwest-level failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A success response whose body did not match the expected shape.
    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A success response that carried no body where one was required.
    #[error("empty response from {path}")]
    MissingBody { path: String },

    /// Server-reported error with a `{code, message}` body.
    #[error("{message}")]
    Api {
        status: u16,
        code: i64,
        message: String,
    },

    /// Status >= 300 without a decodable error body.
    #[error("unknown error, status code: {status}")]
    UnknownStatus { status: u16 },

    /// The commit returned 2xx but the transaction did not reach `success`.
    #[error("transaction {id} was not applied (status: {status})")]
    TransactionRejected { id: String, status: String },

    /// Duplicate guard refused to stage a create.
    #[error("Cannot insert {name} which already exist in {parent_name} {parent_type}.")]
    Duplicate {
        name: String,
        parent_name: String,
        parent_type: String,
    },

    /// Duplicate guard refused to create a top-level section, e.g. a frontend.
    #[error("Cannot insert {kind} {name} which already exists.")]
    AlreadyExists { kind: &'static str, name: String },

    /// A created map entry could not be read back.
    #[error("Cannot insert {key}. Space is not allowed.")]
    MalformedIdentifier { key: String },

    /// No ACL with that name exists under the parent.
    #[error("ACL {name} not found in {parent_name} {parent_type}")]
    AclNotFound {
        name: String,
        parent_name: String,
        parent_type: String,
    },

    /// An ACL was targeted for update or delete without an index.
    #[error("ACL {name} has no index and cannot be targeted")]
    MissingIndex { name: String },

    /// Resource id that does not follow the expected format.
    #[error("invalid format: expected {expected}, actual id is {actual}")]
    InvalidId { expected: &'static str, actual: String },

    /// The configured base URL cannot carry path segments.
    #[error("invalid base URL: {0}")]
    BaseUrl(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The orchestrator gave up after the configured number of attempts.
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<DataplaneError>,
    },
}

impl DataplaneError {
    /// HTTP status carried by server-side failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            DataplaneError::Api { status, .. } | DataplaneError::UnknownStatus { status } => {
                Some(*status)
            }
            DataplaneError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the server answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result type for Dataplane operations.
pub type DataplaneResult<T> = Result<T, DataplaneError>;

/// Error body returned by the Dataplane API on failures.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub(crate) struct ErrorBody {
    pub code: i64,
    pub message: String,
}
