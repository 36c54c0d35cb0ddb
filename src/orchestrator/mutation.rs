//! Staged changes the runner can wrap in a transaction.

use std::future::Future;

use serde::Serialize;

use crate::models::Transaction;
use crate::transport::{DataplaneClient, DataplaneResult};

/// One structural change, staged inside a transaction opened by the runner.
///
/// Implementations must not open or commit transactions themselves. `stage`
/// may be called several times, each time with a fresh transaction.
pub trait Mutation: Sync {
    type Output: Send;

    /// Short operation name for logs, e.g. `create_acl`.
    fn label(&self) -> &'static str;

    /// Caller-visible identity of the object (name or key).
    fn target(&self) -> String;

    /// Checks run inside the transaction before staging. Errors abort.
    fn precheck(
        &self,
        _client: &DataplaneClient,
        _transaction: &Transaction,
    ) -> impl Future<Output = DataplaneResult<()>> + Send {
        async { Ok(()) }
    }

    /// Stage the change against `transaction.id`.
    fn stage(
        &self,
        client: &DataplaneClient,
        transaction: &Transaction,
    ) -> impl Future<Output = DataplaneResult<Self::Output>> + Send;
}

/// Result of a committed mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Applied<T> {
    /// Identity of the object, equal to the name or key supplied by the caller.
    pub id: String,

    /// Configuration version reported by the commit.
    pub version: i64,

    /// Server's representation of the staged object.
    pub object: T,
}
