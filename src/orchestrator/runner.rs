//! Transaction runner.
//!
//! # State Machine
//! ```text
//! START
//!   → GET configuration (version V)
//!   → POST transaction?version=V
//!   → precheck (duplicate guard)   ── error → classify
//!   → stage mutation
//!   → PUT transaction/{id}
//!   → success (or 204) → DONE
//!
//! classify:
//!   fatal     → ABORT, error returned as is
//!   retryable → backoff, back to START with a fresh transaction
//!   exhausted → RetriesExhausted
//! ```
//!
//! A transaction whose staging failed is never committed; the server drops
//! it on its own, so there is no explicit rollback call.

use tracing::Instrument;
use uuid::Uuid;

use crate::models::TransactionStatus;
use crate::orchestrator::mutation::{Applied, Mutation};
use crate::resilience::{Attempt, RetryPolicy};
use crate::transport::{DataplaneClient, DataplaneError, DataplaneResult};

/// Runs mutations inside versioned transactions, retrying on conflict.
#[derive(Debug, Clone)]
pub struct TransactionRunner<'c> {
    client: &'c DataplaneClient,
    policy: RetryPolicy,
}

impl<'c> TransactionRunner<'c> {
    pub fn new(client: &'c DataplaneClient, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn client(&self) -> &'c DataplaneClient {
        self.client
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Apply `mutation` atomically, restarting the whole sequence on retryable errors.
    pub async fn run<M: Mutation>(&self, mutation: &M) -> DataplaneResult<Applied<M::Output>> {
        let span = tracing::info_span!(
            "transaction",
            operation = mutation.label(),
            target = %mutation.target(),
            operation_id = %Uuid::new_v4(),
        );
        self.run_attempts(mutation).instrument(span).await
    }

    async fn run_attempts<M: Mutation>(&self, mutation: &M) -> DataplaneResult<Applied<M::Output>> {
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            match self.policy.classify(self.attempt(mutation).await) {
                Attempt::Done(applied) => {
                    tracing::info!(attempt, version = applied.version, "Transaction committed");
                    return Ok(applied);
                }
                Attempt::Fatal(err) => {
                    tracing::warn!(attempt, error = %err, "Transaction aborted");
                    return Err(err);
                }
                Attempt::Retryable(err) if attempt >= self.policy.max_attempts => {
                    tracing::error!(attempt, error = %err, "Transaction retries exhausted");
                    return Err(DataplaneError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(err),
                    });
                }
                Attempt::Retryable(err) => {
                    let delay = self.policy.backoff(attempt);
                    tracing::info!(attempt, delay = ?delay, error = %err, "Retrying transaction");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// One pass through the state machine with a fresh transaction.
    async fn attempt<M: Mutation>(&self, mutation: &M) -> DataplaneResult<Applied<M::Output>> {
        let configuration = self.client.configuration().get(None).await?;
        let transaction = self.client.transactions().create(configuration.version).await?;
        tracing::debug!(
            transaction_id = %transaction.id,
            version = configuration.version,
            "Transaction opened"
        );

        mutation.precheck(self.client, &transaction).await?;
        let object = mutation.stage(self.client, &transaction).await?;

        let version = match self.client.transactions().commit(&transaction.id).await? {
            Some(committed) if committed.status != TransactionStatus::Success => {
                return Err(DataplaneError::TransactionRejected {
                    id: committed.id,
                    status: committed.status.to_string(),
                });
            }
            Some(committed) => committed.version,
            // 204: applied on top of the base version.
            None => configuration.version + 1,
        };

        Ok(Applied {
            id: mutation.target(),
            version,
            object,
        })
    }
}
