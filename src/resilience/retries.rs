//! Retry logic.
//!
//! # Responsibilities
//! - Decide whether a failed attempt is worth repeating
//! - Carry attempt count and backoff parameters explicitly
//!
//! # Design Decisions
//! - Network failures and undecodable replies are always retryable
//! - Server errors are retryable only for conflicts (406, 409), 429 and 5xx,
//!   unless `retry_all_errors` is set
//! - Client-side refusals (duplicate, missing index, bad id) are never retried;
//!   a 409 on create is caught by the duplicate guard before it can look
//!   like a version conflict

use std::time::Duration;

use crate::config::RetryConfig;
use crate::resilience::backoff::Backoff;
use crate::transport::DataplaneError;

/// Outcome of one attempt of a retryable sequence.
#[derive(Debug)]
pub enum Attempt<T> {
    Done(T),
    Retryable(DataplaneError),
    Fatal(DataplaneError),
}

/// Bounded retry policy for transactional operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub retry_all_errors: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
            retry_all_errors: config.retry_all_errors,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retries.
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Sort the result of an attempt into done, retryable, or fatal.
    pub fn classify<T>(&self, result: Result<T, DataplaneError>) -> Attempt<T> {
        match result {
            Ok(value) => Attempt::Done(value),
            Err(err) if self.is_retryable(&err) => Attempt::Retryable(err),
            Err(err) => Attempt::Fatal(err),
        }
    }

    pub fn is_retryable(&self, err: &DataplaneError) -> bool {
        match err {
            DataplaneError::Http(_)
            | DataplaneError::Decode { .. }
            | DataplaneError::MissingBody { .. }
            | DataplaneError::TransactionRejected { .. } => true,
            DataplaneError::Api { status, .. } | DataplaneError::UnknownStatus { status } => {
                self.retry_all_errors || is_transient_status(*status)
            }
            DataplaneError::Duplicate { .. }
            | DataplaneError::AlreadyExists { .. }
            | DataplaneError::MalformedIdentifier { .. }
            | DataplaneError::AclNotFound { .. }
            | DataplaneError::MissingIndex { .. }
            | DataplaneError::InvalidId { .. }
            | DataplaneError::BaseUrl(_)
            | DataplaneError::Url(_)
            | DataplaneError::RetriesExhausted { .. } => false,
        }
    }

    /// Delay to wait after failed attempt number `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        Backoff::from(self).delay(attempt)
    }
}

/// Version conflicts, throttling and server-side failures.
pub fn is_transient_status(status: u16) -> bool {
    matches!(status, 406 | 409 | 429) || status >= 500
}
