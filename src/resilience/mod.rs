//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrated attempt fails:
//!     → retries.rs (classify: done / retryable / fatal)
//!     → backoff.rs (exponential delay with jitter)
//!     → orchestrator restarts the whole sequence
//! ```
//!
//! # Design Decisions
//! - Timeouts live in the transport (one budget per HTTP call)
//! - Retries happen only at whole-sequence granularity
//! - Attempt count is always bounded

pub mod backoff;
pub mod retries;

pub use backoff::Backoff;
pub use retries::{Attempt, RetryPolicy};
