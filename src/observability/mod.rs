//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! gateway / orchestrator / resources
//!     → tracing events and spans (operation id per transaction run)
//!     → logging.rs (EnvFilter + pretty or JSON formatter)
//!     → stderr
//! ```
//!
//! # Design Decisions
//! - Logs go to stderr so stdout stays machine readable for the CLI
//! - `RUST_LOG` wins over the configured level

pub mod logging;
