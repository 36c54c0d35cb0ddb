//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! gateway call
//!     → client.rs (URL building, Accept + Basic auth headers)
//!     → reqwest (single per-call timeout)
//!     → status classification:
//!         >= 300 → error.rs (`{code, message}` or unknown status)
//!         204    → no content, body never decoded
//!         other  → JSON decoded into the caller's type
//! ```
//!
//! # Design Decisions
//! - One immutable client value, passed explicitly; no global state
//! - The HTTP status stays on the error so callers can classify retries
//! - No retries at this layer

pub mod client;
pub mod error;

pub use client::DataplaneClient;
pub use error::{DataplaneError, DataplaneResult};
