//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → HAPROXY_* environment overrides
//!     → validation.rs (semantic checks)
//!     → DataplaneConfig (validated, immutable)
//!     → DataplaneClient / RetryPolicy / logging
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::DataplaneConfig;
pub use schema::ObservabilityConfig;
pub use schema::RetryConfig;
pub use schema::ServerConfig;
pub use schema::TimeoutConfig;
