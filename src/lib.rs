//! HAProxy Dataplane API client with transactional configuration changes.

pub mod config;
pub mod gateway;
pub mod manifest;
pub mod models;
pub mod observability;
pub mod orchestrator;
pub mod reconcile;
pub mod resilience;
pub mod resources;
pub mod transport;

pub use config::schema::DataplaneConfig;
pub use manifest::Manifest;
pub use orchestrator::TransactionRunner;
pub use reconcile::Reconciler;
pub use resilience::RetryPolicy;
pub use transport::{DataplaneClient, DataplaneError, DataplaneResult};
