//! Resource gateways.
//!
//! # Responsibilities
//! - Translate one domain object into one REST call per method
//! - Scope structural changes to a transaction id supplied by the caller
//! - Return the server's canonical representation of the object
//!
//! # Design Decisions
//! - Gateways never open or commit transactions; the orchestrator owns that
//! - Map entries have no transaction concept and take `force_sync` instead
//! - Each gateway borrows the client; constructing one is free

pub mod acl;
pub mod configuration;
pub mod frontend;
pub mod maps;
pub mod stats;
pub mod transaction;

pub use acl::AclGateway;
pub use configuration::ConfigurationGateway;
pub use frontend::FrontendGateway;
pub use maps::MapEntryGateway;
pub use transaction::TransactionGateway;

use serde::Deserialize;

use crate::models::Versioned;
use crate::transport::DataplaneClient;

impl DataplaneClient {
    pub fn acls(&self) -> AclGateway<'_> {
        AclGateway::new(self)
    }

    pub fn configuration(&self) -> ConfigurationGateway<'_> {
        ConfigurationGateway::new(self)
    }

    pub fn frontends(&self) -> FrontendGateway<'_> {
        FrontendGateway::new(self)
    }

    pub fn map_entries(&self) -> MapEntryGateway<'_> {
        MapEntryGateway::new(self)
    }

    pub fn transactions(&self) -> TransactionGateway<'_> {
        TransactionGateway::new(self)
    }
}

/// Query pair for an optional transaction scope.
pub(crate) fn transaction_query(transaction_id: Option<&str>) -> Vec<(&'static str, String)> {
    transaction_id
        .map(|id| vec![("transaction_id", id.to_string())])
        .unwrap_or_default()
}

/// Read replies come wrapped as `{_version, data}`; older servers send the bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped(Versioned<T>),
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped(versioned) => versioned.data,
            Envelope::Bare(data) => data,
        }
    }
}
