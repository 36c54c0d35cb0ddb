//! Raw configuration reads, used to obtain the current version.

use reqwest::Method;

use crate::gateway::transaction_query;
use crate::models::Configuration;
use crate::transport::client::required;
use crate::transport::{DataplaneClient, DataplaneResult};

pub struct ConfigurationGateway<'c> {
    client: &'c DataplaneClient,
}

impl<'c> ConfigurationGateway<'c> {
    pub(crate) fn new(client: &'c DataplaneClient) -> Self {
        Self { client }
    }

    /// `GET configuration/raw`, optionally as seen from inside a transaction.
    pub async fn get(&self, transaction_id: Option<&str>) -> DataplaneResult<Configuration> {
        let url = self
            .client
            .endpoint(&["configuration", "raw"], &transaction_query(transaction_id))?;
        let reply = self.client.call(Method::GET, url.clone()).await?;
        required(reply, &url)
    }

    /// Shortcut for the live configuration version.
    pub async fn version(&self) -> DataplaneResult<i64> {
        Ok(self.get(None).await?.version)
    }
}
