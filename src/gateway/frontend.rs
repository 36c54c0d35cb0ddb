//! Frontend requests under `configuration/frontends`.

use reqwest::Method;

use crate::gateway::{transaction_query, Envelope};
use crate::models::Frontend;
use crate::transport::client::required;
use crate::transport::{DataplaneClient, DataplaneResult};

pub struct FrontendGateway<'c> {
    client: &'c DataplaneClient,
}

impl<'c> FrontendGateway<'c> {
    pub(crate) fn new(client: &'c DataplaneClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, transaction_id: Option<&str>) -> DataplaneResult<Vec<Frontend>> {
        let url = self
            .client
            .endpoint(&["configuration", "frontends"], &transaction_query(transaction_id))?;
        let reply: Option<Envelope<Vec<Frontend>>> = self.client.call(Method::GET, url).await?;
        Ok(reply.map(Envelope::into_inner).unwrap_or_default())
    }

    pub async fn get(&self, name: &str, transaction_id: Option<&str>) -> DataplaneResult<Frontend> {
        let url = self.client.endpoint(
            &["configuration", "frontends", name],
            &transaction_query(transaction_id),
        )?;
        let reply: Option<Envelope<Frontend>> = self.client.call(Method::GET, url.clone()).await?;
        required(reply, &url).map(Envelope::into_inner)
    }

    pub async fn create(&self, frontend: &Frontend, transaction_id: &str) -> DataplaneResult<Frontend> {
        let url = self.client.endpoint(
            &["configuration", "frontends"],
            &transaction_query(Some(transaction_id)),
        )?;
        let reply = self.client.call_with(Method::POST, url, frontend).await?;
        Ok(reply.unwrap_or_else(|| frontend.clone()))
    }

    /// Replace the frontend named `frontend.name`.
    pub async fn update(&self, frontend: &Frontend, transaction_id: &str) -> DataplaneResult<Frontend> {
        let url = self.client.endpoint(
            &["configuration", "frontends", frontend.name.as_str()],
            &transaction_query(Some(transaction_id)),
        )?;
        let reply = self.client.call_with(Method::PUT, url, frontend).await?;
        Ok(reply.unwrap_or_else(|| frontend.clone()))
    }

    pub async fn delete(&self, name: &str, transaction_id: &str) -> DataplaneResult<()> {
        let url = self.client.endpoint(
            &["configuration", "frontends", name],
            &transaction_query(Some(transaction_id)),
        )?;
        self.client.call_empty(Method::DELETE, url).await
    }
}
