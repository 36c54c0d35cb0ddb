//! Transaction open and commit calls.

use reqwest::Method;

use crate::models::Transaction;
use crate::transport::client::required;
use crate::transport::{DataplaneClient, DataplaneResult};

pub struct TransactionGateway<'c> {
    client: &'c DataplaneClient,
}

impl<'c> TransactionGateway<'c> {
    pub(crate) fn new(client: &'c DataplaneClient) -> Self {
        Self { client }
    }

    /// `POST transaction?version=` opens a transaction against `version`.
    pub async fn create(&self, version: i64) -> DataplaneResult<Transaction> {
        let url = self
            .client
            .endpoint(&["transaction"], &[("version", version.to_string())])?;
        let reply = self.client.call(Method::POST, url.clone()).await?;
        required(reply, &url)
    }

    /// `PUT transaction/{id}` applies every staged change atomically.
    ///
    /// `None` means the server answered 204: committed, with no record returned.
    pub async fn commit(&self, id: &str) -> DataplaneResult<Option<Transaction>> {
        let url = self.client.endpoint(&["transaction", id], &[])?;
        self.client.call(Method::PUT, url).await
    }
}
