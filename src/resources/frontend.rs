//! Frontend lifecycle, always inside a transaction.
//!
//! Creates are refused when the name is already taken in the transaction.

use crate::models::{Frontend, Transaction};
use crate::orchestrator::guard::ensure_frontend_absent;
use crate::orchestrator::{Applied, Mutation, TransactionRunner};
use crate::transport::{DataplaneClient, DataplaneResult};

struct CreateFrontend<'a>(&'a Frontend);

impl Mutation for CreateFrontend<'_> {
    type Output = Frontend;

    fn label(&self) -> &'static str {
        "create_frontend"
    }

    fn target(&self) -> String {
        self.0.name.clone()
    }

    async fn precheck(&self, client: &DataplaneClient, transaction: &Transaction) -> DataplaneResult<()> {
        ensure_frontend_absent(client, &transaction.id, &self.0.name).await
    }

    async fn stage(&self, client: &DataplaneClient, transaction: &Transaction) -> DataplaneResult<Frontend> {
        client.frontends().create(self.0, &transaction.id).await
    }
}

struct UpdateFrontend<'a>(&'a Frontend);

impl Mutation for UpdateFrontend<'_> {
    type Output = Frontend;

    fn label(&self) -> &'static str {
        "update_frontend"
    }

    fn target(&self) -> String {
        self.0.name.clone()
    }

    async fn stage(&self, client: &DataplaneClient, transaction: &Transaction) -> DataplaneResult<Frontend> {
        client.frontends().update(self.0, &transaction.id).await
    }
}

struct DeleteFrontend<'a>(&'a str);

impl Mutation for DeleteFrontend<'_> {
    type Output = ();

    fn label(&self) -> &'static str {
        "delete_frontend"
    }

    fn target(&self) -> String {
        self.0.to_string()
    }

    async fn stage(&self, client: &DataplaneClient, transaction: &Transaction) -> DataplaneResult<()> {
        client.frontends().delete(self.0, &transaction.id).await
    }
}

pub async fn create(runner: &TransactionRunner<'_>, frontend: &Frontend) -> DataplaneResult<Applied<Frontend>> {
    runner.run(&CreateFrontend(frontend)).await
}

pub async fn update(runner: &TransactionRunner<'_>, frontend: &Frontend) -> DataplaneResult<Applied<Frontend>> {
    runner.run(&UpdateFrontend(frontend)).await
}

pub async fn delete(runner: &TransactionRunner<'_>, name: &str) -> DataplaneResult<Applied<()>> {
    runner.run(&DeleteFrontend(name)).await
}

/// Live frontend named `name`; `None` when the server answers 404.
pub async fn read(client: &DataplaneClient, name: &str) -> DataplaneResult<Option<Frontend>> {
    match client.frontends().get(name, None).await {
        Ok(frontend) => Ok(Some(frontend)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

pub async fn list(client: &DataplaneClient) -> DataplaneResult<Vec<Frontend>> {
    client.frontends().list(None).await
}
