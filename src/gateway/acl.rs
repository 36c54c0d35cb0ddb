//! ACL requests under `configuration/acls`.

use reqwest::Method;

use crate::gateway::{transaction_query, Envelope};
use crate::models::{Acl, AclParent};
use crate::transport::client::required;
use crate::transport::{DataplaneClient, DataplaneResult};

pub struct AclGateway<'c> {
    client: &'c DataplaneClient,
}

impl<'c> AclGateway<'c> {
    pub(crate) fn new(client: &'c DataplaneClient) -> Self {
        Self { client }
    }

    fn query(parent: &AclParent, transaction_id: Option<&str>) -> Vec<(&'static str, String)> {
        let mut query = parent.query().to_vec();
        query.extend(transaction_query(transaction_id));
        query
    }

    /// All ACLs of a parent, in index order.
    pub async fn list(
        &self,
        parent: &AclParent,
        transaction_id: Option<&str>,
    ) -> DataplaneResult<Vec<Acl>> {
        let url = self
            .client
            .endpoint(&["configuration", "acls"], &Self::query(parent, transaction_id))?;
        let reply: Option<Envelope<Vec<Acl>>> = self.client.call(Method::GET, url).await?;
        Ok(reply.map(Envelope::into_inner).unwrap_or_default())
    }

    pub async fn get(
        &self,
        index: i64,
        parent: &AclParent,
        transaction_id: Option<&str>,
    ) -> DataplaneResult<Acl> {
        let index = index.to_string();
        let url = self.client.endpoint(
            &["configuration", "acls", index.as_str()],
            &Self::query(parent, transaction_id),
        )?;
        let reply: Option<Envelope<Acl>> = self.client.call(Method::GET, url.clone()).await?;
        required(reply, &url).map(Envelope::into_inner)
    }

    /// Stage an ACL creation; the reply carries the server-assigned index.
    /// A 204 echoes back what was sent.
    pub async fn create(
        &self,
        acl: &Acl,
        parent: &AclParent,
        transaction_id: &str,
    ) -> DataplaneResult<Acl> {
        let url = self.client.endpoint(
            &["configuration", "acls"],
            &Self::query(parent, Some(transaction_id)),
        )?;
        let reply = self.client.call_with(Method::POST, url, acl).await?;
        Ok(reply.unwrap_or_else(|| acl.clone()))
    }

    /// Stage a replacement of the ACL line at `index`.
    pub async fn update(
        &self,
        index: i64,
        acl: &Acl,
        parent: &AclParent,
        transaction_id: &str,
    ) -> DataplaneResult<Acl> {
        let path_index = index.to_string();
        let url = self.client.endpoint(
            &["configuration", "acls", path_index.as_str()],
            &Self::query(parent, Some(transaction_id)),
        )?;
        let body = Acl {
            index: Some(index),
            ..acl.clone()
        };
        let reply = self.client.call_with(Method::PUT, url, &body).await?;
        Ok(reply.unwrap_or(body))
    }

    /// Stage removal of the ACL line at `index`.
    pub async fn delete(
        &self,
        index: i64,
        parent: &AclParent,
        transaction_id: &str,
    ) -> DataplaneResult<()> {
        let index = index.to_string();
        let url = self.client.endpoint(
            &["configuration", "acls", index.as_str()],
            &Self::query(parent, Some(transaction_id)),
        )?;
        self.client.call_empty(Method::DELETE, url).await
    }
}
