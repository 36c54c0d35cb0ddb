//! ACL lifecycle.
//!
//! Every change runs through the transaction runner. Creates are guarded
//! against duplicate names under the same parent. Updates and deletes target
//! the ACL's index; when the caller does not know it, the index is looked up
//! by name inside the same transaction.

use crate::models::{Acl, AclParent, Transaction};
use crate::orchestrator::guard::ensure_acl_absent;
use crate::orchestrator::{Applied, Mutation, TransactionRunner};
use crate::transport::{DataplaneClient, DataplaneError, DataplaneResult};

struct CreateAcl<'a> {
    parent: &'a AclParent,
    acl: &'a Acl,
}

impl Mutation for CreateAcl<'_> {
    type Output = Acl;

    fn label(&self) -> &'static str {
        "create_acl"
    }

    fn target(&self) -> String {
        self.acl.name.clone()
    }

    async fn precheck(&self, client: &DataplaneClient, transaction: &Transaction) -> DataplaneResult<()> {
        ensure_acl_absent(client, &transaction.id, self.parent, &self.acl.name).await
    }

    async fn stage(&self, client: &DataplaneClient, transaction: &Transaction) -> DataplaneResult<Acl> {
        let acl = match self.acl.index {
            Some(_) => self.acl.clone(),
            None => {
                // Append after the last line of the parent.
                let existing = client.acls().list(self.parent, Some(&transaction.id)).await?;
                self.acl.clone().with_index(existing.len() as i64)
            }
        };
        client.acls().create(&acl, self.parent, &transaction.id).await
    }
}

struct UpdateAcl<'a> {
    parent: &'a AclParent,
    acl: &'a Acl,
}

impl Mutation for UpdateAcl<'_> {
    type Output = Acl;

    fn label(&self) -> &'static str {
        "update_acl"
    }

    fn target(&self) -> String {
        self.acl.name.clone()
    }

    async fn stage(&self, client: &DataplaneClient, transaction: &Transaction) -> DataplaneResult<Acl> {
        let index = target_index(client, transaction, self.parent, self.acl).await?;
        client.acls().update(index, self.acl, self.parent, &transaction.id).await
    }
}

struct DeleteAcl<'a> {
    parent: &'a AclParent,
    acl: &'a Acl,
}

impl Mutation for DeleteAcl<'_> {
    type Output = ();

    fn label(&self) -> &'static str {
        "delete_acl"
    }

    fn target(&self) -> String {
        self.acl.name.clone()
    }

    async fn stage(&self, client: &DataplaneClient, transaction: &Transaction) -> DataplaneResult<()> {
        let index = target_index(client, transaction, self.parent, self.acl).await?;
        client.acls().delete(index, self.parent, &transaction.id).await
    }
}

/// Index given by the caller, or the index of the ACL named `acl.name` in the transaction.
async fn target_index(
    client: &DataplaneClient,
    transaction: &Transaction,
    parent: &AclParent,
    acl: &Acl,
) -> DataplaneResult<i64> {
    if let Some(index) = acl.index {
        return Ok(index);
    }

    let existing = client.acls().list(parent, Some(&transaction.id)).await?;
    let found = find_by_name(existing, &acl.name).ok_or_else(|| DataplaneError::AclNotFound {
        name: acl.name.clone(),
        parent_name: parent.name.clone(),
        parent_type: parent.kind.to_string(),
    })?;
    found.index.ok_or_else(|| DataplaneError::MissingIndex {
        name: acl.name.clone(),
    })
}

fn find_by_name(acls: Vec<Acl>, name: &str) -> Option<Acl> {
    acls.into_iter().find(|acl| acl.name == name)
}

/// Create an ACL under `parent`, refusing duplicates. The id of the result is the ACL name.
pub async fn create(
    runner: &TransactionRunner<'_>,
    parent: &AclParent,
    acl: &Acl,
) -> DataplaneResult<Applied<Acl>> {
    runner.run(&CreateAcl { parent, acl }).await
}

/// Replace the ACL named `acl.name` (or at `acl.index` when set).
pub async fn update(
    runner: &TransactionRunner<'_>,
    parent: &AclParent,
    acl: &Acl,
) -> DataplaneResult<Applied<Acl>> {
    runner.run(&UpdateAcl { parent, acl }).await
}

/// Remove the ACL named `acl.name` (or at `acl.index` when set).
pub async fn delete(
    runner: &TransactionRunner<'_>,
    parent: &AclParent,
    acl: &Acl,
) -> DataplaneResult<Applied<()>> {
    runner.run(&DeleteAcl { parent, acl }).await
}

/// Live ACLs of a parent.
pub async fn list(client: &DataplaneClient, parent: &AclParent) -> DataplaneResult<Vec<Acl>> {
    client.acls().list(parent, None).await
}

/// Live ACL named `name`, if any.
pub async fn read(
    client: &DataplaneClient,
    parent: &AclParent,
    name: &str,
) -> DataplaneResult<Option<Acl>> {
    Ok(find_by_name(list(client, parent).await?, name))
}
