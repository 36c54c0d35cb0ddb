//! Duplicate guard.
//!
//! Lists the objects already present (ACLs under a parent, frontends in the
//! configuration) and refuses a create whose name is taken. The check runs
//! inside the transaction but is not atomic with the staged create; the
//! server stays the final authority.

use crate::models::AclParent;
use crate::transport::{DataplaneClient, DataplaneError, DataplaneResult};

/// Fail with [`DataplaneError::Duplicate`] when `name` is among `existing`.
pub fn ensure_unique<'a, I>(existing: I, name: &str, parent: &AclParent) -> DataplaneResult<()>
where
    I: IntoIterator<Item = &'a str>,
{
    if existing.into_iter().any(|candidate| candidate == name) {
        return Err(DataplaneError::Duplicate {
            name: name.to_string(),
            parent_name: parent.name.clone(),
            parent_type: parent.kind.to_string(),
        });
    }
    Ok(())
}

/// Refuse to create ACL `name` if the parent already has one, as seen by the transaction.
pub async fn ensure_acl_absent(
    client: &DataplaneClient,
    transaction_id: &str,
    parent: &AclParent,
    name: &str,
) -> DataplaneResult<()> {
    let acls = client.acls().list(parent, Some(transaction_id)).await?;
    let result = ensure_unique(acls.iter().map(|acl| acl.name.as_str()), name, parent);
    if result.is_err() {
        tracing::warn!(
            acl = %name,
            parent = %parent,
            transaction_id = %transaction_id,
            "Duplicate ACL refused"
        );
    }
    result
}

/// Fail with [`DataplaneError::AlreadyExists`] when a section of `kind` named `name` is among `existing`.
pub fn ensure_unique_section<'a, I>(existing: I, kind: &'static str, name: &str) -> DataplaneResult<()>
where
    I: IntoIterator<Item = &'a str>,
{
    if existing.into_iter().any(|candidate| candidate == name) {
        return Err(DataplaneError::AlreadyExists {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Refuse to create frontend `name` if the transaction already has one.
pub async fn ensure_frontend_absent(
    client: &DataplaneClient,
    transaction_id: &str,
    name: &str,
) -> DataplaneResult<()> {
    let frontends = client.frontends().list(Some(transaction_id)).await?;
    let result = ensure_unique_section(frontends.iter().map(|f| f.name.as_str()), "frontend", name);
    if result.is_err() {
        tracing::warn!(
            frontend = %name,
            transaction_id = %transaction_id,
            "Duplicate frontend refused"
        );
    }
    result
}
