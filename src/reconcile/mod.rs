//! Converge a running HAProxy towards a manifest.
//!
//! # Responsibilities
//! - Read the live state of every declared object
//! - Create what is missing, update what differs, leave the rest alone
//! - Report what happened per object
//!
//! # Design Decisions
//! - Frontends first, since ACLs may live under them; map entries last
//! - Objects present on the server but absent from the manifest are not touched
//! - Stops at the first error; objects already applied stay applied

use serde::Serialize;
use serde_json::Value;

use crate::manifest::{AclSpec, Manifest, MapEntrySpec};
use crate::models::{Acl, Frontend};
use crate::orchestrator::TransactionRunner;
use crate::resources::{acl, frontend, map_entry};
use crate::transport::DataplaneResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Change {
    Created,
    Updated,
    Unchanged,
}

/// What happened to one declared object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectReport {
    pub kind: &'static str,
    pub id: String,
    pub change: Change,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub objects: Vec<ObjectReport>,
}

impl ReconcileReport {
    fn record(&mut self, kind: &'static str, id: impl Into<String>, change: Change) {
        let id = id.into();
        tracing::info!(kind, id = %id, change = ?change, "Reconciled");
        self.objects.push(ObjectReport { kind, id, change });
    }

    pub fn count(&self, change: Change) -> usize {
        self.objects.iter().filter(|o| o.change == change).count()
    }
}

pub struct Reconciler<'c> {
    runner: TransactionRunner<'c>,
}

impl<'c> Reconciler<'c> {
    pub fn new(runner: TransactionRunner<'c>) -> Self {
        Self { runner }
    }

    pub async fn apply(&self, manifest: &Manifest) -> DataplaneResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        for desired in &manifest.frontends {
            let change = self.frontend(desired).await?;
            report.record("frontend", desired.name.clone(), change);
        }
        for declared in &manifest.acls {
            let change = self.acl(declared).await?;
            let id = format!("{}/{}/{}", declared.parent_type, declared.parent_name, declared.name);
            report.record("acl", id, change);
        }
        for declared in &manifest.map_entries {
            let change = self.map_entry(declared).await?;
            report.record("map_entry", format!("{}/{}", declared.map, declared.key), change);
        }

        Ok(report)
    }

    async fn frontend(&self, desired: &Frontend) -> DataplaneResult<Change> {
        match frontend::read(self.runner.client(), &desired.name).await? {
            None => {
                frontend::create(&self.runner, desired).await?;
                Ok(Change::Created)
            }
            Some(current) if !frontend_matches(&current, desired) => {
                frontend::update(&self.runner, desired).await?;
                Ok(Change::Updated)
            }
            Some(_) => Ok(Change::Unchanged),
        }
    }

    async fn acl(&self, declared: &AclSpec) -> DataplaneResult<Change> {
        let parent = declared.parent();
        let desired = declared.acl();

        match acl::read(self.runner.client(), &parent, &declared.name).await? {
            None => {
                acl::create(&self.runner, &parent, &desired).await?;
                Ok(Change::Created)
            }
            Some(current) if !current.same_rule(&desired) => {
                let target = Acl {
                    index: desired.index.or(current.index),
                    ..desired
                };
                acl::update(&self.runner, &parent, &target).await?;
                Ok(Change::Updated)
            }
            Some(_) => Ok(Change::Unchanged),
        }
    }

    async fn map_entry(&self, declared: &MapEntrySpec) -> DataplaneResult<Change> {
        let client = self.runner.client();

        match map_entry::read(client, &declared.map, &declared.key).await? {
            None => {
                map_entry::create(client, &declared.map, &declared.entry(), declared.force_sync).await?;
                Ok(Change::Created)
            }
            Some(current) if current.value != declared.value => {
                map_entry::update(client, &declared.map, &declared.entry(), declared.force_sync).await?;
                Ok(Change::Updated)
            }
            Some(_) => Ok(Change::Unchanged),
        }
    }
}

/// True when every field set in `desired` has the same value in `current`.
///
/// The server fills in defaults, so `current` may carry more than was declared.
fn frontend_matches(current: &Frontend, desired: &Frontend) -> bool {
    match (serde_json::to_value(current), serde_json::to_value(desired)) {
        (Ok(current), Ok(desired)) => covers(&current, &desired),
        _ => false,
    }
}

fn covers(current: &Value, desired: &Value) -> bool {
    match (current, desired) {
        (Value::Object(current), Value::Object(desired)) => desired
            .iter()
            .all(|(key, want)| current.get(key).is_some_and(|have| covers(have, want))),
        _ => current == desired,
    }
}
