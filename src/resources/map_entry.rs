//! Runtime map entries.
//!
//! These bypass transactions: each call is applied at once and `force_sync`
//! is the only consistency knob. No retries happen here.

use crate::models::{MapEntry, MapEntryId};
use crate::transport::{DataplaneClient, DataplaneError, DataplaneResult};

/// Add an entry, then read it back.
///
/// HAProxy accepts some malformed keys (e.g. containing spaces) but never
/// stores them, so a failed read-back is reported as a malformed identifier.
pub async fn create(
    client: &DataplaneClient,
    map: &str,
    entry: &MapEntry,
    force_sync: bool,
) -> DataplaneResult<MapEntry> {
    client.map_entries().create(entry, map, force_sync).await?;

    match client.map_entries().get(&entry.key, map).await {
        Ok(stored) => {
            tracing::info!(map = %map, key = %entry.key, force_sync, "Map entry created");
            Ok(stored)
        }
        Err(err) => {
            tracing::warn!(map = %map, key = %entry.key, error = %err, "Map entry not readable after create");
            Err(DataplaneError::MalformedIdentifier {
                key: entry.key.clone(),
            })
        }
    }
}

/// Entry stored under `key`; `None` when the server answers 404.
pub async fn read(client: &DataplaneClient, map: &str, key: &str) -> DataplaneResult<Option<MapEntry>> {
    match client.map_entries().get(key, map).await {
        Ok(entry) => Ok(Some(entry)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

pub async fn list(client: &DataplaneClient, map: &str) -> DataplaneResult<Vec<MapEntry>> {
    client.map_entries().list(map).await
}

/// Replace the value under `entry.key`.
pub async fn update(
    client: &DataplaneClient,
    map: &str,
    entry: &MapEntry,
    force_sync: bool,
) -> DataplaneResult<MapEntry> {
    let updated = client.map_entries().update(entry, map, force_sync).await?;
    tracing::info!(map = %map, key = %entry.key, force_sync, "Map entry updated");
    Ok(updated)
}

pub async fn delete(client: &DataplaneClient, map: &str, key: &str, force_sync: bool) -> DataplaneResult<()> {
    client.map_entries().delete(key, map, force_sync).await?;
    tracing::info!(map = %map, key = %key, force_sync, "Map entry deleted");
    Ok(())
}

/// Adopt an existing entry addressed as `map/<map>/entry/<key>`.
pub async fn import(client: &DataplaneClient, id: &str) -> DataplaneResult<(MapEntryId, MapEntry)> {
    let id = MapEntryId::parse(id)?;
    let entry = client.map_entries().get(&id.key, &id.map).await?;
    Ok((id, entry))
}
