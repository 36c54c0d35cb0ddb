//! Runtime map entry requests under `runtime/maps_entries`.
//!
//! Map entries are applied immediately; `force_sync` decides whether the map
//! file on disk is rewritten at once or on the next periodic sync.

use reqwest::Method;

use crate::models::map_entry::MapEntryValue;
use crate::models::MapEntry;
use crate::transport::client::required;
use crate::transport::{DataplaneClient, DataplaneResult};

pub struct MapEntryGateway<'c> {
    client: &'c DataplaneClient,
}

impl<'c> MapEntryGateway<'c> {
    pub(crate) fn new(client: &'c DataplaneClient) -> Self {
        Self { client }
    }

    fn mutation_query(map: &str, force_sync: bool) -> [(&'static str, String); 2] {
        [("map", map.to_string()), ("force_sync", force_sync.to_string())]
    }

    pub async fn list(&self, map: &str) -> DataplaneResult<Vec<MapEntry>> {
        let url = self
            .client
            .endpoint(&["runtime", "maps_entries"], &[("map", map.to_string())])?;
        let reply: Option<Vec<MapEntry>> = self.client.call(Method::GET, url).await?;
        Ok(reply.unwrap_or_default())
    }

    pub async fn get(&self, key: &str, map: &str) -> DataplaneResult<MapEntry> {
        let url = self
            .client
            .endpoint(&["runtime", "maps_entries", key], &[("map", map.to_string())])?;
        let reply = self.client.call(Method::GET, url.clone()).await?;
        required(reply, &url)
    }

    pub async fn create(&self, entry: &MapEntry, map: &str, force_sync: bool) -> DataplaneResult<MapEntry> {
        let url = self.client.endpoint(
            &["runtime", "maps_entries"],
            &Self::mutation_query(map, force_sync),
        )?;
        let reply = self.client.call_with(Method::POST, url, entry).await?;
        Ok(reply.unwrap_or_else(|| entry.clone()))
    }

    /// Replace the value stored under `entry.key`. Only the value is sent.
    pub async fn update(&self, entry: &MapEntry, map: &str, force_sync: bool) -> DataplaneResult<MapEntry> {
        let url = self.client.endpoint(
            &["runtime", "maps_entries", entry.key.as_str()],
            &Self::mutation_query(map, force_sync),
        )?;
        let body = MapEntryValue { value: &entry.value };
        let reply = self.client.call_with(Method::PUT, url, &body).await?;
        Ok(reply.unwrap_or_else(|| entry.clone()))
    }

    pub async fn delete(&self, key: &str, map: &str, force_sync: bool) -> DataplaneResult<()> {
        let url = self.client.endpoint(
            &["runtime", "maps_entries", key],
            &Self::mutation_query(map, force_sync),
        )?;
        self.client.call_empty(Method::DELETE, url).await
    }
}
