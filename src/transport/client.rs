//! Authenticated HTTP client for the Dataplane API.
//!
//! # Responsibilities
//! - Hold the base URL, credentials and the pooled HTTP client
//! - Attach `Accept` and Basic auth headers to every request
//! - Classify responses into payload, no content, or error

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::schema::{DataplaneConfig, ServerConfig, TimeoutConfig};
use crate::transport::error::{DataplaneError, DataplaneResult, ErrorBody};

const ACCEPT_JSON: &str = "application/json; charset=utf-8";
const API_PREFIX: &str = "v2/services/haproxy/";

/// Immutable handle to one Dataplane API endpoint.
///
/// Cloning is cheap: the underlying reqwest client is reference counted.
#[derive(Clone)]
pub struct DataplaneClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: String,
}

impl DataplaneClient {
    /// Build a client from server credentials and the per-call timeout.
    pub fn new(server: &ServerConfig, timeouts: &TimeoutConfig) -> DataplaneResult<Self> {
        let scheme = if server.insecure { "http" } else { "https" };
        let base_url = Url::parse(&format!("{}://{}/{}", scheme, server.address, API_PREFIX))?;
        if base_url.cannot_be_a_base() {
            return Err(DataplaneError::BaseUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            username: server.username.clone(),
            password: server.password.clone(),
        })
    }

    /// Build a client from a full configuration.
    pub fn from_config(config: &DataplaneConfig) -> DataplaneResult<Self> {
        Self::new(&config.server, &config.timeouts)
    }

    /// Build a client and verify that the API answers with these credentials.
    pub async fn connect(config: &DataplaneConfig) -> DataplaneResult<Self> {
        let client = Self::from_config(config)?;
        client.ping().await?;
        tracing::info!(base_url = %client.base_url, "Connected to Dataplane API");
        Ok(client)
    }

    /// Root of all API paths, e.g. `http://host:5555/v2/services/haproxy/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL. Segments and query values are percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> DataplaneResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DataplaneError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(ACCEPT, ACCEPT_JSON)
            .basic_auth(&self.username, Some(&self.password))
    }

    /// Issue a request without a body and decode the reply.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
    ) -> DataplaneResult<Option<T>> {
        let path = url.path().to_string();
        let builder = self.request(method.clone(), url);
        decode(&method, &path, builder).await
    }

    /// Issue a request with a JSON body and decode the reply.
    pub(crate) async fn call_with<B, T>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> DataplaneResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let path = url.path().to_string();
        let builder = self.request(method.clone(), url).json(body);
        decode(&method, &path, builder).await
    }

    /// Issue a request whose success body is ignored.
    pub(crate) async fn call_empty(&self, method: Method, url: Url) -> DataplaneResult<()> {
        let path = url.path().to_string();
        let response = self.request(method.clone(), url).send().await?;
        check_status(&method, &path, response).await.map(|_| ())
    }
}

impl std::fmt::Debug for DataplaneClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataplaneClient")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .finish()
    }
}

/// Turn `None` from a reply that must carry a body into an error.
pub(crate) fn required<T>(value: Option<T>, url: &Url) -> DataplaneResult<T> {
    value.ok_or_else(|| DataplaneError::MissingBody {
        path: url.path().to_string(),
    })
}

async fn decode<T: DeserializeOwned>(
    method: &Method,
    path: &str,
    builder: RequestBuilder,
) -> DataplaneResult<Option<T>> {
    let response = builder.send().await?;
    let Some(response) = check_status(method, path, response).await? else {
        return Ok(None);
    };

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| DataplaneError::Decode {
            path: path.to_string(),
            source,
        })
}

/// Map status >= 300 to an error and 204 to `None`.
async fn check_status(
    method: &Method,
    path: &str,
    response: reqwest::Response,
) -> DataplaneResult<Option<reqwest::Response>> {
    let status = response.status();
    tracing::debug!(method = %method, path = %path, status = status.as_u16(), "Dataplane response");

    if status.as_u16() >= 300 {
        let body = response.bytes().await.ok();
        return Err(error_from_body(status, body.as_deref()));
    }

    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    Ok(Some(response))
}

fn error_from_body(status: StatusCode, body: Option<&[u8]>) -> DataplaneError {
    match body.map(serde_json::from_slice::<ErrorBody>) {
        Some(Ok(err)) => DataplaneError::Api {
            status: status.as_u16(),
            code: err.code,
            message: err.message,
        },
        _ => DataplaneError::UnknownStatus {
            status: status.as_u16(),
        },
    }
}
