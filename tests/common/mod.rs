//! Shared utilities for integration testing.
//!
//! `FakeDataplane` is an in-memory Dataplane API with versioned transactions;
//! `start_programmable_backend` is a raw TCP server for transport edge cases.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::extract::{Path, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use haproxy_dataplane::config::schema::{RetryConfig, ServerConfig};
use haproxy_dataplane::{DataplaneClient, DataplaneConfig, RetryPolicy, TransactionRunner};

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";
/// `admin:secret`, base64.
const AUTHORIZATION: &str = "Basic YWRtaW46c2VjcmV0";

type Params = Query<HashMap<String, String>>;
type Shared = Arc<Mutex<FakeState>>;

/// Configuration objects, either live or staged in a transaction.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Keyed by `(parent_type, parent_name)`, in index order.
    pub acls: HashMap<(String, String), Vec<Value>>,
    pub frontends: BTreeMap<String, Value>,
}

impl Snapshot {
    pub fn acl_names(&self, parent_type: &str, parent_name: &str) -> Vec<String> {
        self.acls
            .get(&(parent_type.to_string(), parent_name.to_string()))
            .map(|acls| {
                acls.iter()
                    .filter_map(|acl| acl["acl_name"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug)]
pub struct PendingTransaction {
    pub base_version: i64,
    pub staged: Snapshot,
}

#[derive(Debug)]
pub struct FakeState {
    pub version: i64,
    pub committed: Snapshot,
    pub transactions: HashMap<String, PendingTransaction>,
    /// Map name → key → value.
    pub maps: HashMap<String, BTreeMap<String, String>>,
    pub transactions_created: usize,
    pub commits: usize,
    /// Writes by another client, each landing just before the next commit.
    pub concurrent_writes: usize,
    /// Statuses returned by upcoming commits instead of committing.
    pub commit_faults: VecDeque<u16>,
    /// `METHOD /path?query` as received, before decoding.
    pub requests: Vec<String>,
    /// JSON bodies of map entry updates.
    pub map_update_bodies: Vec<Value>,
}

impl FakeState {
    fn new(version: i64) -> Self {
        Self {
            version,
            committed: Snapshot::default(),
            transactions: HashMap::new(),
            maps: HashMap::new(),
            transactions_created: 0,
            commits: 0,
            concurrent_writes: 0,
            commit_faults: VecDeque::new(),
            requests: Vec::new(),
            map_update_bodies: Vec::new(),
        }
    }

    fn snapshot(&self, params: &HashMap<String, String>) -> Option<&Snapshot> {
        match params.get("transaction_id") {
            Some(id) => self.transactions.get(id).map(|txn| &txn.staged),
            None => Some(&self.committed),
        }
    }

    fn staged(&mut self, params: &HashMap<String, String>) -> Option<&mut Snapshot> {
        let id = params.get("transaction_id")?;
        self.transactions.get_mut(id).map(|txn| &mut txn.staged)
    }

    pub fn requests_matching(&self, prefix: &str) -> Vec<String> {
        self.requests
            .iter()
            .filter(|r| r.starts_with(prefix))
            .cloned()
            .collect()
    }
}

/// In-memory Dataplane API bound to an ephemeral port.
pub struct FakeDataplane {
    pub addr: SocketAddr,
    state: Shared,
}

impl FakeDataplane {
    pub async fn start() -> Self {
        Self::start_at_version(1).await
    }

    pub async fn start_at_version(version: i64) -> Self {
        let state: Shared = Arc::new(Mutex::new(FakeState::new(version)));

        let api = Router::new()
            .route("/stats/native", get(stats))
            .route("/configuration/raw", get(raw_configuration))
            .route("/transaction", axum::routing::post(create_transaction))
            .route("/transaction/{id}", put(commit_transaction))
            .route("/configuration/acls", get(list_acls).post(create_acl))
            .route(
                "/configuration/acls/{index}",
                get(get_acl).put(replace_acl).delete(delete_acl),
            )
            .route("/configuration/frontends", get(list_frontends).post(create_frontend))
            .route(
                "/configuration/frontends/{name}",
                get(get_frontend).put(replace_frontend).delete(delete_frontend),
            )
            .route("/runtime/maps_entries", get(list_map_entries).post(create_map_entry))
            .route(
                "/runtime/maps_entries/{key}",
                get(get_map_entry).put(replace_map_entry).delete(delete_map_entry),
            );

        let app = Router::new()
            .nest("/v2/services/haproxy", api)
            .layer(middleware::from_fn(require_auth))
            .layer(middleware::from_fn_with_state(state.clone(), record_request))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn config(&self) -> DataplaneConfig {
        DataplaneConfig {
            retries: RetryConfig {
                max_attempts: 5,
                base_delay_ms: 1,
                max_delay_ms: 10,
                retry_all_errors: false,
            },
            ..backend_config(self.addr)
        }
    }

    pub fn client(&self) -> DataplaneClient {
        DataplaneClient::from_config(&self.config()).unwrap()
    }

    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::from(&self.config().retries)
    }

    /// Seed a live ACL without going through a transaction.
    pub fn seed_acl(&self, parent_type: &str, parent_name: &str, name: &str, criterion: &str, value: &str) {
        let mut state = self.state();
        let acls = state
            .committed
            .acls
            .entry((parent_type.to_string(), parent_name.to_string()))
            .or_default();
        let index = acls.len();
        acls.push(json!({
            "acl_name": name,
            "criterion": criterion,
            "index": index,
            "value": value,
        }));
    }

    pub fn seed_map_entry(&self, map: &str, key: &str, value: &str) {
        self.state()
            .maps
            .entry(map.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }
}

pub fn runner(client: &DataplaneClient, policy: RetryPolicy) -> TransactionRunner<'_> {
    TransactionRunner::new(client, policy)
}

fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "code": status.as_u16(), "message": message })),
    )
        .into_response()
}

fn no_transaction() -> Response {
    error(StatusCode::NOT_FOUND, "transaction not found")
}

async fn record_request(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let uri = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();
    state
        .lock()
        .unwrap()
        .requests
        .push(format!("{} {}", request.method(), uri));
    next.run(request).await
}

async fn require_auth(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .is_some_and(|value| value == AUTHORIZATION);
    if !authorized {
        return error(StatusCode::UNAUTHORIZED, "invalid credentials");
    }
    next.run(request).await
}

async fn stats() -> Json<Value> {
    Json(json!([]))
}

async fn raw_configuration(State(state): State<Shared>) -> Json<Value> {
    let state = state.lock().unwrap();
    Json(json!({ "_version": state.version, "data": "global\n  daemon\n" }))
}

async fn create_transaction(State(state): State<Shared>, Query(params): Params) -> Response {
    let mut state = state.lock().unwrap();
    let version: i64 = match params.get("version").and_then(|v| v.parse().ok()) {
        Some(version) => version,
        None => return error(StatusCode::BAD_REQUEST, "version is required"),
    };
    if version != state.version {
        return error(StatusCode::CONFLICT, "version mismatch");
    }

    state.transactions_created += 1;
    let id = format!("txn-{}", state.transactions_created);
    let staged = state.committed.clone();
    state.transactions.insert(
        id.clone(),
        PendingTransaction {
            base_version: version,
            staged,
        },
    );
    (
        StatusCode::CREATED,
        Json(json!({ "_version": version, "id": id, "status": "in_progress" })),
    )
        .into_response()
}

async fn commit_transaction(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut state = state.lock().unwrap();
    let Some(txn) = state.transactions.remove(&id) else {
        return no_transaction();
    };

    if let Some(status) = state.commit_faults.pop_front() {
        let status = StatusCode::from_u16(status).unwrap();
        return error(status, "injected commit failure");
    }

    if state.concurrent_writes > 0 {
        state.concurrent_writes -= 1;
        state.version += 1;
    }
    if txn.base_version != state.version {
        return error(StatusCode::NOT_ACCEPTABLE, "transaction is outdated");
    }

    state.committed = txn.staged;
    state.version += 1;
    state.commits += 1;
    (
        StatusCode::ACCEPTED,
        Json(json!({ "_version": state.version, "id": id, "status": "success" })),
    )
        .into_response()
}

fn parent_key(params: &HashMap<String, String>) -> Option<(String, String)> {
    Some((
        params.get("parent_type")?.clone(),
        params.get("parent_name")?.clone(),
    ))
}

fn reindex(acls: &mut [Value]) {
    for (i, acl) in acls.iter_mut().enumerate() {
        acl["index"] = json!(i);
    }
}

async fn list_acls(State(state): State<Shared>, Query(params): Params) -> Response {
    let state = state.lock().unwrap();
    let Some(snapshot) = state.snapshot(&params) else {
        return no_transaction();
    };
    let Some(key) = parent_key(&params) else {
        return error(StatusCode::BAD_REQUEST, "parent_name and parent_type are required");
    };
    let acls = snapshot.acls.get(&key).cloned().unwrap_or_default();
    Json(json!({ "_version": state.version, "data": acls })).into_response()
}

async fn get_acl(
    State(state): State<Shared>,
    Path(index): Path<usize>,
    Query(params): Params,
) -> Response {
    let state = state.lock().unwrap();
    let Some(snapshot) = state.snapshot(&params) else {
        return no_transaction();
    };
    let found = parent_key(&params)
        .and_then(|key| snapshot.acls.get(&key))
        .and_then(|acls| acls.get(index));
    match found {
        Some(acl) => Json(json!({ "_version": state.version, "data": acl })).into_response(),
        None => error(StatusCode::NOT_FOUND, "acl not found"),
    }
}

async fn create_acl(
    State(state): State<Shared>,
    Query(params): Params,
    Json(acl): Json<Value>,
) -> Response {
    if acl["criterion"].as_str().map_or(true, str::is_empty) {
        return error(StatusCode::BAD_REQUEST, "criterion in body is required");
    }
    let mut state = state.lock().unwrap();
    let Some(key) = parent_key(&params) else {
        return error(StatusCode::BAD_REQUEST, "parent_name and parent_type are required");
    };
    let Some(staged) = state.staged(&params) else {
        return no_transaction();
    };

    let acls = staged.acls.entry(key).or_default();
    let at = acl["index"].as_u64().map_or(acls.len(), |i| (i as usize).min(acls.len()));
    acls.insert(at, acl);
    reindex(acls);
    (StatusCode::ACCEPTED, Json(acls[at].clone())).into_response()
}

async fn replace_acl(
    State(state): State<Shared>,
    Path(index): Path<usize>,
    Query(params): Params,
    Json(acl): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    let Some(key) = parent_key(&params) else {
        return error(StatusCode::BAD_REQUEST, "parent_name and parent_type are required");
    };
    let Some(staged) = state.staged(&params) else {
        return no_transaction();
    };
    let Some(slot) = staged.acls.get_mut(&key).and_then(|acls| acls.get_mut(index)) else {
        return error(StatusCode::NOT_FOUND, "acl not found");
    };
    *slot = acl;
    slot["index"] = json!(index);
    (StatusCode::ACCEPTED, Json(slot.clone())).into_response()
}

async fn delete_acl(
    State(state): State<Shared>,
    Path(index): Path<usize>,
    Query(params): Params,
) -> Response {
    let mut state = state.lock().unwrap();
    let Some(key) = parent_key(&params) else {
        return error(StatusCode::BAD_REQUEST, "parent_name and parent_type are required");
    };
    let Some(staged) = state.staged(&params) else {
        return no_transaction();
    };
    match staged.acls.get_mut(&key) {
        Some(acls) if index < acls.len() => {
            acls.remove(index);
            reindex(acls);
            StatusCode::ACCEPTED.into_response()
        }
        _ => error(StatusCode::NOT_FOUND, "acl not found"),
    }
}

async fn list_frontends(State(state): State<Shared>, Query(params): Params) -> Response {
    let state = state.lock().unwrap();
    let Some(snapshot) = state.snapshot(&params) else {
        return no_transaction();
    };
    let frontends: Vec<Value> = snapshot.frontends.values().cloned().collect();
    Json(json!({ "_version": state.version, "data": frontends })).into_response()
}

async fn get_frontend(
    State(state): State<Shared>,
    Path(name): Path<String>,
    Query(params): Params,
) -> Response {
    let state = state.lock().unwrap();
    let Some(snapshot) = state.snapshot(&params) else {
        return no_transaction();
    };
    match snapshot.frontends.get(&name) {
        Some(frontend) => Json(json!({ "_version": state.version, "data": frontend })).into_response(),
        None => error(StatusCode::NOT_FOUND, "frontend not found"),
    }
}

async fn create_frontend(
    State(state): State<Shared>,
    Query(params): Params,
    Json(frontend): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    let Some(staged) = state.staged(&params) else {
        return no_transaction();
    };
    let name = frontend["name"].as_str().unwrap_or_default().to_string();
    if staged.frontends.contains_key(&name) {
        return error(StatusCode::CONFLICT, "frontend already exists");
    }
    staged.frontends.insert(name, frontend.clone());
    (StatusCode::ACCEPTED, Json(frontend)).into_response()
}

async fn replace_frontend(
    State(state): State<Shared>,
    Path(name): Path<String>,
    Query(params): Params,
    Json(frontend): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    let Some(staged) = state.staged(&params) else {
        return no_transaction();
    };
    match staged.frontends.get_mut(&name) {
        Some(slot) => {
            *slot = frontend.clone();
            (StatusCode::ACCEPTED, Json(frontend)).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "frontend not found"),
    }
}

async fn delete_frontend(
    State(state): State<Shared>,
    Path(name): Path<String>,
    Query(params): Params,
) -> Response {
    let mut state = state.lock().unwrap();
    let Some(staged) = state.staged(&params) else {
        return no_transaction();
    };
    match staged.frontends.remove(&name) {
        Some(_) => StatusCode::ACCEPTED.into_response(),
        None => error(StatusCode::NOT_FOUND, "frontend not found"),
    }
}

fn map_name(params: &HashMap<String, String>) -> Result<String, Response> {
    params
        .get("map")
        .cloned()
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "map is required"))
}

async fn list_map_entries(State(state): State<Shared>, Query(params): Params) -> Response {
    let map = match map_name(&params) {
        Ok(map) => map,
        Err(response) => return response,
    };
    let state = state.lock().unwrap();
    let entries: Vec<Value> = state
        .maps
        .get(&map)
        .map(|entries| {
            entries
                .iter()
                .map(|(key, value)| json!({ "key": key, "value": value }))
                .collect()
        })
        .unwrap_or_default();
    Json(json!(entries)).into_response()
}

async fn get_map_entry(
    State(state): State<Shared>,
    Path(key): Path<String>,
    Query(params): Params,
) -> Response {
    let map = match map_name(&params) {
        Ok(map) => map,
        Err(response) => return response,
    };
    let state = state.lock().unwrap();
    match state.maps.get(&map).and_then(|entries| entries.get(&key)) {
        Some(value) => Json(json!({ "key": key, "value": value })).into_response(),
        None => error(StatusCode::NOT_FOUND, "entry not found"),
    }
}

/// Keys containing a space are acknowledged but never stored.
async fn create_map_entry(
    State(state): State<Shared>,
    Query(params): Params,
    Json(entry): Json<Value>,
) -> Response {
    let map = match map_name(&params) {
        Ok(map) => map,
        Err(response) => return response,
    };
    let key = entry["key"].as_str().unwrap_or_default().to_string();
    let value = entry["value"].as_str().unwrap_or_default().to_string();

    let mut state = state.lock().unwrap();
    if !key.contains(' ') {
        state.maps.entry(map).or_default().insert(key.clone(), value.clone());
    }
    (StatusCode::CREATED, Json(json!({ "key": key, "value": value }))).into_response()
}

async fn replace_map_entry(
    State(state): State<Shared>,
    Path(key): Path<String>,
    Query(params): Params,
    Json(body): Json<Value>,
) -> Response {
    let map = match map_name(&params) {
        Ok(map) => map,
        Err(response) => return response,
    };
    let mut state = state.lock().unwrap();
    state.map_update_bodies.push(body.clone());
    let value = body["value"].as_str().unwrap_or_default().to_string();
    match state.maps.get_mut(&map).and_then(|entries| entries.get_mut(&key)) {
        Some(slot) => {
            *slot = value.clone();
            Json(json!({ "key": key, "value": value })).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "entry not found"),
    }
}

async fn delete_map_entry(
    State(state): State<Shared>,
    Path(key): Path<String>,
    Query(params): Params,
) -> Response {
    let map = match map_name(&params) {
        Ok(map) => map,
        Err(response) => return response,
    };
    let mut state = state.lock().unwrap();
    match state.maps.get_mut(&map).and_then(|entries| entries.remove(&key)) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => error(StatusCode::NOT_FOUND, "entry not found"),
    }
}

/// Start a programmable mock backend speaking raw HTTP/1.1.
///
/// `f` gets the request line and returns the status and body to send back.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let request_line = read_request_line(&mut socket).await;
                        let (status, body) = f(request_line).await;
                        let status_text = match status {
                            200 => "200 OK",
                            201 => "201 Created",
                            202 => "202 Accepted",
                            204 => "204 No Content",
                            400 => "400 Bad Request",
                            404 => "404 Not Found",
                            406 => "406 Not Acceptable",
                            409 => "409 Conflict",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Read until the end of the request headers and return the request line.
async fn read_request_line(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break buf.len(),
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    // Drain the body before answering.
    while buf.len() < header_end + content_length {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    head.lines().next().unwrap_or_default().to_string()
}

/// Client config pointing at a programmable backend, without retries.
pub fn backend_config(addr: SocketAddr) -> DataplaneConfig {
    DataplaneConfig {
        server: ServerConfig {
            address: addr.to_string(),
            username: USERNAME.to_string(),
            password: PASSWORD.to_string(),
            insecure: true,
        },
        retries: RetryConfig {
            max_attempts: 1,
            ..RetryConfig::default()
        },
        ..DataplaneConfig::default()
    }
}
