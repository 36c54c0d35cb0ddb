//! Frontend records.
//!
//! Every scalar is optional and omitted from the payload when unset; the
//! nested groups are either fully present or absent.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// `enabled` / `disabled` switch used by many HAProxy options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyMode {
    Http,
    Tcp,
}

impl FromStr for ProxyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(ProxyMode::Http),
            "tcp" => Ok(ProxyMode::Tcp),
            other => Err(format!("unknown mode '{}', expected 'http' or 'tcp'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HttpConnectionMode {
    Httpclose,
    HttpServerClose,
    HttpKeepAlive,
}

/// `option forwardfor`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Forwardfor {
    pub enabled: Toggle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub except: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ifnone: Option<bool>,
}

/// `monitor fail` condition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MonitorFail {
    pub cond: String,
    pub cond_test: String,
}

/// Statistics page options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatsOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_hide_version: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_maxconn: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_refresh_delay: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_show_desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_show_legends: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_show_node_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_uri_prefix: Option<String>,
}

/// A frontend section, keyed by `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Frontend {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_process: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clflog: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clitcpka: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contstats: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_backend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dontlognull: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forwardfor: Option<Forwardfor>,
    #[serde(rename = "http-buffer-request", default, skip_serializing_if = "Option::is_none")]
    pub http_buffer_request: Option<Toggle>,
    #[serde(rename = "http-use-htx", default, skip_serializing_if = "Option::is_none")]
    pub http_use_htx: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_connection_mode: Option<HttpConnectionMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_keep_alive_timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_request_timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub httplog: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_format_sd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_separate_errors: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logasap: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxconn: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ProxyMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_fail: Option<MonitorFail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_options: Option<StatsOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcplog: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id_header: Option<String>,
}

impl Frontend {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
