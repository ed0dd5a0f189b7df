//! Metric Records
//!
//! A [`MetricRecord`] is the unit handed to the delivery channel. Keys follow the
//! Zabbix item layout used by existing consumers:
//!
//! - `httpd.stat[<key>]` - values read from server-status, server-info and the
//!   response probe ([`MetricRecord::stat`])
//! - `httpd.group.<key>` - response probe bookkeeping ([`MetricRecord::group`])
//! - `blackbird.httpd.<key>` - collector self-reporting ([`MetricRecord::agent`])
//! - `httpd.version` - detected server version ([`MetricRecord::server_version`])

use serde::Serialize;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Value carried by a record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One immutable measurement attributed to a logical host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    key: String,
    value: MetricValue,
    host: String,
    clock: u64,
}

impl MetricRecord {
    /// Build a record with an already namespaced key, stamped with the current time
    pub fn new(key: impl Into<String>, value: impl Into<MetricValue>, host: &str) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            host: host.to_string(),
            clock: unix_now(),
        }
    }

    /// `httpd.stat[<key>]`
    pub fn stat(key: &str, value: impl Into<MetricValue>, host: &str) -> Self {
        Self::new(format!("httpd.stat[{}]", key), value, host)
    }

    /// `httpd.group.<key>`
    pub fn group(key: &str, value: impl Into<MetricValue>, host: &str) -> Self {
        Self::new(format!("httpd.group.{}", key), value, host)
    }

    /// `blackbird.httpd.<key>`
    pub fn agent(key: &str, value: impl Into<MetricValue>, host: &str) -> Self {
        Self::new(format!("blackbird.httpd.{}", key), value, host)
    }

    /// `httpd.version`
    pub fn server_version(version: &str, host: &str) -> Self {
        Self::new("httpd.version", version, host)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &MetricValue {
        &self.value
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Unix timestamp (seconds) taken when the record was built
    ///
    /// Wall-clock time, not monotonic: records built across a clock step may
    /// carry decreasing values.
    pub fn clock(&self) -> u64 {
        self.clock
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
