use crate::error::ExporterError;
use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use sysinfo::System;

/// Upper bound for any request timeout, in seconds.
pub const MAX_TIMEOUT_SECONDS: u64 = 600;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub httpd: HttpdConfig,
    /// Present means the response probe is enabled.
    #[serde(default)]
    pub response_check: Option<ResponseCheckConfig>,
    #[serde(default)]
    pub collector: CollectorConfig,
}

/// Target of the `server-status` and `server-info` endpoints.
#[derive(Debug, Deserialize, Clone)]
pub struct HttpdConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_status_path")]
    pub status_path: String,
    #[serde(default = "default_info_path")]
    pub info_path: String,
    #[serde(default)]
    pub ssl: bool,
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<SecretString>,
    /// Identity the records are attributed to, not the polled address.
    #[serde(default = "detect_hostname")]
    pub hostname: String,
    #[serde(default = "default_server_binary_path")]
    pub server_binary_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResponseCheckConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_check_path")]
    pub path: String,
    #[serde(default = "default_virtual_host")]
    pub virtual_host: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub ssl: bool,
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CollectorConfig {
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    80
}

fn default_timeout() -> u64 {
    3
}

fn default_status_path() -> String {
    "/server-status".to_string()
}

fn default_info_path() -> String {
    "/server-info".to_string()
}

fn default_verify_ssl() -> bool {
    true
}

fn default_server_binary_path() -> String {
    "/usr/sbin/httpd".to_string()
}

fn default_check_path() -> String {
    "/".to_string()
}

fn default_virtual_host() -> String {
    "localhost".to_string()
}

fn default_user_agent() -> String {
    "blackbird response check".to_string()
}

fn default_interval() -> u64 {
    60
}

fn default_queue_capacity() -> usize {
    1024
}

/// System hostname, or `localhost` if the OS does not report one
pub fn detect_hostname() -> String {
    System::host_name()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

impl Default for HttpdConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            status_path: default_status_path(),
            info_path: default_info_path(),
            ssl: false,
            verify_ssl: default_verify_ssl(),
            user: None,
            password: None,
            hostname: detect_hostname(),
            server_binary_path: default_server_binary_path(),
        }
    }
}

impl Default for ResponseCheckConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            path: default_check_path(),
            virtual_host: default_virtual_host(),
            user_agent: default_user_agent(),
            ssl: false,
            verify_ssl: default_verify_ssl(),
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("HTTPD_EXPORTER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Config = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.httpd.timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(ExporterError::Config(format!(
                "httpd.timeout_seconds must be between 0 and {}, got {}",
                MAX_TIMEOUT_SECONDS, self.httpd.timeout_seconds
            )));
        }
        if self.httpd.hostname.is_empty() {
            return Err(ExporterError::Config(
                "httpd.hostname must not be empty".to_string(),
            ));
        }

        if let Some(check) = &self.response_check {
            if check.port == 0 {
                return Err(ExporterError::Config(
                    "response_check.port must be between 1 and 65535".to_string(),
                ));
            }
            if check.timeout_seconds > MAX_TIMEOUT_SECONDS {
                return Err(ExporterError::Config(format!(
                    "response_check.timeout_seconds must be between 0 and {}, got {}",
                    MAX_TIMEOUT_SECONDS, check.timeout_seconds
                )));
            }
        }

        if self.collector.interval_seconds == 0 {
            return Err(ExporterError::Config(
                "collector.interval_seconds must be at least 1".to_string(),
            ));
        }
        if self.collector.queue_capacity == 0 {
            return Err(ExporterError::Config(
                "collector.queue_capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
