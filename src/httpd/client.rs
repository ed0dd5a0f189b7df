//! HTTP access to httpd diagnostic endpoints
//!
//! A thin wrapper over `reqwest` providing the single capability the collectors
//! need: one timeout-bounded GET, returning the status code and body. No retries
//! are performed at this layer.
//!
//! # Example
//!
//! ```no_run
//! use httpd_exporter::config::HttpdConfig;
//! use httpd_exporter::httpd::{status_url, HttpdClient};
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = HttpdConfig::default();
//! let client = HttpdClient::for_httpd(&config)?;
//! let lines = client
//!     .fetch_lines(&status_url(&config), Duration::from_secs(config.timeout_seconds))
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::config::{HttpdConfig, ResponseCheckConfig};
use crate::error::{ExporterError, Result};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::debug;

/// Query suffix selecting the machine-readable server-status format
pub const STATUS_QUERY: &str = "?auto";

/// Query suffix selecting the configuration section of server-info
pub const INFO_QUERY: &str = "?config";

/// Status code and body of a completed request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Client for one group of httpd endpoints
///
/// Certificate verification is decided per client, so the status endpoint and
/// the response probe can be configured independently.
pub struct HttpdClient {
    http: reqwest::Client,
    credentials: Option<(String, SecretString)>,
}

impl HttpdClient {
    pub fn new(verify_ssl: bool) -> Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!verify_ssl)
            .build()?;
        Ok(Self {
            http,
            credentials: None,
        })
    }

    /// Client for the server-status / server-info endpoints, with basic auth if configured
    pub fn for_httpd(config: &HttpdConfig) -> Result<Self> {
        let client = Self::new(config.verify_ssl)?;
        Ok(match &config.user {
            Some(user) => client.with_basic_auth(
                user,
                config
                    .password
                    .clone()
                    .unwrap_or_else(|| SecretString::from("")),
            ),
            None => client,
        })
    }

    /// Client for the response probe target
    pub fn for_response_check(config: &ResponseCheckConfig) -> Result<Self> {
        Self::new(config.verify_ssl)
    }

    pub fn with_basic_auth(mut self, user: &str, password: SecretString) -> Self {
        self.credentials = Some((user.to_string(), password));
        self
    }

    /// Issue a single GET
    ///
    /// A zero timeout means the request is not time-bounded.
    ///
    /// # Errors
    ///
    /// Returns `ExporterError::Http` on connection failure, timeout, or a body
    /// that cannot be read. Non-200 responses are returned, not treated as errors.
    pub async fn fetch(
        &self,
        url: &str,
        timeout: Duration,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        let mut request = self.http.get(url);
        if !timeout.is_zero() {
            request = request.timeout(timeout);
        }
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, Some(password.expose_secret()));
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("GET {} -> {}", url, status);

        Ok(HttpResponse { status, body })
    }

    /// Fetch a diagnostic page and split it into lines
    ///
    /// # Errors
    ///
    /// * `ExporterError::Http` - the request did not complete
    /// * `ExporterError::UnexpectedStatus` - the server answered with anything but 200
    pub async fn fetch_lines(&self, url: &str, timeout: Duration) -> Result<Vec<String>> {
        let response = self.fetch(url, timeout, &[]).await?;
        if !response.is_ok() {
            return Err(ExporterError::UnexpectedStatus {
                url: url.to_string(),
                status: response.status,
            });
        }
        Ok(response.body.lines().map(str::to_string).collect())
    }
}

fn base_url(ssl: bool, host: &str, port: u16) -> String {
    let scheme = if ssl { "https" } else { "http" };
    format!("{}://{}:{}", scheme, host, port)
}

/// `{scheme}://{host}:{port}{status_path}?auto`
pub fn status_url(config: &HttpdConfig) -> String {
    format!(
        "{}{}{}",
        base_url(config.ssl, &config.host, config.port),
        config.status_path,
        STATUS_QUERY
    )
}

/// `{scheme}://{host}:{port}{info_path}?config`
pub fn info_url(config: &HttpdConfig) -> String {
    format!(
        "{}{}{}",
        base_url(config.ssl, &config.host, config.port),
        config.info_path,
        INFO_QUERY
    )
}

/// `{scheme}://{host}:{port}{path}` of the response probe target
pub fn response_check_url(config: &ResponseCheckConfig) -> String {
    format!(
        "{}{}",
        base_url(config.ssl, &config.host, config.port),
        config.path
    )
}
