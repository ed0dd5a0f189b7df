//! Server version detection
//!
//! Runs `<httpd> -v` and reads the banner's first line:
//!
//! ```text
//! Server version: Apache/2.4.57 (Unix)
//! Server built:   2023-04-05T00:00:00
//! ```

use crate::error::{ExporterError, Result};
use regex::Regex;
use std::sync::LazyLock;
use tokio::process::Command;
use tracing::{debug, warn};

/// Reported when the version cannot be determined
pub const UNKNOWN_VERSION: &str = "Unknown";

static BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Server version: Apache/(\S+) \((.*)\)").expect("valid regex")
});

/// Version and platform from the first line of `httpd -v` output
pub fn parse_version_banner(output: &str) -> Option<(String, String)> {
    let first = output.lines().next()?;
    let caps = BANNER.captures(first)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

async fn run_version_command(binary_path: &str) -> Result<String> {
    let output = Command::new(binary_path)
        .arg("-v")
        .output()
        .await
        .map_err(|e| ExporterError::Process(format!("{}: {}", binary_path, e)))?;

    if !output.status.success() {
        return Err(ExporterError::Process(format!(
            "{} exited with {}",
            binary_path, output.status
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Detect the installed server version, falling back to [`UNKNOWN_VERSION`]
pub async fn detect_server_version(binary_path: &str) -> String {
    let banner = match run_version_command(binary_path).await {
        Ok(banner) => banner,
        Err(e) => {
            warn!("Can not detect httpd version: {}", e);
            return UNKNOWN_VERSION.to_string();
        }
    };

    match parse_version_banner(&banner) {
        Some((version, platform)) => {
            debug!("Detected httpd {} ({})", version, platform);
            version
        }
        None => {
            warn!("Unrecognized httpd version banner from {}", binary_path);
            UNKNOWN_VERSION.to_string()
        }
    }
}
