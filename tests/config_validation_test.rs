//! Configuration validation tests
//!
//! Tests that verify configuration defaults, loading and range checks.

use httpd_exporter::config::{Config, ResponseCheckConfig};
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp config");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp config");
    file
}

#[test]
fn test_httpd_config_defaults() {
    // Given: A default configuration
    let config = Config::default();

    // Then: Endpoints should match a stock Apache install
    assert_eq!(config.httpd.host, "127.0.0.1");
    assert_eq!(config.httpd.port, 80);
    assert_eq!(config.httpd.timeout_seconds, 3);
    assert_eq!(config.httpd.status_path, "/server-status");
    assert_eq!(config.httpd.info_path, "/server-info");
    assert_eq!(config.httpd.server_binary_path, "/usr/sbin/httpd");
    assert!(!config.httpd.ssl);
    assert!(config.httpd.verify_ssl);
    assert!(!config.httpd.hostname.is_empty());
}

#[test]
fn test_response_check_disabled_by_default() {
    // Given: A default configuration
    let config = Config::default();

    // Then: No response check should be configured
    assert!(config.response_check.is_none());
}

#[test]
fn test_response_check_config_defaults() {
    // Given: A default response check section
    let check = ResponseCheckConfig::default();

    // Then: Defaults should describe a local check with the legacy user agent
    assert_eq!(check.path, "/");
    assert_eq!(check.virtual_host, "localhost");
    assert_eq!(check.user_agent, "blackbird response check");
    assert!(check.verify_ssl);
}

#[test]
fn test_load_minimal_file_fills_defaults() {
    // Given: A file that only sets the attribution hostname
    let file = write_config("[httpd]\nhostname = \"web01\"\n");

    // When: Loading it
    let config = Config::load(file.path().to_str().unwrap()).expect("Failed to load");

    // Then: Everything else should come from defaults and the probe stays disabled
    assert_eq!(config.httpd.hostname, "web01");
    assert_eq!(config.httpd.port, 80);
    assert_eq!(config.collector.interval_seconds, 60);
    assert!(config.response_check.is_none());
}

#[test]
fn test_load_response_check_section_enables_probe() {
    // Given: A file with a response_check section
    let file = write_config(
        r#"
[httpd]
hostname = "web01"

[response_check]
host = "10.0.0.5"
port = 8080
virtual_host = "www.example.com"
"#,
    );

    // When: Loading it
    let config = Config::load(file.path().to_str().unwrap()).expect("Failed to load");

    // Then: The section's presence enables the probe, omitted keys are defaulted
    let check = config.response_check.expect("response check should be set");
    assert_eq!(check.host, "10.0.0.5");
    assert_eq!(check.port, 8080);
    assert_eq!(check.virtual_host, "www.example.com");
    assert_eq!(check.user_agent, "blackbird response check");
}

#[test]
fn test_timeout_above_limit_rejected() {
    // Given: A timeout above 600 seconds
    let mut config = Config::default();
    config.httpd.timeout_seconds = 601;

    // When: Validating
    let result = config.validate();

    // Then: Validation should name the offending field
    let err = result.unwrap_err();
    assert!(err.to_string().contains("httpd.timeout_seconds"));
}

#[test]
fn test_timeout_at_limit_accepted() {
    let mut config = Config::default();
    config.httpd.timeout_seconds = 600;
    assert!(config.validate().is_ok());
}

#[test]
fn test_response_check_port_zero_rejected() {
    // Given: A response check aimed at port 0
    let mut config = Config::default();
    config.response_check = Some(ResponseCheckConfig {
        port: 0,
        ..ResponseCheckConfig::default()
    });

    // When: Validating
    let err = config.validate().unwrap_err();

    // Then: The probe port range should be enforced
    assert!(err.to_string().contains("response_check.port"));
}

#[test]
fn test_zero_interval_rejected() {
    let mut config = Config::default();
    config.collector.interval_seconds = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_zero_queue_capacity_rejected() {
    let mut config = Config::default();
    config.collector.queue_capacity = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_load_rejects_invalid_values() {
    // Given: A file with an out-of-range timeout
    let file = write_config("[httpd]\ntimeout_seconds = 900\n");

    // When: Loading it
    let result = Config::load(file.path().to_str().unwrap());

    // Then: Loading should fail
    assert!(result.is_err());
}

#[test]
fn test_environment_overrides_file_value() {
    // Given: A file setting the info path and an environment override for it
    let file = write_config("[httpd]\nhostname = \"web01\"\ninfo_path = \"/from-file\"\n");
    std::env::set_var("HTTPD_EXPORTER_HTTPD__INFO_PATH", "/from-env");

    // When: Loading the file
    let result = Config::load(file.path().to_str().unwrap());
    std::env::remove_var("HTTPD_EXPORTER_HTTPD__INFO_PATH");

    // Then: The environment value should win
    let config = result.expect("Failed to load");
    assert_eq!(config.httpd.info_path, "/from-env");
    assert_eq!(config.httpd.hostname, "web01");
}

#[test]
fn test_default_hostname_is_system_hostname() {
    let expected = sysinfo::System::host_name()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string());

    assert_eq!(httpd_exporter::config::detect_hostname(), expected);
}
