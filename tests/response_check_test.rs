//! Response check tests
//!
//! Exercises every outcome of the response probe stage in isolation.

use httpd_exporter::collectors::{
    collect_response_metrics, CollectionContext, CollectionStatus, ResponseProbe,
};
use httpd_exporter::config::{Config, HttpdConfig, ResponseCheckConfig};
use httpd_exporter::httpd::HttpdClient;
use httpd_exporter::record::{MetricRecord, MetricValue};
use httpd_exporter::sink::RecordSink;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn base_config() -> Config {
    Config {
        httpd: HttpdConfig {
            hostname: "web01".to_string(),
            ..HttpdConfig::default()
        },
        ..Config::default()
    }
}

fn check_config(host: &str, port: u16) -> ResponseCheckConfig {
    ResponseCheckConfig {
        host: host.to_string(),
        port,
        timeout_seconds: 2,
        path: "/check".to_string(),
        ..ResponseCheckConfig::default()
    }
}

/// Run the probe stage and return its status and records
async fn probe(check: Option<ResponseCheckConfig>) -> (CollectionStatus, Vec<MetricRecord>) {
    let config = base_config();
    let client = HttpdClient::new(true).expect("Failed to build client");
    let probe = check.map(|c| ResponseProbe::new(c).expect("Failed to build probe"));
    let (sink, mut rx) = RecordSink::bounded(16);

    let ctx = CollectionContext {
        client: &client,
        sink: &sink,
        config: &config,
        probe: probe.as_ref(),
    };
    let status = collect_response_metrics(&ctx).await.expect("probe stage failed");

    let mut records = Vec::new();
    while let Ok(record) = rx.try_recv() {
        records.push(record);
    }
    (status, records)
}

fn keys(records: &[MetricRecord]) -> Vec<&str> {
    records.iter().map(|r| r.key()).collect()
}

fn value_of<'a>(records: &'a [MetricRecord], key: &str) -> &'a MetricValue {
    records
        .iter()
        .find(|r| r.key() == key)
        .map(|r| r.value())
        .unwrap_or_else(|| panic!("missing {}", key))
}

async fn mock_target(status: u16, delay: Duration) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/check"))
        .respond_with(ResponseTemplate::new(status).set_delay(delay))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_unconfigured_probe_emits_only_amount_zero() {
    // Given: No response check configured
    // When: Running the probe stage
    let (status, records) = probe(None).await;

    // Then: Exactly one record, httpd.group.amount = 0
    assert_eq!(status, CollectionStatus::Success);
    assert_eq!(keys(&records), vec!["httpd.group.amount"]);
    assert_eq!(records[0].value(), &MetricValue::Int(0));
}

#[tokio::test]
async fn test_unreachable_target_reports_unavailable_only() {
    // Given: A response check aimed at a closed port
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    // When: Running the probe stage
    let (status, records) = probe(Some(check_config("127.0.0.1", port))).await;

    // Then: amount=1, available=0, and no latency or status code
    assert_eq!(status, CollectionStatus::Failed);
    assert_eq!(
        keys(&records),
        vec!["httpd.group.amount", "httpd.group.available"]
    );
    assert_eq!(value_of(&records, "httpd.group.amount"), &MetricValue::Int(1));
    assert_eq!(
        value_of(&records, "httpd.group.available"),
        &MetricValue::Int(0)
    );
}

#[tokio::test]
async fn test_error_status_reports_zero_latency() {
    // Given: A target answering 503
    let server = mock_target(503, Duration::ZERO).await;
    let addr = server.address();

    // When: Running the probe stage
    let (status, records) = probe(Some(check_config(&addr.ip().to_string(), addr.port()))).await;

    // Then: Unavailable, latency sentinel 0, and the observed status code
    assert_eq!(status, CollectionStatus::Failed);
    assert_eq!(
        value_of(&records, "httpd.group.available"),
        &MetricValue::Int(0)
    );
    assert_eq!(
        value_of(&records, "httpd.stat[response_check,time]"),
        &MetricValue::Float(0.0)
    );
    assert_eq!(
        value_of(&records, "httpd.stat[response_check,status_code]"),
        &MetricValue::Int(503)
    );
    assert_eq!(records.len(), 4);
}

#[tokio::test]
async fn test_ok_status_reports_measured_latency() {
    // Given: A target answering 200 after 37ms
    let server = mock_target(200, Duration::from_millis(37)).await;
    let addr = server.address();

    // When: Running the probe stage
    let (status, records) = probe(Some(check_config(&addr.ip().to_string(), addr.port()))).await;

    // Then: Available, latency at least the delay, and status code 200
    assert_eq!(status, CollectionStatus::Success);
    assert_eq!(
        value_of(&records, "httpd.group.available"),
        &MetricValue::Int(1)
    );
    match value_of(&records, "httpd.stat[response_check,time]") {
        MetricValue::Float(seconds) => {
            assert!(*seconds >= 0.037, "latency {} below delay", seconds);
            assert!(*seconds < 2.0, "latency {} too large", seconds);
        }
        other => panic!("expected float latency, got {:?}", other),
    }
    assert_eq!(
        value_of(&records, "httpd.stat[response_check,status_code]"),
        &MetricValue::Int(200)
    );
}

#[tokio::test]
async fn test_timeout_counts_as_unreachable() {
    // Given: A target slower than the probe timeout
    let server = mock_target(200, Duration::from_secs(3)).await;
    let addr = server.address();
    let mut check = check_config(&addr.ip().to_string(), addr.port());
    check.timeout_seconds = 1;

    // When: Running the probe stage
    let (_, records) = probe(Some(check)).await;

    // Then: Reported like a connection failure
    assert_eq!(
        keys(&records),
        vec!["httpd.group.amount", "httpd.group.available"]
    );
}

#[test]
fn test_probe_url_uses_its_own_target() {
    let check = ResponseCheckConfig {
        host: "10.0.0.5".to_string(),
        port: 8443,
        path: "/index.html".to_string(),
        ssl: true,
        ..ResponseCheckConfig::default()
    };

    let probe = ResponseProbe::new(check).unwrap();

    assert_eq!(probe.url(), "https://10.0.0.5:8443/index.html");
}
