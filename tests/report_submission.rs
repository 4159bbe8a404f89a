//! Report submission pipeline tests against a mock collector endpoint

use chrono::TimeZone;
use transport_connectivity_tester::collector::{self, build_collector_with_fractions};
use transport_connectivity_tester::logging::{LogLevel, Logger};
use transport_connectivity_tester::models::{
    AppSettings, ConnectivityReport, ErrorInfo, TransportConfig,
};
use transport_connectivity_tester::types::Protocol;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quiet_logger() -> Logger {
    Logger::new("submission-test").with_min_level(LogLevel::Error)
}

fn sample_reports() -> Vec<ConnectivityReport> {
    let time = chrono::Utc.with_ymd_and_hms(2024, 5, 17, 9, 15, 0).unwrap();
    vec![
        ConnectivityReport::success(
            "8.8.8.8:53".to_string(),
            Protocol::Tcp,
            String::new(),
            time,
            18,
        ),
        ConnectivityReport::failure(
            "8.8.8.8:53".to_string(),
            Protocol::Udp,
            String::new(),
            time,
            10_000,
            ErrorInfo::new(
                Some("receive".to_string()),
                Some("ETIMEDOUT".to_string()),
                "connectivity check timed out after 10s",
            ),
        ),
    ]
}

fn settings_with_reports(reporter_url: String) -> AppSettings {
    let mut config = TransportConfig::new("");
    config.test_reports = sample_reports();
    AppSettings {
        reporter_url,
        configs: vec![config],
        ..AppSettings::default()
    }
}

#[tokio::test]
async fn submit_all_delivers_every_report_and_marks_collected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reports"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let mut settings = settings_with_reports(format!("{}/reports", server.uri()));
    collector::submit_all(&mut settings, &quiet_logger()).await.unwrap();

    assert!(settings.configs[0].test_reports.iter().all(|r| r.collected));
}

#[tokio::test]
async fn submitted_body_matches_persisted_wire_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut settings = settings_with_reports(server.uri());
    collector::submit_all(&mut settings, &quiet_logger()).await.unwrap();

    let requests = server.received_requests().await.expect("requests recorded");
    assert_eq!(requests.len(), 2);

    for request in &requests {
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert!(body["resolver"].is_string());
        assert!(body["proto"] == "tcp" || body["proto"] == "udp");
        assert!(body["transport"].is_string());
        assert!(body["duration_ms"].is_u64());
        assert!(body["collected"].is_boolean());
        // RFC3339 UTC at second precision
        let time = body["time"].as_str().expect("time is a string");
        assert!(time.ends_with('Z') || time.contains("+00:00"));
        assert!(!time.contains('.'));
        // error is null on success, structured on failure
        if body["proto"] == "udp" {
            assert_eq!(body["error"]["posix_error"], "ETIMEDOUT");
            assert_eq!(body["error"]["op"], "receive");
        } else {
            assert!(body["error"].is_null());
        }
    }
}

#[tokio::test]
async fn retry_stage_recovers_after_two_transient_failures() {
    let server = MockServer::start().await;
    // Two failures, then the endpoint recovers: the first mock stops
    // matching once exhausted and requests fall through to the 200 mock.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut config = TransportConfig::new("");
    config.test_reports = vec![sample_reports().remove(0)];
    let mut settings = AppSettings {
        reporter_url: server.uri(),
        configs: vec![config],
        ..AppSettings::default()
    };

    collector::submit_all(&mut settings, &quiet_logger()).await.unwrap();

    assert!(settings.configs[0].test_reports[0].collected);
    let requests = server.received_requests().await.expect("requests recorded");
    assert_eq!(requests.len(), 3, "expected exactly two retries before success");
}

#[tokio::test]
async fn fully_sampled_out_run_never_touches_the_sink() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    // Sampling off for both classes keeps the failing sink untouched and
    // every report trivially counts as collected.
    let mut settings = settings_with_reports(server.uri());
    let collector = build_collector_with_fractions(&settings.reporter_url, 0.0, 0.0).unwrap();
    collector::submit_all_with(&mut settings, collector, &quiet_logger()).await;

    assert!(settings.configs[0].test_reports.iter().all(|r| r.collected));
    assert!(server.received_requests().await.expect("requests").is_empty());
}

#[tokio::test]
async fn empty_reporter_url_never_touches_the_network() {
    let mut settings = settings_with_reports(String::new());
    collector::submit_all(&mut settings, &quiet_logger()).await.unwrap();
    assert!(settings.configs[0].test_reports.iter().all(|r| r.collected));
}

#[tokio::test]
async fn sampling_fractions_gate_by_report_class() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    // SuccessFraction=0, FailureFraction=1: the successful report never
    // reaches the sink but still counts as collected; the failing report
    // always reaches it.
    let mut settings = settings_with_reports(server.uri());
    let collector = build_collector_with_fractions(&settings.reporter_url, 0.0, 1.0).unwrap();
    collector::submit_all_with(&mut settings, collector, &quiet_logger()).await;

    assert!(settings.configs[0].test_reports.iter().all(|r| r.collected));
    let requests = server.received_requests().await.expect("requests recorded");
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["proto"], "udp");
}
