//! Integration tests for HttpRenderer using wiremock
//!
//! These tests validate the static renderer's behavior with mock servers.

mod common;

use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rever_crawler::crawler::{Crawler, HttpRenderer, PageCrawler, PageRenderer, ReadinessPolicy};
use rever_crawler::utils::error::RenderError;

use common::{fast_config, load_fixture, results_page};

const TIMEOUT: Duration = Duration::from_secs(5);

/// Test successful navigation and content read-back
#[tokio::test]
async fn test_navigate_success() {
    let mock_server = MockServer::start().await;
    let html = load_fixture("rever_results_page.html");

    Mock::given(method("GET"))
        .and(path("/s/ho-chi-minh/mua/can-ho"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(html),
        )
        .mount(&mock_server)
        .await;

    let mut renderer = HttpRenderer::new("test-agent/1.0").unwrap();
    let url = format!("{}/s/ho-chi-minh/mua/can-ho?page=1", mock_server.uri());

    renderer
        .navigate(&url, ReadinessPolicy::DomContentLoaded, TIMEOUT)
        .await
        .unwrap();
    renderer
        .wait_for_selector("article.box.listView", TIMEOUT)
        .await
        .unwrap();

    let content = renderer.content().await.unwrap();
    assert!(content.contains("Căn hộ Vinhomes Central Park"));
}

/// Test that the configured user agent is sent
#[tokio::test]
async fn test_user_agent_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("user-agent", "rever-test/2.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut renderer = HttpRenderer::new("rever-test/2.0").unwrap();
    let result = renderer
        .navigate(&mock_server.uri(), ReadinessPolicy::Load, TIMEOUT)
        .await;

    assert!(result.is_ok(), "Navigation should succeed: {:?}", result.err());
}

/// Test error status is a navigation failure
#[tokio::test]
async fn test_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let mut renderer = HttpRenderer::new("test-agent/1.0").unwrap();
    let result = renderer
        .navigate(&mock_server.uri(), ReadinessPolicy::DomContentLoaded, TIMEOUT)
        .await;

    assert!(matches!(result, Err(RenderError::Navigation { .. })));
    assert!(renderer.content().await.is_err());
}

/// Test slow response is reported as a timeout
#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let mut renderer = HttpRenderer::new("test-agent/1.0").unwrap();
    let result = renderer
        .navigate(
            &mock_server.uri(),
            ReadinessPolicy::DomContentLoaded,
            Duration::from_millis(100),
        )
        .await;

    assert!(
        matches!(result, Err(RenderError::Timeout { timeout_ms: 100, .. })),
        "Expected timeout, got {result:?}"
    );
}

/// Test missing listing container fails the readiness wait
#[tokio::test]
async fn test_wait_for_selector_without_listings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("rever_empty_page.html")))
        .mount(&mock_server)
        .await;

    let mut renderer = HttpRenderer::new("test-agent/1.0").unwrap();
    renderer
        .navigate(&mock_server.uri(), ReadinessPolicy::DomContentLoaded, TIMEOUT)
        .await
        .unwrap();

    let result = renderer
        .wait_for_selector("article.box.listView", Duration::from_millis(50))
        .await;

    assert!(matches!(result, Err(RenderError::SelectorTimeout { .. })));
}

/// Test windows-1258 body is decoded from the charset header
#[tokio::test]
async fn test_charset_decoding() {
    let mock_server = MockServer::start().await;

    // "Giá" in windows-1258
    let body: Vec<u8> = b"<html><body><p>Gi\xE1</p></body></html>".to_vec();

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=windows-1258")
                .set_body_bytes(body),
        )
        .mount(&mock_server)
        .await;

    let mut renderer = HttpRenderer::new("test-agent/1.0").unwrap();
    renderer
        .navigate(&mock_server.uri(), ReadinessPolicy::DomContentLoaded, TIMEOUT)
        .await
        .unwrap();

    assert!(renderer.content().await.unwrap().contains("Giá"));
}

/// Test a full crawl against a mock site through the static renderer
#[tokio::test]
async fn test_crawl_through_http_renderer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&["a", "b"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&["c"])))
        .mount(&mock_server)
        .await;

    let mut config = fast_config(1, 3);
    config.crawler.base_url = format!("{}/s/ho-chi-minh/mua/can-ho", mock_server.uri());

    let page_crawler = PageCrawler::new(&config).unwrap();
    assert_eq!(
        page_crawler.page_url(2),
        format!("{}/s/ho-chi-minh/mua/can-ho?page=2", mock_server.uri())
    );

    let crawler = Crawler::new(&config).unwrap();
    let mut renderer = HttpRenderer::new(&config.crawler.user_agent).unwrap();
    let report = crawler.run(&mut renderer).await;

    let ids: Vec<&str> = report
        .records
        .iter()
        .map(|r| r.listing_id.as_deref().unwrap())
        .collect();
    assert_eq!(ids, ["a", "b", "c"]);
    assert_eq!(report.stats.pages_failed, 1);
}
