//! PageSource against a local mock server: status handling, UA header, extraction.

use std::time::Duration;

use ehw_source::{HoldingsSource, PageSource, PageSourceConfig, SourceError};
use httpmock::prelude::*;

const UA: &str = "Mozilla/5.0 (test)";

fn page_with(content_attr: &str) -> String {
    format!(
        r#"<html><body><div class="x"><div id="DataAsset" data-content="{content_attr}"></div></div></body></html>"#
    )
}

fn source_for(server: &MockServer, timeout: Duration) -> PageSource {
    PageSource::new(PageSourceConfig {
        url: server.url("/ETF/Fund/Info"),
        element_id: "DataAsset".to_string(),
        attribute: "data-content".to_string(),
        user_agent: UA.to_string(),
        timeout,
    })
    .unwrap()
}

#[tokio::test]
async fn fetches_and_extracts_asset_list() {
    let server = MockServer::start_async().await;
    let body = page_with(
        "[{&quot;AssetCode&quot;:&quot;NAV&quot;,&quot;Value&quot;:2000},\
         {&quot;AssetCode&quot;:&quot;CASH&quot;,&quot;Value&quot;:100},\
         {&quot;AssetCode&quot;:&quot;ST&quot;,&quot;Details&quot;:[\
         {&quot;DetailCode&quot;:&quot;2330&quot;,&quot;DetailName&quot;:&quot;TSMC&quot;,&quot;NavRate&quot;:9.5,&quot;Share&quot;:1000}]}]",
    );
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/ETF/Fund/Info")
                .header("user-agent", UA);
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body(body);
        })
        .await;

    let source = source_for(&server, Duration::from_secs(5));
    let assets = source.fetch_assets().await.unwrap();
    mock.assert_async().await;

    assert_eq!(assets.len(), 3);
    let snapshot = ehw_model::normalize(&assets).unwrap();
    assert_eq!(snapshot.get("2330").unwrap().shares, 1000);
    assert!((snapshot.cash_position - 5.0).abs() < 1e-9);
}

#[tokio::test]
async fn non_success_status_is_fetch_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ETF/Fund/Info");
            then.status(503).body("maintenance");
        })
        .await;

    let err = source_for(&server, Duration::from_secs(5))
        .fetch_assets()
        .await
        .unwrap_err();
    assert_eq!(err, SourceError::HttpStatus { status: 503 });
    assert!(err.is_fetch_failure());
}

#[tokio::test]
async fn page_without_element_is_parse_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ETF/Fund/Info");
            then.status(200).body("<html><body>redesigned</body></html>");
        })
        .await;

    let err = source_for(&server, Duration::from_secs(5))
        .fetch_assets()
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::MissingElement { .. }));
    assert!(!err.is_fetch_failure());
}

#[tokio::test]
async fn slow_server_times_out_as_transport_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ETF/Fund/Info");
            then.status(200)
                .delay(Duration::from_millis(1500))
                .body(page_with("[]"));
        })
        .await;

    let err = source_for(&server, Duration::from_millis(200))
        .fetch_assets()
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::Transport(_)), "got: {err:?}");
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    let source = PageSource::new(PageSourceConfig {
        url: "http://127.0.0.1:9/unreachable".to_string(),
        element_id: "DataAsset".to_string(),
        attribute: "data-content".to_string(),
        user_agent: UA.to_string(),
        timeout: Duration::from_secs(2),
    })
    .unwrap();
    let err = source.fetch_assets().await.unwrap_err();
    assert!(err.is_fetch_failure());
}
