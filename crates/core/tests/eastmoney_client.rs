//! Integration tests for `EastmoneyClient` pagination using wiremock HTTP mocks.

use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yjyg_core::ingest::eastmoney::EastmoneyClient;

fn test_client(base_url: &str, page_size: usize) -> EastmoneyClient {
    EastmoneyClient::new(base_url.to_string(), page_size, 50, Duration::from_secs(5))
        .expect("client construction should not fail")
}

fn period() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date")
}

fn record(code: &str, amp_upper: f64) -> serde_json::Value {
    json!({
        "NOTICE_DATE": "2025-01-24 00:00:00",
        "SECURITY_CODE": code,
        "SECURITY_NAME_ABBR": "公司",
        "TRADE_MARKET": "上交所主板",
        "PREDICT_TYPE": "预增",
        "PREDICT_AMT_LOWER": 100000000.0,
        "PREDICT_AMT_UPPER": 200000000.0,
        "ADD_AMP_LOWER": 5.0,
        "ADD_AMP_UPPER": amp_upper
    })
}

fn page_body(codes: &[&str], count: usize) -> serde_json::Value {
    let data: Vec<_> = codes.iter().map(|c| record(c, 10.0)).collect();
    json!({
        "success": true,
        "message": "ok",
        "result": { "data": data, "count": count }
    })
}

#[tokio::test]
async fn paginates_until_reported_total_with_non_multiple_count() {
    let server = MockServer::start().await;

    // 5 records at page size 3: a full page, then a short final page.
    Mock::given(method("GET"))
        .and(query_param("reportName", "RPT_PUBLIC_OP_NEWPREDICT"))
        .and(query_param("filter", "(REPORT_DATE='2024-12-31')"))
        .and(query_param("pageNumber", "1"))
        .and(query_param("pageSize", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["1", "2", "3"], 5)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("pageNumber", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["4", "5"], 5)))
        .expect(1)
        .mount(&server)
        .await;

    let records = test_client(&server.uri(), 3).fetch_forecasts(period()).await;

    let codes: Vec<_> = records
        .iter()
        .map(|r| r.security_code.as_deref().unwrap())
        .collect();
    assert_eq!(codes, ["1", "2", "3", "4", "5"]);
}

#[tokio::test]
async fn single_page_stops_when_total_reached_exactly() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("pageNumber", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["1", "2"], 2)))
        .expect(1)
        .mount(&server)
        .await;

    let records = test_client(&server.uri(), 2).fetch_forecasts(period()).await;
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn server_failure_flag_yields_empty_result() {
    let server = MockServer::start().await;

    let body = json!({"success": false, "message": "no data"});
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let records = test_client(&server.uri(), 500).fetch_forecasts(period()).await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn empty_data_list_stops_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[], 100)))
        .expect(1)
        .mount(&server)
        .await;

    let records = test_client(&server.uri(), 500).fetch_forecasts(period()).await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn transport_failure_mid_pagination_keeps_earlier_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("pageNumber", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["1", "2"], 10)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("pageNumber", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let records = test_client(&server.uri(), 2).fetch_forecasts(period()).await;
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn malformed_json_keeps_earlier_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("pageNumber", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["1"], 10)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("pageNumber", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let records = test_client(&server.uri(), 1).fetch_forecasts(period()).await;
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn max_page_guard_bounds_inflated_totals() {
    let server = MockServer::start().await;

    // The server always claims more records exist.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["x"], 1_000_000)))
        .mount(&server)
        .await;

    let client = EastmoneyClient::new(server.uri(), 1, 3, Duration::from_secs(5))
        .expect("client construction should not fail");
    let records = client.fetch_forecasts(period()).await;
    assert_eq!(records.len(), 3);
}
