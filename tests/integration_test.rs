//! Integration tests for the FX gateway.
//!
//! These tests drive the full router (middleware, CORS, error boundary) with
//! `tower::ServiceExt::oneshot` against a wiremock upstream provider.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fx_gateway::{
    build_router,
    core::{config::UpstreamConfig, init_metrics, AppConfig},
    AppState,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::{
    matchers::{method, path, query_param, query_param_is_missing},
    Mock, MockServer, ResponseTemplate,
};

const APP_ID: &str = "test_app_id";

fn create_test_app(upstream_base: &str) -> Router {
    create_test_app_with_timeout(upstream_base, Duration::from_secs(5))
}

fn create_test_app_with_timeout(upstream_base: &str, timeout: Duration) -> Router {
    init_metrics();

    let config = AppConfig {
        upstream: UpstreamConfig::new(upstream_base, APP_ID),
        ..AppConfig::new(APP_ID)
    };

    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to build HTTP client");

    let state = AppState::new(&config, http_client).expect("Failed to build app state");
    build_router(Arc::new(state))
}

async fn get_text(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, text) = get_text(app, uri).await;
    (status, serde_json::from_str(&text).unwrap())
}

async fn mount_rates(server: &MockServer, rates: Value) {
    Mock::given(method("GET"))
        .and(path("/api/historical/2024-01-01.json"))
        .and(query_param("app_id", APP_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "disclaimer": "Usage subject to terms",
            "timestamp": 1704153599,
            "base": "USD",
            "rates": rates
        })))
        .mount(server)
        .await;
}

async fn mount_public_names(server: &MockServer, names: Value) {
    Mock::given(method("GET"))
        .and(path("/api/currencies.json"))
        .and(query_param_is_missing("app_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(names))
        .mount(server)
        .await;
}

async fn upstream_request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}

const CONVERT_USD_EUR: &str =
    "/convert?date=2024-01-01&sourceCurrency=USD&targetCurrency=EUR&amountInSourceCurrency=100";

#[tokio::test]
async fn test_convert_usd_to_eur() {
    let server = MockServer::start().await;
    mount_rates(&server, json!({ "USD": 1, "EUR": 0.9 })).await;
    mount_public_names(&server, json!({ "USD": "US Dollar", "EUR": "Euro" })).await;

    let app = create_test_app(&server.uri());
    let (status, body) = get(&app, CONVERT_USD_EUR).await;

    assert_eq!(status, StatusCode::OK);
    let amount = body["amountInTargetCurrency"].as_f64().unwrap();
    assert!((amount - 90.0).abs() < 1e-9, "got {}", amount);
    assert_eq!(body["sourceCurrencyName"], "US Dollar");
    assert_eq!(body["targetCurrencyName"], "Euro");
    assert_eq!(upstream_request_count(&server).await, 2);
}

#[tokio::test]
async fn test_convert_cross_rate() {
    let server = MockServer::start().await;
    mount_rates(&server, json!({ "USD": 1, "EUR": 0.8, "GBP": 0.5 })).await;
    mount_public_names(&server, json!({ "EUR": "Euro", "GBP": "British Pound Sterling" })).await;

    let app = create_test_app(&server.uri());
    let (status, body) = get(
        &app,
        "/convert?date=2024-01-01&sourceCurrency=EUR&targetCurrency=GBP&amountInSourceCurrency=40",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let amount = body["amountInTargetCurrency"].as_f64().unwrap();
    assert!((amount - 25.0).abs() < 1e-9, "got {}", amount);
    assert_eq!(body["targetCurrencyName"], "British Pound Sterling");
}

#[tokio::test]
async fn test_convert_missing_each_parameter() {
    let server = MockServer::start().await;
    let app = create_test_app(&server.uri());

    let uris = [
        "/convert?sourceCurrency=USD&targetCurrency=EUR&amountInSourceCurrency=100",
        "/convert?date=2024-01-01&targetCurrency=EUR&amountInSourceCurrency=100",
        "/convert?date=2024-01-01&sourceCurrency=USD&amountInSourceCurrency=100",
        "/convert?date=2024-01-01&sourceCurrency=USD&targetCurrency=EUR",
        "/convert?date=&sourceCurrency=USD&targetCurrency=EUR&amountInSourceCurrency=100",
        "/convert",
    ];

    for uri in uris {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {}", uri);
        assert_eq!(body, json!({ "error": "Missing required query parameters." }));
    }

    assert_eq!(upstream_request_count(&server).await, 0);
}

#[tokio::test]
async fn test_convert_invalid_amount_makes_no_upstream_call() {
    let server = MockServer::start().await;
    let app = create_test_app(&server.uri());

    for amount in ["abc", "-10", "NaN"] {
        let uri = format!(
            "/convert?date=2024-01-01&sourceCurrency=USD&targetCurrency=EUR&amountInSourceCurrency={}",
            amount
        );
        let (status, body) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "error": "The specified amount is not a valid number." })
        );
    }

    assert_eq!(upstream_request_count(&server).await, 0);
}

#[tokio::test]
async fn test_convert_currency_not_available() {
    let server = MockServer::start().await;
    mount_rates(&server, json!({ "USD": 1, "EUR": 0.9 })).await;

    let app = create_test_app(&server.uri());
    let (status, body) = get(
        &app,
        "/convert?date=2024-01-01&sourceCurrency=USD&targetCurrency=XYZ&amountInSourceCurrency=100",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": "The specified source or target currency is not available." })
    );
    // Only the rate table was fetched
    assert_eq!(upstream_request_count(&server).await, 1);
}

#[tokio::test]
async fn test_convert_name_falls_back_to_code() {
    let server = MockServer::start().await;
    mount_rates(&server, json!({ "USD": 1, "EUR": 0.9 })).await;
    mount_public_names(&server, json!({ "USD": "US Dollar" })).await;

    let app = create_test_app(&server.uri());
    let (status, body) = get(&app, CONVERT_USD_EUR).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sourceCurrencyName"], "US Dollar");
    assert_eq!(body["targetCurrencyName"], "EUR");
}

#[tokio::test]
async fn test_convert_is_idempotent() {
    let server = MockServer::start().await;
    mount_rates(&server, json!({ "USD": 1, "JPY": 141.2 })).await;
    mount_public_names(&server, json!({ "USD": "US Dollar", "JPY": "Japanese Yen" })).await;

    let app = create_test_app(&server.uri());
    let uri = "/convert?date=2024-01-01&sourceCurrency=USD&targetCurrency=JPY&amountInSourceCurrency=12.5";

    let first = get(&app, uri).await;
    let second = get(&app, uri).await;

    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_convert_upstream_error_is_not_leaked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/historical/2024-01-01.json"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": true,
            "status": 401,
            "message": "invalid_app_id",
            "description": "Invalid App ID provided"
        })))
        .mount(&server)
        .await;

    let app = create_test_app(&server.uri());
    let (status, body) = get(&app, CONVERT_USD_EUR).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal Server Error" }));
    let text = body.to_string();
    assert!(!text.contains("invalid_app_id"));
    assert!(!text.contains(APP_ID));
}

#[tokio::test]
async fn test_convert_missing_rate_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/historical/2024-01-01.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "base": "USD" })))
        .mount(&server)
        .await;

    let app = create_test_app(&server.uri());
    let (status, body) = get(&app, CONVERT_USD_EUR).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal Server Error" }));
}

#[tokio::test]
async fn test_convert_upstream_unreachable() {
    // Nothing listens on port 9 locally
    let app = create_test_app("http://127.0.0.1:9");
    let (status, body) = get(&app, CONVERT_USD_EUR).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal Server Error" }));
}

#[tokio::test]
async fn test_convert_upstream_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/historical/2024-01-01.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "rates": { "USD": 1, "EUR": 0.9 } }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let app = create_test_app_with_timeout(&server.uri(), Duration::from_millis(200));
    let (status, body) = get(&app, CONVERT_USD_EUR).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal Server Error" }));
}

#[tokio::test]
async fn test_convert_name_fetch_failure() {
    let server = MockServer::start().await;
    mount_rates(&server, json!({ "USD": 1, "EUR": 0.9 })).await;
    Mock::given(method("GET"))
        .and(path("/api/currencies.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let app = create_test_app(&server.uri());
    let (status, body) = get(&app, CONVERT_USD_EUR).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal Server Error" }));
}

#[tokio::test]
async fn test_get_all_currencies_passthrough() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/currencies.json"))
        .and(query_param("app_id", APP_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "USD": "US Dollar" })))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_test_app(&server.uri());
    let (status, body) = get(&app, "/getAllCurrencies").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "USD": "US Dollar" }));
}

#[tokio::test]
async fn test_get_all_currencies_keeps_order_and_raw_values() {
    let server = MockServer::start().await;
    let raw = r#"{"ZWL":"Zimbabwean Dollar","AED":"UAE Dirham","XYZ":42,"ABC":null}"#;
    Mock::given(method("GET"))
        .and(path("/api/currencies.json"))
        .and(query_param("app_id", APP_ID))
        .respond_with(ResponseTemplate::new(200).set_body_raw(raw, "application/json"))
        .mount(&server)
        .await;

    let app = create_test_app(&server.uri());
    let (status, body) = get_text(&app, "/getAllCurrencies").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, raw);
}

#[tokio::test]
async fn test_get_all_currencies_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/currencies.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let app = create_test_app(&server.uri());
    let (status, body) = get(&app, "/getAllCurrencies").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to fetch currency names." }));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let server = MockServer::start().await;
    let app = create_test_app(&server.uri());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "https://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let server = MockServer::start().await;
    let app = create_test_app(&server.uri());

    let response = app
        .oneshot(Request::builder().uri("/convert").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let request_id = response.headers().get("x-request-id").unwrap();
    assert_eq!(request_id.len(), 36);
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = MockServer::start().await;
    let app = create_test_app(&server.uri());

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_metrics_endpoint_reports_requests() {
    let server = MockServer::start().await;
    let app = create_test_app(&server.uri());

    let _ = get(&app, "/convert").await;

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("fx_gateway_requests_total"));
}

#[tokio::test]
async fn test_openapi_document_served() {
    let server = MockServer::start().await;
    let app = create_test_app(&server.uri());

    let (status, body) = get(&app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/convert"].is_object());
    assert!(body["paths"]["/getAllCurrencies"].is_object());
}

#[tokio::test]
async fn test_metrics_scrape_is_not_counted() {
    let server = MockServer::start().await;
    let app = create_test_app(&server.uri());

    let _ = get_text(&app, "/metrics").await;
    let (status, text) = get_text(&app, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(!text.contains(r#"endpoint="/metrics""#));
}
