//! Integration tests for `GET /cotacao`.
//!
//! A throwaway axum server on 127.0.0.1 stands in for the upstream quote API;
//! the store is real SQLite. Requests go through the router with `oneshot`,
//! except the end-to-end test, which binds a listener and uses the client SDK.

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    routing::get,
};
use exchange_rates::AwesomeApiProvider;
use http_body_util::BodyExt;
use quote_client::{CotacaoClient, save_current_quote};
use quote_hex::{QuoteService, inbound::HttpServer};
use quote_repo::SqliteRepo;
use tower::ServiceExt;

const UPSTREAM_BODY: &str = r#"{
    "USDBRL": {
        "code": "USD", "codein": "BRL", "name": "Dólar Americano/Real Brasileiro",
        "high": "5.4712", "low": "5.4203", "varBid": "-0.0113", "pctChange": "-0.21",
        "bid": "5.4301", "ask": "5.4311", "timestamp": "1718304000",
        "create_date": "2024-06-13 15:40:00"
    }
}"#;

/// Starts a fake upstream and returns its base URL.
async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/json/last/USD-BRL", get(|| async { UPSTREAM_BODY }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                UPSTREAM_BODY
            }),
        )
        .route(
            "/malformed",
            get(|| async { r#"{"EURBRL":{"bid":"6.01"}}"# }),
        );
    spawn(app).await
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn local_http() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Helper to create a server whose upstream is `upstream_url`.
async fn create_test_server(
    upstream_url: String,
    store_timeout: Duration,
) -> HttpServer<AwesomeApiProvider, SqliteRepo> {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let fetcher = AwesomeApiProvider::with_url(upstream_url).with_http_client(local_http());
    let service = QuoteService::new(fetcher, repo).with_store_timeout(store_timeout);
    HttpServer::new(service)
}

fn cotacao_request() -> Request<Body> {
    Request::builder()
        .uri("/cotacao")
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_cotacao_returns_and_stores_upstream_bid() {
    let upstream = spawn_upstream().await;
    let server = create_test_server(
        format!("{}/json/last/USD-BRL", upstream),
        Duration::from_secs(1),
    )
    .await;

    let response = server.router().oneshot(cotacao_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let json = json_body(response).await;
    assert_eq!(json, serde_json::json!({ "bid": "5.4301" }));

    let repo = server.service().repo();
    assert_eq!(repo.count().await.unwrap(), 1);
    assert_eq!(repo.recent(1).await.unwrap()[0].bid.as_str(), "5.4301");
}

#[tokio::test]
async fn test_each_request_stores_one_row() {
    let upstream = spawn_upstream().await;
    let server = create_test_server(
        format!("{}/json/last/USD-BRL", upstream),
        Duration::from_secs(1),
    )
    .await;
    let app = server.router();

    for _ in 0..3 {
        let response = app.clone().oneshot(cotacao_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(server.service().repo().count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_slow_upstream_returns_500_and_stores_nothing() {
    let upstream = spawn_upstream().await;
    let server = create_test_server(format!("{}/slow", upstream), Duration::from_secs(1)).await;

    let started = tokio::time::Instant::now();
    let response = server.router().oneshot(cotacao_request()).await.unwrap();

    assert!(started.elapsed() < Duration::from_millis(450));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("timed out"));
    assert_eq!(server.service().repo().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_upstream_returns_500_and_stores_nothing() {
    let upstream = spawn_upstream().await;
    let server =
        create_test_server(format!("{}/malformed", upstream), Duration::from_secs(1)).await;

    let response = server.router().oneshot(cotacao_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid upstream quote")
    );
    assert_eq!(server.service().repo().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_store_timeout_returns_500_after_upstream_success() {
    let upstream = spawn_upstream().await;
    let server = create_test_server(
        format!("{}/json/last/USD-BRL", upstream),
        Duration::ZERO,
    )
    .await;

    let response = server.router().oneshot(cotacao_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .starts_with("Database operation timed out")
    );
    assert_eq!(server.service().repo().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let upstream = spawn_upstream().await;
    let server = create_test_server(upstream, Duration::from_secs(1)).await;

    let response = server
        .router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_client_round_trip_writes_quote_file() {
    let upstream = spawn_upstream().await;
    let server = create_test_server(
        format!("{}/json/last/USD-BRL", upstream),
        Duration::from_secs(1),
    )
    .await;
    let base = spawn(server.router()).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("cotacao.txt");
    std::fs::write(&output, "stale").unwrap();

    let client = CotacaoClient::new(base)
        .with_http_client(local_http())
        .with_timeout(Duration::from_secs(2));
    let bid = save_current_quote(&client, &output).await.unwrap();

    assert_eq!(bid.as_str(), "5.4301");

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "Dólar:5.4301");
    assert_eq!(server.service().repo().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_client_times_out_against_slow_chain() {
    let upstream = spawn_upstream().await;
    // Upstream budget wider than the client's, so the client's fires first.
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let fetcher = AwesomeApiProvider::with_url(format!("{}/slow", upstream))
        .with_http_client(local_http())
        .with_timeout(Duration::from_secs(2));
    let server = HttpServer::new(QuoteService::new(fetcher, repo));
    let base = spawn(server.router()).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("cotacao.txt");
    std::fs::write(&output, "Dólar:4.99").unwrap();

    let client = CotacaoClient::new(base).with_http_client(local_http());
    let err = save_current_quote(&client, &output).await.unwrap_err();

    assert!(err.kind().is_timeout());
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "Dólar:4.99");
}
