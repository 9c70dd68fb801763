//! Real-socket tests: the dispatcher behind the Axum server.

use std::sync::Arc;

use jsonrest::config::AppConfig;
use jsonrest::http::Dispatcher;
use jsonrest::lifecycle;
use jsonrest::observability::DiscardLogger;
use serde_json::{json, Value};

mod common;

async fn start_server() -> lifecycle::RunningServer {
    let mut config = AppConfig::default();
    config.server.bind_address = "127.0.0.1:0".into();
    config.dispatcher.disable_json_indent = true;

    let dispatcher = Dispatcher::new(common::resource_routes(), config.dispatcher.clone())
        .unwrap()
        .with_logger(Arc::new(DiscardLogger));

    lifecycle::start(&config, dispatcher).await.unwrap()
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_round_trip_over_tcp() {
    let server = start_server().await;
    let base = format!("http://{}", server.local_addr());
    let client = client();

    let res = client.get(format!("{}/r/123", base)).send().await.expect("Server unreachable");
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/json");
    assert!(res.headers().contains_key("x-request-id"), "request id propagated");
    assert_eq!(res.text().await.unwrap(), r#"{"Id":"123"}"#);

    let res = client
        .post(format!("{}/r/123", base))
        .json(&json!({"Test": "Test"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let echoed: Value = res.json().await.unwrap();
    assert_eq!(echoed, json!({"Test": "Test"}));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_failures_over_tcp() {
    let server = start_server().await;
    let base = format!("http://{}", server.local_addr());
    let client = client();

    let res = client.delete(format!("{}/r/123", base)).send().await.unwrap();
    assert_eq!(res.status(), 405);
    assert_eq!(res.text().await.unwrap(), r#"{"Error":"Method not allowed"}"#);

    let res = client.get(format!("{}/s/123", base)).send().await.unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), r#"{"Error":"Resource not found"}"#);

    let res = client
        .post(format!("{}/r/123", base))
        .header("content-type", "text/html")
        .body(r#"{"Test":"Test"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 415);
    assert_eq!(
        res.text().await.unwrap(),
        r#"{"Error":"Bad Content-Type, expected 'application/json'"}"#
    );

    let res = client.get(format!("{}/auto-fails", base)).send().await.unwrap();
    assert_eq!(res.status(), 500);
    assert_eq!(res.text().await.unwrap(), r#"{"Error":"Internal Server Error"}"#);

    // Still serving after the panic.
    let res = client.get(format!("{}/r/7", base)).send().await.unwrap();
    assert_eq!(res.status(), 200);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_bind_failure_is_reported() {
    let mut config = AppConfig::default();
    config.server.bind_address = "256.0.0.1:80".into();
    let dispatcher = Dispatcher::new(Vec::new(), config.dispatcher.clone()).unwrap();

    let err = lifecycle::start(&config, dispatcher).await.unwrap_err();
    assert!(err.to_string().starts_with("failed to bind 256.0.0.1:80"));
}
