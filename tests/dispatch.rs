//! End-to-end dispatcher contract, driven in-process.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use jsonrest::config::DispatcherConfig;
use jsonrest::http::Dispatcher;
use jsonrest::observability::DiscardLogger;
use jsonrest::testing::{make_simple_request, run_request};
use jsonrest::Route;
use axum::http::header::CONTENT_TYPE;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_get_binds_path_param() {
    let dispatcher = common::compact_dispatcher();

    let recorded = run_request(
        &dispatcher,
        make_simple_request("GET", "http://1.2.3.4/r/123", None),
    )
    .await;
    recorded.code_is(200);
    recorded.content_type_is_json();
    recorded.body_is(r#"{"Id":"123"}"#);
}

#[tokio::test]
async fn test_post_echoes_payload() {
    let dispatcher = common::compact_dispatcher();

    let recorded = run_request(
        &dispatcher,
        make_simple_request("POST", "http://1.2.3.4/r/123", Some(json!({"Test": "Test"}))),
    )
    .await;
    recorded.code_is(200);
    recorded.content_type_is_json();
    recorded.body_is(r#"{"Test":"Test"}"#);
}

#[tokio::test]
async fn test_wrong_content_type_is_415() {
    let dispatcher = common::compact_dispatcher();

    let mut request =
        make_simple_request("POST", "http://1.2.3.4/r/123", Some(json!({"Test": "Test"})));
    request
        .headers_mut()
        .insert(CONTENT_TYPE, "text/html".parse().unwrap());

    let recorded = run_request(&dispatcher, request).await;
    recorded.code_is(415);
    recorded.content_type_is_json();
    recorded.body_is(r#"{"Error":"Bad Content-Type, expected 'application/json'"}"#);
}

#[tokio::test]
async fn test_handler_stops_at_content_type_failure() {
    let reached = Arc::new(AtomicUsize::new(0));
    let counter = reached.clone();
    let dispatcher = Dispatcher::new(
        vec![Route::post("/items", move |w, r| {
            let counter = counter.clone();
            async move {
                let item: Value = r.decode_json_payload().await?;
                counter.fetch_add(1, Ordering::SeqCst);
                w.write_json(&item)?;
                Ok(())
            }
        })],
        DispatcherConfig::default(),
    )
    .unwrap();

    let mut request = make_simple_request("POST", "/items", Some(json!([1])));
    request
        .headers_mut()
        .insert(CONTENT_TYPE, "application/json; charset=utf-8".parse().unwrap());

    let recorded = run_request(&dispatcher, request).await;
    recorded.code_is(415);
    assert_eq!(reached.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_ignored_content_type_failure_is_still_415() {
    let dispatcher = Dispatcher::new(
        vec![Route::post("/r/:id", |w, r| async move {
            let data: Value = r
                .decode_json_payload()
                .await
                .unwrap_or(json!({"ignored": true}));
            w.write_json(&data)?;
            Ok(())
        })],
        DispatcherConfig {
            disable_json_indent: true,
            ..DispatcherConfig::default()
        },
    )
    .unwrap()
    .with_logger(Arc::new(DiscardLogger));

    let mut request = make_simple_request("POST", "http://1.2.3.4/r/123", Some(json!({"Test": "Test"})));
    request
        .headers_mut()
        .insert(CONTENT_TYPE, "text/html".parse().unwrap());

    let recorded = run_request(&dispatcher, request).await;
    recorded.code_is(415);
    recorded.content_type_is_json();
    recorded.body_is(r#"{"Error":"Bad Content-Type, expected 'application/json'"}"#);
}

#[tokio::test]
async fn test_wrong_method_is_405() {
    let dispatcher = common::compact_dispatcher();

    let recorded = run_request(
        &dispatcher,
        make_simple_request("DELETE", "http://1.2.3.4/r/123", None),
    )
    .await;
    recorded.code_is(405);
    recorded.content_type_is_json();
    recorded.body_is(r#"{"Error":"Method not allowed"}"#);
    recorded.header_is("allow", "GET, POST");
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let dispatcher = common::compact_dispatcher();

    let recorded = run_request(
        &dispatcher,
        make_simple_request("GET", "http://1.2.3.4/s/123", None),
    )
    .await;
    recorded.code_is(404);
    recorded.content_type_is_json();
    recorded.body_is(r#"{"Error":"Resource not found"}"#);
}

#[tokio::test]
async fn test_trailing_slash_is_404() {
    let dispatcher = common::compact_dispatcher();

    let recorded = run_request(
        &dispatcher,
        make_simple_request("GET", "http://1.2.3.4/r/123/", None),
    )
    .await;
    recorded.code_is(404);
}

#[tokio::test]
async fn test_empty_param_segment_is_404() {
    let dispatcher = common::compact_dispatcher();

    let recorded = run_request(
        &dispatcher,
        make_simple_request("GET", "http://1.2.3.4/r/", None),
    )
    .await;
    recorded.code_is(404);
    recorded.body_is(r#"{"Error":"Resource not found"}"#);
}

#[tokio::test]
async fn test_encoded_literal_segment_matches() {
    let dispatcher = Dispatcher::new(
        vec![Route::get("/hello world/:name", |w, r| async move {
            w.write_json(&json!({"Name": r.path_param("name")}))?;
            Ok(())
        })],
        DispatcherConfig {
            disable_json_indent: true,
            ..DispatcherConfig::default()
        },
    )
    .unwrap();

    let recorded = run_request(
        &dispatcher,
        make_simple_request("GET", "http://1.2.3.4/hello%20world/jo%20ann", None),
    )
    .await;
    recorded.code_is(200);
    recorded.body_is(r#"{"Name":"jo ann"}"#);
}

#[tokio::test]
async fn test_panic_is_500_and_isolated() {
    let dispatcher = common::compact_dispatcher();

    let recorded = run_request(
        &dispatcher,
        make_simple_request("GET", "http://1.2.3.4/auto-fails", None),
    )
    .await;
    recorded.code_is(500);
    recorded.content_type_is_json();
    recorded.body_is(r#"{"Error":"Internal Server Error"}"#);

    // The next request is served normally.
    let recorded = run_request(
        &dispatcher,
        make_simple_request("GET", "http://1.2.3.4/r/456", None),
    )
    .await;
    recorded.code_is(200);
    recorded.body_is(r#"{"Id":"456"}"#);
}

#[tokio::test]
async fn test_user_error() {
    let dispatcher = common::compact_dispatcher();

    let recorded = run_request(
        &dispatcher,
        make_simple_request("GET", "http://1.2.3.4/user-error", None),
    )
    .await;
    recorded.code_is(500);
    recorded.content_type_is_json();
    recorded.body_is(r#"{"Error":"My error"}"#);
}

#[tokio::test]
async fn test_user_not_found() {
    let dispatcher = common::compact_dispatcher();

    let recorded = run_request(
        &dispatcher,
        make_simple_request("GET", "http://1.2.3.4/user-notfound", None),
    )
    .await;
    recorded.code_is(404);
    recorded.content_type_is_json();
    recorded.body_is(r#"{"Error":"Resource not found"}"#);
}

#[tokio::test]
async fn test_decode_error_is_left_to_handler() {
    let dispatcher = common::compact_dispatcher();

    let mut request = make_simple_request("POST", "http://1.2.3.4/decode-error", None);
    *request.body_mut() = axum::body::Body::from("{broken");
    request
        .headers_mut()
        .insert(CONTENT_TYPE, "application/json".parse().unwrap());

    let recorded = run_request(&dispatcher, request).await;
    recorded.code_is(400);
    let envelope: jsonrest::http::ErrorEnvelope = recorded.decode_json_payload().unwrap();
    assert!(envelope.error.starts_with("failed to decode JSON payload"));
}

#[tokio::test]
async fn test_propagated_decode_error_is_500() {
    let dispatcher = common::compact_dispatcher();

    let mut request = make_simple_request("POST", "http://1.2.3.4/r/1", None);
    *request.body_mut() = axum::body::Body::from("[1, 2]");
    request
        .headers_mut()
        .insert(CONTENT_TYPE, "application/json".parse().unwrap());

    let recorded = run_request(&dispatcher, request).await;
    recorded.code_is(500);
    recorded.body_is(r#"{"Error":"Internal Server Error"}"#);
}

#[tokio::test]
async fn test_indented_output_by_default() {
    let dispatcher = Dispatcher::new(common::resource_routes(), DispatcherConfig::default())
        .unwrap()
        .with_logger(Arc::new(DiscardLogger));

    let recorded = run_request(
        &dispatcher,
        make_simple_request("GET", "http://1.2.3.4/s", None),
    )
    .await;
    recorded.code_is(404);
    recorded.body_is("{\n  \"Error\": \"Resource not found\"\n}");
}

#[tokio::test]
async fn test_custom_status_before_write() {
    let dispatcher = Dispatcher::new(
        vec![Route::post("/things", |w, r| async move {
            w.insert_header("location", &r.uri_for("/things/1"))?;
            w.write_header(axum::http::StatusCode::CREATED)?;
            w.write_json(&json!({"Id": 1}))?;
            Ok(())
        })],
        DispatcherConfig {
            disable_json_indent: true,
            ..DispatcherConfig::default()
        },
    )
    .unwrap();

    let recorded = run_request(
        &dispatcher,
        make_simple_request("POST", "http://1.2.3.4/things", None),
    )
    .await;
    recorded.code_is(201);
    recorded.content_type_is_json();
    recorded.body_is(r#"{"Id":1}"#);
    recorded.header_is("location", "http://1.2.3.4/things/1");
}

#[tokio::test]
async fn test_concurrent_requests() {
    let dispatcher = common::compact_dispatcher();

    let mut tasks = Vec::new();
    for i in 0..32 {
        let dispatcher = dispatcher.clone();
        tasks.push(tokio::spawn(async move {
            let path = if i % 4 == 0 {
                "http://1.2.3.4/auto-fails".to_string()
            } else {
                format!("http://1.2.3.4/r/{}", i)
            };
            let recorded = run_request(&dispatcher, make_simple_request("GET", &path, None)).await;
            (i, recorded)
        }));
    }

    for task in tasks {
        let (i, recorded) = task.await.unwrap();
        if i % 4 == 0 {
            recorded.code_is(500);
        } else {
            recorded.code_is(200);
            recorded.body_is(&format!(r#"{{"Id":"{}"}}"#, i));
        }
    }
}
