//! Shared fixtures for integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use jsonrest::config::DispatcherConfig;
use jsonrest::http::{BoxedHandler, Dispatcher};
use jsonrest::observability::DiscardLogger;
use jsonrest::{error, not_found, Route};
use axum::http::StatusCode;
use serde_json::Value;

/// The resource routes used across the dispatcher tests.
pub fn resource_routes() -> Vec<Route<BoxedHandler>> {
    vec![
        Route::get("/r/:id", |w, r| async move {
            let id = r.path_param("id");
            w.write_json(&HashMap::from([("Id", id)]))?;
            Ok(())
        }),
        Route::post("/r/:id", |w, r| async move {
            // JSON echo
            let data: HashMap<String, String> = r.decode_json_payload().await?;
            w.write_json(&data)?;
            Ok(())
        }),
        Route::get("/auto-fails", |_w, _r| async move {
            let empty: Vec<i32> = Vec::new();
            let _first = empty[0];
            Ok(())
        }),
        Route::get("/user-error", |w, _r| async move {
            error(&w, "My error", StatusCode::INTERNAL_SERVER_ERROR);
            Ok(())
        }),
        Route::get("/user-notfound", |w, r| async move {
            not_found(&w, &r);
            Ok(())
        }),
        Route::post("/decode-error", |w, r| async move {
            match r.decode_json_payload::<Value>().await {
                Ok(value) => w.write_json(&value)?,
                Err(e) => error(&w, &e.to_string(), StatusCode::BAD_REQUEST),
            }
            Ok(())
        }),
    ]
}

/// Compact-output dispatcher over [`resource_routes`], failures discarded.
#[allow(dead_code)]
pub fn compact_dispatcher() -> Dispatcher {
    let config = DispatcherConfig {
        disable_json_indent: true,
        ..DispatcherConfig::default()
    };
    Dispatcher::new(resource_routes(), config)
        .unwrap()
        .with_logger(Arc::new(DiscardLogger))
}
