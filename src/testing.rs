//! Helpers for exercising a [`Dispatcher`] in-process.
//!
//! ```rust,no_run
//! # use jsonrest::{http::Dispatcher, testing};
//! # async fn demo(dispatcher: Dispatcher) {
//! let recorded = testing::run_request(
//!     &dispatcher,
//!     testing::make_simple_request("GET", "http://1.2.3.4/r/123", None),
//! )
//! .await;
//! recorded.code_is(200);
//! recorded.content_type_is_json();
//! # }
//! ```

use axum::body::{Body, Bytes};
use axum::http::header::{CONTENT_TYPE, HOST};
use axum::http::{HeaderMap, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::http::{Dispatcher, JSON_CONTENT_TYPE};

/// Build a request, JSON-encoding `payload` as its body when present.
///
/// # Panics
/// If `method` or `url` is not valid HTTP.
pub fn make_simple_request(method: &str, url: &str, payload: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(url);

    if let Some(authority) = url
        .split_once("://")
        .and_then(|(_, rest)| rest.split('/').next())
        .filter(|authority| !authority.is_empty())
    {
        builder = builder.header(HOST, authority);
    }

    let body = match payload {
        Some(value) => {
            builder = builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE);
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    builder
        .body(body)
        .unwrap_or_else(|e| panic!("invalid test request {} {}: {}", method, url, e))
}

/// Dispatch `request` and buffer the whole response.
pub async fn run_request(dispatcher: &Dispatcher, request: Request<Body>) -> Recorded {
    let response = dispatcher.dispatch(request).await;
    let (parts, body) = response.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_else(|e| panic!("failed to buffer response body: {}", e));

    Recorded {
        status: parts.status,
        headers: parts.headers,
        body,
    }
}

/// A buffered response with assertion helpers.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn code_is(&self, expected: u16) {
        assert_eq!(
            self.status.as_u16(),
            expected,
            "unexpected status, body: {}",
            self.body_str()
        );
    }

    pub fn header_is(&self, name: &str, expected: &str) {
        let got = self.headers.get(name).and_then(|v| v.to_str().ok());
        assert_eq!(got, Some(expected), "header {}", name);
    }

    pub fn content_type_is_json(&self) {
        self.header_is(CONTENT_TYPE.as_str(), JSON_CONTENT_TYPE);
    }

    pub fn body_is(&self, expected: &str) {
        assert_eq!(self.body_str(), expected);
    }

    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or("<non-utf8 body>")
    }

    /// Decode the body as JSON.
    pub fn decode_json_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_make_simple_request_with_payload() {
        let request = make_simple_request("POST", "http://1.2.3.4/r/123", Some(json!({"Test": "Test"})));
        assert_eq!(request.method(), "POST");
        assert_eq!(request.uri().path(), "/r/123");
        assert_eq!(request.headers()[HOST], "1.2.3.4");
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_make_simple_request_without_payload() {
        let request = make_simple_request("GET", "/local", None);
        assert!(request.headers().get(CONTENT_TYPE).is_none());
        assert!(request.headers().get(HOST).is_none());
    }
}
