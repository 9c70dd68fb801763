//! Request context handed to handlers.
//!
//! # Responsibilities
//! - Expose the path parameters bound by the matcher
//! - Decode JSON payloads, enforcing `Content-Type: application/json`
//! - Build absolute URLs relative to the incoming request
//!
//! # Design Decisions
//! - Content type is checked before the body is touched; a mismatch answers
//!   415 on the spot, so later writes by the handler fail
//! - Exact match only: `application/json; charset=utf-8` is rejected
//!   unless the dispatcher runs with a relaxed content type
//! - The body can be consumed once; later decodes see an empty body

use std::sync::{Mutex, PoisonError};

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, HOST};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use serde::de::DeserializeOwned;

use crate::error::PayloadError;
use crate::http::response::{
    override_with_error, ResponseWriter, JSON_CONTENT_TYPE, UNSUPPORTED_MEDIA_TYPE_MESSAGE,
};
use crate::routing::Params;

pub const X_REQUEST_ID: &str = "x-request-id";

/// An inbound request together with its matched path parameters.
#[derive(Debug)]
pub struct Request {
    parts: Parts,
    // Behind a mutex so `Request` stays `Sync`.
    body: Mutex<Option<Body>>,
    params: Params,
    relaxed_content_type: bool,
    writer: ResponseWriter,
}

impl Request {
    pub(crate) fn new(
        request: axum::http::Request<Body>,
        params: Params,
        relaxed_content_type: bool,
        writer: ResponseWriter,
    ) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            parts,
            body: Mutex::new(Some(body)),
            params,
            relaxed_content_type,
            writer,
        }
    }

    /// Value bound to the path parameter `name`, or `""` if there is none.
    pub fn path_param(&self, name: &str) -> &str {
        self.params.get(name).unwrap_or("")
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Request id assigned by the server's request-id layer, if any.
    pub fn request_id(&self) -> Option<&str> {
        self.parts
            .headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
    }

    /// Whether the `Content-Type` header is exactly `application/json`.
    pub fn has_json_content_type(&self) -> bool {
        self.parts
            .headers
            .get(CONTENT_TYPE)
            .is_some_and(|v| v.as_bytes() == JSON_CONTENT_TYPE.as_bytes())
    }

    /// Read the body and decode it as JSON into `T`.
    pub async fn decode_json_payload<T>(&self) -> Result<T, PayloadError>
    where
        T: DeserializeOwned,
    {
        if !self.relaxed_content_type && !self.has_json_content_type() {
            if !override_with_error(
                &self.writer,
                UNSUPPORTED_MEDIA_TYPE_MESSAGE,
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ) {
                tracing::warn!(
                    path = %self.parts.uri.path(),
                    "Unsupported media type after body was written"
                );
            }
            return Err(PayloadError::UnsupportedMediaType);
        }

        let body = self
            .body
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_else(Body::empty);

        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(PayloadError::Read)?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Scheme and authority this request was addressed to, e.g. `http://1.2.3.4`.
    pub fn base_url(&self) -> String {
        let scheme = self.parts.uri.scheme_str().unwrap_or("http");
        let host = self
            .parts
            .headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .or_else(|| self.parts.uri.authority().map(|a| a.as_str()))
            .unwrap_or("localhost");
        format!("{}://{}", scheme, host)
    }

    /// Absolute URL for `path` on the same host.
    pub fn uri_for(&self, path: &str) -> String {
        let base = self.base_url();
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}
