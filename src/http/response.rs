//! Response writing.
//!
//! # Responsibilities
//! - Encode handler values as JSON (indented unless disabled)
//! - Track status and headers so they are fixed at most once
//! - Produce the `{"Error": ...}` envelope for every framework failure
//!
//! # Design Decisions
//! - The writer is a cloneable handle; the dispatcher keeps one clone so the
//!   response survives a handler panic
//! - The response is assembled in memory and only handed to the transport
//!   once the handler is finished

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::body::{Body, Bytes};
use axum::http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use axum::http::{HeaderMap, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::WriteError;
use crate::http::request::Request;

pub const JSON_CONTENT_TYPE: &str = "application/json";

pub const NOT_FOUND_MESSAGE: &str = "Resource not found";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";
pub const UNSUPPORTED_MEDIA_TYPE_MESSAGE: &str = "Bad Content-Type, expected 'application/json'";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Body shape of every framework-produced error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(rename = "Error")]
    pub error: String,
}

#[derive(Debug, Default)]
struct ResponseState {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Option<Bytes>,
}

/// Handle onto the response of one request.
#[derive(Debug, Clone)]
pub struct ResponseWriter {
    state: Arc<Mutex<ResponseState>>,
    indent: bool,
}

impl ResponseWriter {
    pub fn new(indent: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(ResponseState::default())),
            indent,
        }
    }

    // A poisoned lock still guards a usable response.
    fn lock(&self) -> MutexGuard<'_, ResponseState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marshal `value` the way [`write_json`](Self::write_json) would, without writing it.
    pub fn encode_json<T>(&self, value: &T) -> Result<Vec<u8>, WriteError>
    where
        T: Serialize + ?Sized,
    {
        let bytes = if self.indent {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(bytes)
    }

    /// Encode `value` and write it as the response body.
    ///
    /// Sets `Content-Type: application/json` and status 200 unless
    /// [`write_header`](Self::write_header) already chose one.
    pub fn write_json<T>(&self, value: &T) -> Result<(), WriteError>
    where
        T: Serialize + ?Sized,
    {
        let bytes = self.encode_json(value)?;

        let mut state = self.lock();
        if state.body.is_some() {
            let status = state.status.unwrap_or(StatusCode::OK);
            return Err(WriteError::AlreadyCommitted(status.as_u16()));
        }
        if state.status.is_none() {
            state.status = Some(StatusCode::OK);
            state
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }
        state.body = Some(Bytes::from(bytes));
        Ok(())
    }

    /// Fix the status code (and the JSON content type) before writing a body.
    pub fn write_header(&self, status: StatusCode) -> Result<(), WriteError> {
        let mut state = self.lock();
        if let Some(existing) = state.status {
            return Err(WriteError::AlreadyCommitted(existing.as_u16()));
        }
        state.status = Some(status);
        state
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        Ok(())
    }

    /// Add a header. Only allowed until the status is fixed.
    pub fn insert_header(&self, name: &str, value: &str) -> Result<(), WriteError> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| WriteError::InvalidHeader(name.to_string()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| WriteError::InvalidHeader(name.to_string()))?;

        let mut state = self.lock();
        if let Some(existing) = state.status {
            return Err(WriteError::AlreadyCommitted(existing.as_u16()));
        }
        state.headers.insert(header_name, header_value);
        Ok(())
    }

    /// Whether the status has been fixed.
    pub fn is_committed(&self) -> bool {
        self.lock().status.is_some()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.lock().status
    }

    /// Whether a body has been written.
    pub fn has_body(&self) -> bool {
        self.lock().body.is_some()
    }

    /// Take the accumulated state as a transport response.
    ///
    /// A handler that never wrote anything yields an empty 200.
    pub(crate) fn take_response(&self) -> Response<Body> {
        let state = std::mem::take(&mut *self.lock());

        let mut response = Response::new(state.body.map(Body::from).unwrap_or_else(Body::empty));
        *response.status_mut() = state.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = state.headers;
        response
    }
}

/// Write `{"Error": message}` with status `code`.
///
/// If the response is already committed the envelope cannot be written;
/// that is logged and the existing response stands.
pub fn error(w: &ResponseWriter, message: &str, code: StatusCode) {
    let envelope = ErrorEnvelope {
        error: message.to_string(),
    };

    let result = w
        .write_header(code)
        .and_then(|()| w.write_json(&envelope));

    if let Err(e) = result {
        tracing::warn!(
            status = code.as_u16(),
            message = %message,
            error = %e,
            "Error envelope dropped"
        );
    }
}

/// Replace whatever the handler staged with an error envelope.
///
/// Status and headers set without a body are discarded. A written body
/// stands, and `false` is returned.
pub(crate) fn override_with_error(w: &ResponseWriter, message: &str, code: StatusCode) -> bool {
    {
        let mut state = w.lock();
        if state.body.is_some() {
            return false;
        }
        *state = ResponseState::default();
    }
    error(w, message, code);
    true
}

/// Shorthand for a 404 envelope.
pub fn not_found(w: &ResponseWriter, _r: &Request) {
    error(w, NOT_FOUND_MESSAGE, StatusCode::NOT_FOUND);
}
