//! Request dispatch and failure recovery.
//!
//! # State Machine
//! ```text
//! Routing ──PathNotFound──────▶ Responded (404 envelope)
//!    │    ──MethodNotAllowed──▶ Responded (405 envelope + Allow)
//!    │
//!    └─Matched─▶ Executing ──Ok──────────────────▶ Responded (handler's response)
//!                          ──Err(UnsupportedMedia)▶ Responded (415 envelope)
//!                          ──Err(_) / panic───────▶ Responded (500 envelope, cause logged)
//! ```
//!
//! # Design Decisions
//! - One recovery boundary per request, around the whole handler future
//! - A failure after the handler wrote a body is logged and that body is
//!   sent unchanged; a status or headers staged without a body are discarded
//! - Never returns an error to the transport

use std::any::Any;
use std::convert::Infallible;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::body::Body;
use axum::http::header::ALLOW;
use axum::http::{Method, Response, StatusCode};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tower::Service;

use crate::config::DispatcherConfig;
use crate::error::{HandlerError, InvalidPatternError};
use crate::http::handler::{BoxedHandler, HandlerResult};
use crate::http::request::{Request, X_REQUEST_ID};
use crate::http::response::{
    error, override_with_error, ResponseWriter, INTERNAL_ERROR_MESSAGE, METHOD_NOT_ALLOWED_MESSAGE, NOT_FOUND_MESSAGE,
    UNSUPPORTED_MEDIA_TYPE_MESSAGE,
};
use crate::observability::{FailureCause, FailureLogger, FailureReport, TracingFailureLogger};
use crate::routing::{MatchOutcome, Route, RouteTable};

/// Entry point for every request: routes it, runs the handler, and
/// guarantees a written response.
#[derive(Clone)]
pub struct Dispatcher {
    routes: RouteTable<BoxedHandler>,
    config: DispatcherConfig,
    logger: Arc<dyn FailureLogger>,
}

impl Dispatcher {
    /// Compile `routes` (order is significant) into a dispatcher.
    pub fn new<I>(routes: I, config: DispatcherConfig) -> Result<Self, InvalidPatternError>
    where
        I: IntoIterator<Item = Route<BoxedHandler>>,
    {
        let routes = RouteTable::new(routes)?;
        tracing::info!(routes = routes.len(), "Route table built");
        Ok(Self {
            routes,
            config,
            logger: Arc::new(TracingFailureLogger),
        })
    }

    /// Replace the logger used for handler failures.
    pub fn with_logger(mut self, logger: Arc<dyn FailureLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn routes(&self) -> &RouteTable<BoxedHandler> {
        &self.routes
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Handle one request to completion.
    pub async fn dispatch(&self, request: axum::http::Request<Body>) -> Response<Body> {
        let start_time = Instant::now();
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let request_id = request
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let writer = ResponseWriter::new(!self.config.disable_json_indent);

        match self.routes.find(&method, &path) {
            MatchOutcome::PathNotFound => {
                tracing::debug!(method = %method, path = %path, "No route matched");
                error(&writer, NOT_FOUND_MESSAGE, StatusCode::NOT_FOUND);
            }
            MatchOutcome::MethodNotAllowed => {
                tracing::debug!(method = %method, path = %path, "Method not allowed");
                let allow = self
                    .routes
                    .allowed_methods(&path)
                    .iter()
                    .map(Method::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                if let Err(e) = writer.insert_header(ALLOW.as_str(), &allow) {
                    tracing::warn!(error = %e, "Failed to set Allow header");
                }
                error(&writer, METHOD_NOT_ALLOWED_MESSAGE, StatusCode::METHOD_NOT_ALLOWED);
            }
            MatchOutcome::Matched { handler, params } => {
                let handler = Arc::clone(handler);
                let request = Request::new(
                    request,
                    params,
                    self.config.relaxed_content_type,
                    writer.clone(),
                );
                let handler_writer = writer.clone();

                // The handler is invoked inside the guarded future so that a
                // panic before its first await is caught too.
                let outcome = AssertUnwindSafe(async move { handler.call(handler_writer, request).await })
                    .catch_unwind()
                    .await;

                self.recover(&writer, &method, &path, request_id.as_deref(), outcome);
            }
        }

        let response = writer.take_response();
        if self.config.access_log {
            tracing::info!(
                request_id = request_id.as_deref().unwrap_or("unknown"),
                method = %method,
                path = %path,
                status = response.status().as_u16(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Request handled"
            );
        }
        response
    }

    fn recover(
        &self,
        writer: &ResponseWriter,
        method: &Method,
        path: &str,
        request_id: Option<&str>,
        outcome: Result<HandlerResult, Box<dyn Any + Send>>,
    ) {
        let panic_message;
        let cause = match &outcome {
            Ok(Ok(())) => return,
            // Usually already answered by the decoder.
            Ok(Err(HandlerError::UnsupportedMediaType)) => {
                override_with_error(
                    writer,
                    UNSUPPORTED_MEDIA_TYPE_MESSAGE,
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                );
                return;
            }
            Ok(Err(e)) => FailureCause::Error(e),
            Err(payload) => {
                panic_message = panic_text(&**payload);
                FailureCause::Panic(&panic_message)
            }
        };

        self.logger.handler_failed(&FailureReport {
            method,
            path,
            request_id,
            cause,
            committed: writer.has_body(),
        });

        override_with_error(writer, INTERNAL_ERROR_MESSAGE, StatusCode::INTERNAL_SERVER_ERROR);
    }
}

fn panic_text(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.routes)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Service<axum::http::Request<Body>> for Dispatcher {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: axum::http::Request<Body>) -> Self::Future {
        let dispatcher = self.clone();
        Box::pin(async move { Ok(dispatcher.dispatch(request).await) })
    }
}
