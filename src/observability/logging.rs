//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber from configuration
//! - Define the failure-report seam used by the dispatcher's 500 path
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - Log level configurable via config and `RUST_LOG`
//! - The failure logger is injected into each dispatcher, never global

use std::fmt;

use axum::http::Method;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::error::HandlerError;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `config.log_level` when set.
pub fn init(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("jsonrest={0},tower_http={0}", config.log_level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    }
}

/// Why a handler did not finish normally.
#[derive(Debug)]
pub enum FailureCause<'a> {
    /// The handler returned an error it did not handle itself.
    Error(&'a HandlerError),
    /// The handler panicked; carries the panic message.
    Panic(&'a str),
}

impl fmt::Display for FailureCause<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Error(e) => write!(f, "handler error: {}", e),
            FailureCause::Panic(msg) => write!(f, "handler panicked: {}", msg),
        }
    }
}

/// Everything known about one failed handler invocation.
#[derive(Debug)]
pub struct FailureReport<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub request_id: Option<&'a str>,
    pub cause: FailureCause<'a>,
    /// The handler had already written a body when it failed.
    pub committed: bool,
}

/// Sink for handler failures. Must be safe to call from many requests at once.
pub trait FailureLogger: Send + Sync {
    fn handler_failed(&self, report: &FailureReport<'_>);
}

/// Reports failures as `tracing` error events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFailureLogger;

impl FailureLogger for TracingFailureLogger {
    fn handler_failed(&self, report: &FailureReport<'_>) {
        tracing::error!(
            request_id = report.request_id.unwrap_or("unknown"),
            method = %report.method,
            path = %report.path,
            committed = report.committed,
            cause = %report.cause,
            "Handler failed"
        );
    }
}

/// Drops every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardLogger;

impl FailureLogger for DiscardLogger {
    fn handler_failed(&self, _report: &FailureReport<'_>) {}
}
