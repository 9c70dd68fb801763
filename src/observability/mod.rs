//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing / dispatcher / server
//!     → tracing events (routing decisions, access log, lifecycle)
//!     → logging.rs subscriber (stdout, plain or JSON)
//!
//! dispatcher recovery boundary
//!     → FailureLogger (injected per dispatcher)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON optional) for machine parsing
//! - Request ID flows into every per-request event
//! - Failure details stay server-side

pub mod logging;

pub use logging::{DiscardLogger, FailureCause, FailureLogger, FailureReport, TracingFailureLogger};
