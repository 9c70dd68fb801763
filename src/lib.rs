//! Minimal JSON REST request dispatch.
//!
//! Routes `(method, "/literal/:param/*")` declarations to async handlers,
//! binds path parameters, enforces `Content-Type: application/json` on
//! payload decoding, and turns every failure into a `{"Error": ...}` body.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod testing;

pub use config::AppConfig;
pub use error::{HandlerError, InvalidPatternError, PayloadError, WriteError};
pub use http::{error, not_found, Dispatcher, HandlerResult, HttpServer, Request, ResponseWriter};
pub use lifecycle::Shutdown;
pub use routing::Route;
