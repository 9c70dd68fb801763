//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request id, timeout, body limit, trace)
//!     → dispatcher.rs (route lookup, recovery boundary)
//!     → handler.rs (user handler with request.rs / response.rs)
//!     → response.rs (assembled JSON response)
//!     → Send to client
//! ```

pub mod dispatcher;
pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use dispatcher::Dispatcher;
pub use handler::{BoxedHandler, Handler, HandlerResult};
pub use request::{Request, X_REQUEST_ID};
pub use response::{error, not_found, ErrorEnvelope, ResponseWriter, JSON_CONTENT_TYPE};
pub use server::HttpServer;
