//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     Route[] (method, "/literal/:param/*", handler)
//!     → pattern.rs (compile segments)
//!     → router.rs (freeze as immutable RouteTable)
//!
//! Incoming Request (method, path)
//!     → matcher.rs (walk table in registration order)
//!     → Return: Matched { handler, params } | PathNotFound | MethodNotAllowed
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by registration)

pub mod matcher;
pub mod params;
pub mod pattern;
pub mod router;

pub use matcher::MatchOutcome;
pub use params::Params;
pub use pattern::{PathPattern, Segment, WILDCARD_PARAM};
pub use router::{CompiledRoute, Route, RouteTable};
