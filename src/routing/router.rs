//! Route registration and the compiled route table.
//!
//! # Responsibilities
//! - Hold route declarations in registration order
//! - Compile every pattern once, failing the whole build on the first bad one
//! - Expose the table as an immutable snapshot
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Registration order is the only tie-break, so storage is a flat slice
//! - Cloning a table clones an `Arc`, never the routes

use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::error::InvalidPatternError;
use crate::routing::pattern::PathPattern;

/// A `(method, pattern, handler)` declaration, not yet compiled.
pub struct Route<H> {
    pub method: Method,
    pub pattern: String,
    pub handler: H,
}

impl<H> Route<H> {
    pub fn new(method: Method, pattern: impl Into<String>, handler: H) -> Self {
        Self {
            method,
            pattern: pattern.into(),
            handler,
        }
    }
}

impl<H> fmt::Debug for Route<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// A route whose pattern has been compiled.
pub struct CompiledRoute<H> {
    pub method: Method,
    pub pattern: PathPattern,
    pub handler: H,
}

impl<H> fmt::Debug for CompiledRoute<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRoute")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Ordered, read-only collection of compiled routes.
pub struct RouteTable<H> {
    routes: Arc<[CompiledRoute<H>]>,
}

impl<H> RouteTable<H> {
    /// Compile `routes`, preserving their order exactly.
    pub fn new<I>(routes: I) -> Result<Self, InvalidPatternError>
    where
        I: IntoIterator<Item = Route<H>>,
    {
        let compiled = routes
            .into_iter()
            .map(|route| {
                let pattern = PathPattern::parse(&route.pattern)?;
                tracing::debug!(
                    method = %route.method,
                    pattern = %pattern,
                    "Route registered"
                );
                Ok(CompiledRoute {
                    method: route.method,
                    pattern,
                    handler: route.handler,
                })
            })
            .collect::<Result<Vec<_>, InvalidPatternError>>()?;

        Ok(Self {
            routes: compiled.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, CompiledRoute<H>> {
        self.routes.iter()
    }
}

impl<H> Clone for RouteTable<H> {
    fn clone(&self) -> Self {
        Self {
            routes: Arc::clone(&self.routes),
        }
    }
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self {
            routes: Arc::from(Vec::new()),
        }
    }
}

impl<H> fmt::Debug for RouteTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.routes.iter()).finish()
    }
}
