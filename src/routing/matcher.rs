//! Route matching logic.
//!
//! # Responsibilities
//! - Walk the route table in registration order
//! - Bind path parameters for the winning route
//! - Classify misses as wrong path (404) or wrong method (405)
//!
//! # Design Decisions
//! - Path matching is case-sensitive, method matching is exact
//! - No normalization: `/a/` and `/a` are different paths
//! - A path-only match anywhere in the table turns a miss into
//!   `MethodNotAllowed`, regardless of which method registered it

use axum::http::Method;

use crate::routing::pattern::split_segments;
use crate::routing::router::RouteTable;
use crate::routing::Params;

/// Result of looking up one request.
#[derive(Debug)]
pub enum MatchOutcome<'a, H> {
    Matched { handler: &'a H, params: Params },
    PathNotFound,
    MethodNotAllowed,
}

impl<H> MatchOutcome<'_, H> {
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched { .. })
    }
}

impl<H> RouteTable<H> {
    /// Find the route for `method` and `path`.
    pub fn find(&self, method: &Method, path: &str) -> MatchOutcome<'_, H> {
        let Some(rest) = path.strip_prefix('/') else {
            return MatchOutcome::PathNotFound;
        };
        let segments: Vec<&str> = split_segments(rest).collect();

        let mut path_matched = false;
        for route in self.iter() {
            let Some(params) = route.pattern.match_segments(&segments) else {
                continue;
            };
            if route.method == *method {
                return MatchOutcome::Matched {
                    handler: &route.handler,
                    params,
                };
            }
            path_matched = true;
        }

        if path_matched {
            MatchOutcome::MethodNotAllowed
        } else {
            MatchOutcome::PathNotFound
        }
    }

    /// Methods registered for patterns that match `path`, deduplicated,
    /// in registration order.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let Some(rest) = path.strip_prefix('/') else {
            return Vec::new();
        };
        let segments: Vec<&str> = split_segments(rest).collect();

        let mut allowed: Vec<Method> = Vec::new();
        for route in self.iter() {
            if allowed.contains(&route.method) {
                continue;
            }
            if route.pattern.match_segments(&segments).is_some() {
                allowed.push(route.method.clone());
            }
        }
        allowed
    }
}
