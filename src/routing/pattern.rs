//! Route pattern compilation.
//!
//! # Syntax
//! ```text
//!  /literal        exact, case-sensitive segment
//!  /:name          named parameter, matches one non-empty segment
//!  /*              wildcard, matches the remaining path (final segment only)
//! ```
//!
//! # Design Decisions
//! - Compiled once at registration, immutable afterwards
//! - Empty segments (`//`, trailing `/`) are kept, so `/a/` and `/a` differ
//! - Request segments are percent-decoded exactly once, at match time,
//!   for literal comparison and parameter values alike

use std::fmt;
use std::str::FromStr;

use percent_encoding::percent_decode_str;

use crate::error::InvalidPatternError;
use crate::routing::Params;

/// Parameter name under which a wildcard binds the path tail.
pub const WILDCARD_PARAM: &str = "*";

/// One `/`-delimited unit of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
    Wildcard,
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Box<[Segment]>,
}

impl PathPattern {
    /// Compile a `/literal/:param/*` declaration.
    pub fn parse(pattern: &str) -> Result<Self, InvalidPatternError> {
        let rest = pattern
            .strip_prefix('/')
            .ok_or_else(|| InvalidPatternError::MissingLeadingSlash(pattern.to_string()))?;

        let mut segments = Vec::new();
        let mut parts = split_segments(rest).peekable();
        while let Some(part) = parts.next() {
            let segment = if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(InvalidPatternError::EmptyParamName(pattern.to_string()));
                }
                let duplicate = segments
                    .iter()
                    .any(|s| matches!(s, Segment::Param(existing) if existing == name));
                if duplicate {
                    return Err(InvalidPatternError::DuplicateParam {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }
                Segment::Param(name.to_string())
            } else if part == "*" {
                if parts.peek().is_some() {
                    return Err(InvalidPatternError::WildcardNotLast(pattern.to_string()));
                }
                Segment::Wildcard
            } else {
                Segment::Literal(part.to_string())
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments: segments.into_boxed_slice(),
        })
    }

    /// The declaration this pattern was compiled from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn has_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard))
    }

    /// Structurally match already-split request segments.
    ///
    /// Returns the bound parameters on success. Segments are percent-decoded
    /// once before literals are compared. A parameter never binds an empty
    /// segment. A trailing wildcard absorbs every remaining segment,
    /// including none.
    pub fn match_segments(&self, path: &[&str]) -> Option<Params> {
        let fixed = if self.has_wildcard() {
            self.segments.len() - 1
        } else {
            self.segments.len()
        };

        if self.has_wildcard() {
            if path.len() < fixed {
                return None;
            }
        } else if path.len() != fixed {
            return None;
        }

        let mut params = Params::new();
        for (segment, value) in self.segments.iter().zip(path) {
            match segment {
                Segment::Literal(text) => {
                    if percent_decode_str(value).decode_utf8_lossy() != text.as_str() {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if value.is_empty() {
                        return None;
                    }
                    params.push(name.clone(), decode(value));
                }
                Segment::Wildcard => break,
            }
        }

        if self.has_wildcard() {
            params.push(WILDCARD_PARAM.to_string(), decode(&path[fixed..].join("/")));
        }

        Some(params)
    }

    /// Convenience wrapper over [`match_segments`](Self::match_segments) for a raw path.
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let rest = path.strip_prefix('/')?;
        let segments: Vec<&str> = split_segments(rest).collect();
        self.match_segments(&segments)
    }
}

/// Split the part of a path after its leading `/`.
///
/// `""` yields no segments, so `/` matches the empty pattern. Every other
/// input keeps its empty segments.
pub(crate) fn split_segments(rest: &str) -> impl Iterator<Item = &str> {
    let empty = rest.is_empty();
    rest.split('/').filter(move |_| !empty)
}

fn decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

impl FromStr for PathPattern {
    type Err = InvalidPatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
