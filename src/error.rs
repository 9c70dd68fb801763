//! Error taxonomy for the dispatch core.
//!
//! # Design Decisions
//! - Routing failures are not errors here: they are `MatchOutcome` variants
//!   and always end in a fixed 404/405 envelope.
//! - `PayloadError` is handed back to the handler; only the content-type
//!   variant has a fixed wire mapping (415).
//! - Everything a handler propagates that is not a content-type failure is
//!   an unhandled failure and becomes a 500.

use thiserror::Error;

/// A route declaration that cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPatternError {
    /// The pattern does not start with `/`.
    #[error("pattern must begin with '/': {0:?}")]
    MissingLeadingSlash(String),

    /// A `:` segment with nothing after it.
    #[error("empty parameter name in pattern {0:?}")]
    EmptyParamName(String),

    /// A `*` segment that is not the last one.
    #[error("wildcard must be the final segment in pattern {0:?}")]
    WildcardNotLast(String),

    /// The same parameter name bound twice in one pattern.
    #[error("duplicate parameter {name:?} in pattern {pattern:?}")]
    DuplicateParam { pattern: String, name: String },
}

/// Failures while decoding a request body.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// `Content-Type` was not exactly `application/json`.
    #[error("Bad Content-Type, expected 'application/json'")]
    UnsupportedMediaType,

    /// The body could not be read from the transport.
    #[error("failed to read request body: {0}")]
    Read(#[source] axum::Error),

    /// The body was read but is not valid JSON for the target type.
    #[error("failed to decode JSON payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures while writing a response.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The value could not be marshaled.
    #[error("failed to encode JSON response: {0}")]
    Encode(#[from] serde_json::Error),

    /// Status and headers were already fixed by an earlier write.
    #[error("response already committed with status {0}")]
    AlreadyCommitted(u16),

    /// A header name or value that is not valid HTTP.
    #[error("invalid header {0:?}")]
    InvalidHeader(String),
}

/// What a handler may propagate to the dispatcher.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Answered with the fixed 415 envelope.
    #[error("unsupported media type")]
    UnsupportedMediaType,

    #[error(transparent)]
    Payload(PayloadError),

    #[error(transparent)]
    Write(#[from] WriteError),

    /// Any other application failure.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl From<PayloadError> for HandlerError {
    fn from(err: PayloadError) -> Self {
        match err {
            PayloadError::UnsupportedMediaType => HandlerError::UnsupportedMediaType,
            other => HandlerError::Payload(other),
        }
    }
}

impl HandlerError {
    /// Wrap an arbitrary error as an unhandled handler failure.
    pub fn other<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        HandlerError::Other(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_failure_maps_to_dedicated_variant() {
        let err: HandlerError = PayloadError::UnsupportedMediaType.into();
        assert!(matches!(err, HandlerError::UnsupportedMediaType));
    }

    #[test]
    fn test_decode_failure_stays_a_payload_error() {
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: HandlerError = PayloadError::Decode(decode).into();
        assert!(matches!(err, HandlerError::Payload(PayloadError::Decode(_))));
    }

    #[test]
    fn test_media_type_message_matches_envelope_text() {
        assert_eq!(
            PayloadError::UnsupportedMediaType.to_string(),
            "Bad Content-Type, expected 'application/json'"
        );
    }
}
