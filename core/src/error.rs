//! Failure taxonomy and response classification for the query layer.
//!
//! Three layers, from the outside in:
//!
//! - [`FailureKind`] — the closed set of failures an upstream provider can
//!   report. Exhaustive; new kinds are a breaking change on purpose.
//! - [`SourceError`] — what a capability call actually returns on failure:
//!   either a classified kind or an unclassified error that must surface as
//!   internal with its message intact. Never swallowed.
//! - [`QueryError`] — everything a query operation can fail with: an
//!   upstream failure, or a capability-resolution gap (which is an
//!   integration problem, not a data problem, and is kept distinct).
//!
//! [`ResponseClass`] is the total mapping consumed by transport glue. The
//! match is exhaustive over the closed enums, so adding a failure kind
//! without classifying it does not compile.

use thiserror::Error;

// ---------------------------------------------------------------------------
// FailureKind
// ---------------------------------------------------------------------------

/// Classified failures an upstream transaction source can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureKind {
    /// The supplied address is missing or malformed for the target chain.
    #[error("invalid address")]
    InvalidAddress,

    /// The supplied extended public key is missing or malformed.
    #[error("invalid extended public key")]
    InvalidKey,

    /// The identifier is valid but the source has no data for it.
    #[error("not found")]
    NotFound,

    /// The source is temporarily unreachable. Callers may retry with backoff.
    #[error("transaction source unavailable")]
    SourceUnavailable,

    /// The source failed in a way that is its own fault, with detail.
    #[error("internal source error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// SourceError
// ---------------------------------------------------------------------------

/// Failure returned by one upstream capability call.
///
/// Providers classify what they can into [`FailureKind`]; anything else
/// rides along as [`SourceError::Other`] and is reported as internal with
/// its message preserved for diagnostics.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A classified upstream failure.
    #[error(transparent)]
    Kind(#[from] FailureKind),

    /// An unclassified upstream failure. Never silently discarded.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

// ---------------------------------------------------------------------------
// QueryError
// ---------------------------------------------------------------------------

/// Everything a query operation can return instead of a page.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The upstream capability call failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// No capability on this chain integration can serve the request shape.
    ///
    /// Distinct from any upstream-reported failure: the upstream was never
    /// called. This signals an integration gap, not a data problem.
    #[error("no {operation} capability for this chain")]
    NoCapability {
        /// Name of the missing capability (e.g., "token-transactions").
        operation: &'static str,
    },
}

impl From<FailureKind> for QueryError {
    fn from(kind: FailureKind) -> Self {
        QueryError::Source(SourceError::Kind(kind))
    }
}

// ---------------------------------------------------------------------------
// ResponseClass
// ---------------------------------------------------------------------------

/// Transport-neutral response classification.
///
/// The HTTP glue maps these onto status codes; the core never speaks HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    /// The client sent a missing or invalid identifier.
    BadRequest,
    /// Valid identifier, no data.
    NotFound,
    /// Transient upstream fault; retry with backoff is reasonable.
    ServiceUnavailable,
    /// Integration gap or unclassified upstream failure.
    Internal,
}

impl QueryError {
    /// Classifies this error for the transport layer.
    ///
    /// Total over the taxonomy — every variant of every nested enum is
    /// matched, and the compiler keeps it that way.
    pub fn response_class(&self) -> ResponseClass {
        match self {
            QueryError::Source(SourceError::Kind(kind)) => match kind {
                FailureKind::InvalidAddress | FailureKind::InvalidKey => ResponseClass::BadRequest,
                FailureKind::NotFound => ResponseClass::NotFound,
                FailureKind::SourceUnavailable => ResponseClass::ServiceUnavailable,
                FailureKind::Internal(_) => ResponseClass::Internal,
            },
            QueryError::Source(SourceError::Other(_)) => ResponseClass::Internal,
            QueryError::NoCapability { .. } => ResponseClass::Internal,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
