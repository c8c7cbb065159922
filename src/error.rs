//! Error types.
use thiserror::Error;

/// The error type handlers and middleware fail with.
///
/// Any error convertible into a boxed error can be returned from a handler.
/// The dispatcher turns it into a `500 Internal Server Error` whose body is
/// the error's `Display` output.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A route pattern that cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The pattern does not begin with `/`.
    #[error("expected pattern beginning with '/', found: {0:?}")]
    MissingLeadingSlash(String),

    /// The same parameter name is declared twice.
    #[error("duplicate parameter `{name}` in pattern {pattern:?}")]
    DuplicateParam {
        /// The offending pattern.
        pattern: String,
        /// The repeated parameter name.
        name: String,
    },

    /// A `{name` token without its closing brace.
    #[error("unterminated parameter {segment:?} in pattern {pattern:?}")]
    UnterminatedParam {
        /// The offending pattern.
        pattern: String,
        /// The segment holding the token.
        segment: String,
    },

    /// A `:` or `{}` token without a name.
    #[error("parameter without a name in pattern {0:?}")]
    EmptyParamName(String),

    /// A segment using wildcard or parameter syntax the router does not support.
    #[error("unsupported segment {segment:?} in pattern {pattern:?}")]
    UnsupportedSegment {
        /// The offending pattern.
        pattern: String,
        /// The segment that could not be compiled.
        segment: String,
    },

    /// The matcher refused the pattern.
    #[error("invalid pattern {pattern:?}: {reason}")]
    Rejected {
        /// The offending pattern.
        pattern: String,
        /// Why the pattern was refused.
        reason: String,
    },
}
