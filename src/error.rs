//! Error types.

use std::string::FromUtf8Error;

use thiserror::Error;

/// A path template that cannot be registered.
///
/// These are reported when a route is added, never while serving a request.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum RouteError {
    /// A segment opens a parameter with `{` but never closes it.
    #[error("unterminated parameter `{segment}` in `{template}`")]
    UnterminatedParam {
        /// The offending template.
        template: String,
        /// The offending segment.
        segment: String,
    },

    /// A segment is `{}` or `{...}`.
    #[error("empty parameter name in `{template}`")]
    EmptyParamName {
        /// The offending template.
        template: String,
    },

    /// A catch-all parameter is followed by further segments.
    #[error("catch-all parameter `{name}` must be the last segment of `{template}`")]
    CatchAllNotLast {
        /// The offending template.
        template: String,
        /// The catch-all parameter name.
        name: String,
    },

    /// More than one catch-all parameter in one template.
    #[error("more than one catch-all parameter in `{template}`")]
    MultipleCatchAll {
        /// The offending template.
        template: String,
    },

    /// The same parameter name appears twice.
    #[error("duplicate parameter `{name}` in `{template}`")]
    DuplicateParam {
        /// The offending template.
        template: String,
        /// The repeated name.
        name: String,
    },
}

/// A possible error value when reading the body.
#[derive(Debug, Error)]
pub enum ReadBodyError {
    /// Body is not a valid utf8 string.
    #[error("invalid utf8: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// Error from the underlying transport.
    #[error("hyper: {0}")]
    Hyper(#[from] hyper::Error),
}
