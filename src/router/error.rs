//! Error types for route registration.

use thiserror::Error;

/// Errors that can occur while registering a route.
///
/// All of them are configuration errors: they surface when the route is
/// registered at startup, never while a request is being served.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A catch-all segment (`*name`) appears before the end of the pattern.
    #[error("Catch-all segment must be the last segment of pattern: {0}")]
    CatchAllNotLast(String),

    /// A `:` or `*` segment without a name.
    #[error("Empty parameter name in pattern: {0}")]
    EmptyParamName(String),

    /// The same parameter name is bound twice by one pattern.
    #[error("Duplicate parameter name '{name}' in pattern: {pattern}")]
    DuplicateParamName {
        /// The offending pattern.
        pattern: String,
        /// The repeated parameter name.
        name: String,
    },

    /// The pattern ends on the same trie node as a different, already
    /// registered pattern (for example `/user/:id` and `/user/:name`).
    #[error("Pattern {pattern} conflicts with registered pattern {existing}")]
    Conflict {
        /// The rejected pattern.
        pattern: String,
        /// The pattern that was registered first and is kept.
        existing: String,
    },

    /// The method is not one the request parser accepts, so the route could
    /// never match.
    #[error("Unsupported HTTP method: {0}")]
    UnknownMethod(String),

    /// The engine was frozen; its route table no longer accepts routes.
    #[error("Routes cannot be registered after the engine has been frozen")]
    EngineFrozen,
}
