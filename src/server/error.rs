//! Error types for the HTTP server.

use thiserror::Error;

use crate::parser::Error as ParserError;
use crate::router::RouteError;

/// Errors raised while setting up or running the server.
///
/// Handler-level failures never show up here: they are turned into error
/// responses inside the request's [`Context`](crate::Context).
#[derive(Debug, Error)]
pub enum Error {
    /// The request bytes could not be parsed; a `400` was sent.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The connection closed before the declared body arrived; a `400` was sent.
    #[error("Connection closed after {received} of {expected} request bytes")]
    IncompleteRequest {
        /// Head plus declared body length.
        expected: usize,
        /// Bytes read before the connection closed.
        received: usize,
    },

    /// The request exceeds `max_request_size`; a `413` was sent.
    #[error("Request larger than {0} bytes")]
    RequestTooLarge(usize),

    /// A route or group could not be registered.
    #[error("Route error: {0}")]
    RouteError(#[from] RouteError),

    /// A response body could not be serialized.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
