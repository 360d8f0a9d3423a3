//! Request parsing errors.

use thiserror::Error;

/// Why a request could not be parsed.
#[derive(Debug, Error)]
pub enum Error {
    /// The request is empty.
    #[error("Empty request")]
    EmptyRequest,

    /// The request line does not have exactly a method, a target and a version.
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// The request target is not in origin form (`/path?query`).
    #[error("Invalid HTTP path")]
    InvalidPath,

    /// The percent-decoded path is not valid UTF-8.
    #[error("Invalid path encoding: {0}")]
    InvalidPathEncoding(String),

    #[error("Invalid HTTP version: {0}")]
    InvalidVersion(String),

    /// A header line has no `:` separator.
    #[error("Invalid header format")]
    InvalidHeaderFormat,

    /// A required header is missing from the request.
    #[error("Required header is missing: {0}")]
    MissingHeader(String),

    /// `Content-Length` is not a non-negative integer.
    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// The body is not the JSON the caller asked for.
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}
