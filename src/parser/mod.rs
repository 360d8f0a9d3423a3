//! HTTP/1.x request parsing.
//!
//! [`parse_request`] turns the bytes read from a connection into an
//! [`HttpRequest`]: request line, headers, url-decoded query string and a body
//! bounded by `Content-Length`.

mod error;
mod method;
mod request;
mod version;

pub use error::Error;
pub use method::Method;
pub use request::{HttpRequest, parse_request};
pub(crate) use request::{declared_content_length, head_length};
pub use version::HttpVersion;
