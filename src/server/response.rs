//! Responses and their wire encoding.

use std::collections::HashMap;
use std::io::Write;
use serde::Serialize;

use crate::server::error::Error;

/// Value of the `Server` header sent with every response.
const SERVER_NAME: &str = "microhttp-web";

/// Status codes the framework and its handlers produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 200,
    Created = 201,
    Accepted = 202,
    NoContent = 204,
    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    MethodNotAllowed = 405,
    PayloadTooLarge = 413,
    InternalServerError = 500,
    NotImplemented = 501,
    BadGateway = 502,
    ServiceUnavailable = 503,
}

impl StatusCode {
    /// The numeric status code.
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// The reason phrase written on the status line.
    pub fn reason_phrase(&self) -> &'static str {
        use StatusCode::*;

        match self {
            Ok => "OK",
            Created => "Created",
            Accepted => "Accepted",
            NoContent => "No Content",
            BadRequest => "Bad Request",
            Unauthorized => "Unauthorized",
            Forbidden => "Forbidden",
            NotFound => "Not Found",
            MethodNotAllowed => "Method Not Allowed",
            PayloadTooLarge => "Payload Too Large",
            InternalServerError => "Internal Server Error",
            NotImplemented => "Not Implemented",
            BadGateway => "Bad Gateway",
            ServiceUnavailable => "Service Unavailable",
        }
    }
}

/// A response ready to be written to a connection.
///
/// Handlers normally build responses through [`Context`](crate::Context);
/// the builder methods here are for responses the server writes itself.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    /// Header names keep the case they were set with.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// An empty response carrying only the `Server` header.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::from([("Server".to_string(), SERVER_NAME.to_string())]),
            body: Vec::new(),
        }
    }

    pub fn with_body_string(self, body: impl Into<String>) -> Self {
        self.with_body_bytes(body.into().into_bytes())
    }

    /// Set the body. `Content-Length` is computed when the response is written.
    pub fn with_body_bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set a header, replacing any existing one whose name differs only in case.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
    }

    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        self.with_header("Content-Type", content_type)
    }

    /// Serialize `value` as the JSON body.
    pub fn with_json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, Error> {
        let body = serde_json::to_vec(value)?;
        Ok(self
            .with_content_type("application/json")
            .with_body_bytes(body))
    }

    /// Get a header value, ignoring the case of the name.
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers
            .iter()
            .find_map(|(k, v)| k.eq_ignore_ascii_case(name).then_some(v))
    }

    /// Encode the response as HTTP/1.1.
    ///
    /// Any stored `Content-Length` is replaced by the actual body length.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(128 + self.body.len());

        // Writing into a Vec cannot fail
        let _ = write!(bytes, "HTTP/1.1 {} {}\r\n", self.status.as_u16(), self.status.reason_phrase());
        for (name, value) in &self.headers {
            if !name.eq_ignore_ascii_case("Content-Length") {
                let _ = write!(bytes, "{name}: {value}\r\n");
            }
        }
        let _ = write!(bytes, "Content-Length: {}\r\n\r\n", self.body.len());

        bytes.extend_from_slice(&self.body);
        bytes
    }
}
