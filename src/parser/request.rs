//! HTTP request parsing and representation.

use std::collections::HashMap;
use std::str::FromStr;
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::version::HttpVersion;

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A parsed request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// The request target exactly as it appeared on the request line.
    pub target: String,
    /// The percent-decoded request path, without the query string.
    pub path: String,
    /// The raw query string (the part after `?`), empty if there is none.
    pub query: String,
    pub version: HttpVersion,
    /// Headers as sent; use [`HttpRequest::get_header`] for case-insensitive lookup.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    /// Query parameters, url-decoded. A repeated key keeps its last value.
    pub query_params: HashMap<String, String>,
}

/// Decode an `application/x-www-form-urlencoded` string into a map.
///
/// Later occurrences of a key overwrite earlier ones.
fn decode_pairs(input: &str) -> HashMap<String, String> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(input)
        .map(|pairs| pairs.into_iter().collect())
        .unwrap_or_default()
}

impl HttpRequest {
    /// Create a request without a body.
    ///
    /// `target` is the path optionally followed by `?` and a query string;
    /// the query is split off and decoded. The path is percent-decoded, with
    /// bytes that do not form UTF-8 replaced; [`parse_request`] rejects such
    /// targets before they get here.
    pub fn new(method: Method, target: String, version: HttpVersion, headers: HashMap<String, String>) -> Self {
        let (raw_path, query) = target.split_once('?').unwrap_or((target.as_str(), ""));
        let path = percent_decode_str(raw_path).decode_utf8_lossy().into_owned();
        let query = query.to_string();
        let query_params = decode_pairs(&query);

        Self {
            method,
            target,
            path,
            query,
            version,
            headers,
            body: Vec::new(),
            query_params,
        }
    }

    /// Create a request carrying `body`.
    pub fn with_body(method: Method, target: String, version: HttpVersion, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        let mut request = Self::new(method, target, version, headers);
        request.body = body;
        request
    }

    /// The request target as it appeared on the request line, still encoded.
    pub fn uri(&self) -> &str {
        &self.target
    }

    /// A header value, looked up case-insensitively.
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers
            .iter()
            .find_map(|(k, v)| k.eq_ignore_ascii_case(name).then_some(v))
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }

    /// Deserialize the body as JSON.
    ///
    /// Fails with [`Error::MissingHeader`] unless the request declares a JSON
    /// content type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        if !self.is_json() {
            return Err(Error::MissingHeader("Content-Type: application/json".to_string()));
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    fn has_content_type(&self, expected: &str) -> bool {
        self.get_header("Content-Type")
            .is_some_and(|content_type| content_type.starts_with(expected))
    }

    pub fn is_json(&self) -> bool {
        self.has_content_type(JSON_CONTENT_TYPE)
    }

    pub fn is_form(&self) -> bool {
        self.has_content_type(FORM_CONTENT_TYPE)
    }

    /// Decode the body as a url-encoded form.
    ///
    /// Returns an empty map when the request does not carry a form body or the
    /// body is not valid UTF-8.
    pub fn form_params(&self) -> HashMap<String, String> {
        if !self.is_form() {
            return HashMap::new();
        }
        std::str::from_utf8(&self.body)
            .map(decode_pairs)
            .unwrap_or_default()
    }

    /// A decoded query parameter.
    pub fn get_query_param(&self, name: &str) -> Option<&String> {
        self.query_params.get(name)
    }

    pub fn has_query_param(&self, name: &str) -> bool {
        self.query_params.contains_key(name)
    }
}

/// Locate the blank line ending the head.
///
/// Returns the length of the head and of its terminator; a bare `\n\n` is
/// accepted as well as `\r\n\r\n`, whichever comes first.
fn find_head_end(input: &[u8]) -> Option<(usize, usize)> {
    let crlf = input.windows(4).position(|w| w == b"\r\n\r\n").map(|pos| (pos, 4));
    let lf = input.windows(2).position(|w| w == b"\n\n").map(|pos| (pos, 2));
    match (crlf, lf) {
        (Some(a), Some(b)) => Some(if b.0 < a.0 { b } else { a }),
        (a, b) => a.or(b),
    }
}

/// Number of bytes up to and including the blank line after the headers,
/// `None` while the head is still incomplete.
pub(crate) fn head_length(input: &[u8]) -> Option<usize> {
    find_head_end(input).map(|(pos, terminator)| pos + terminator)
}

/// The `Content-Length` declared in a request head, 0 when it is absent or
/// unreadable. [`parse_request`] reports an invalid value.
pub(crate) fn declared_content_length(head: &[u8]) -> usize {
    String::from_utf8_lossy(head)
        .lines()
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("Content-Length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

/// Split raw request bytes into the head (request line and headers) and the body.
fn split_head(input: &[u8]) -> (&[u8], &[u8]) {
    match find_head_end(input) {
        Some((pos, terminator)) => (&input[..pos], &input[pos + terminator..]),
        None => (input, &[]),
    }
}

/// Parse one HTTP/1.x request from the bytes read off a connection.
///
/// The request line must hold a known method, an origin-form target whose
/// path decodes to UTF-8 and a supported version. HTTP/1.1 and later require a `Host` header. The body is
/// everything after the blank line, cut to `Content-Length` when that is
/// shorter.
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    let (head, body) = split_head(input);

    // The head must be text; the body is kept as raw bytes
    let Ok(head) = std::str::from_utf8(head) else {
        return Err(Error::MalformedRequestLine("Invalid UTF-8".to_string()));
    };
    let mut lines = head.lines();

    let request_line = lines.next().filter(|line| !line.is_empty()).ok_or(Error::EmptyRequest)?;
    let parts: Vec<&str> = request_line.split_whitespace().collect();
    let [method, target, version] = parts[..] else {
        return Err(Error::MalformedRequestLine(request_line.to_string()));
    };

    let method = Method::from_str(method)?;
    if !target.starts_with('/') {
        return Err(Error::InvalidPath);
    }
    let raw_path = target.split_once('?').map_or(target, |(path, _)| path);
    if percent_decode_str(raw_path).decode_utf8().is_err() {
        return Err(Error::InvalidPathEncoding(raw_path.to_string()));
    }
    let version = HttpVersion::from_str(version)?;

    let headers = lines
        .map(|line| {
            let (name, value) = line.split_once(':').ok_or(Error::InvalidHeaderFormat)?;
            Ok((name.trim().to_string(), value.trim().to_string()))
        })
        .collect::<Result<HashMap<_, _>, Error>>()?;
    let header = |name: &str| headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v);

    if version.requires_host() && header("Host").is_none() {
        return Err(Error::MissingHeader("Host".to_string()));
    }

    let content_length = header("Content-Length")
        .map(|v| v.parse::<usize>().map_err(|_| Error::InvalidContentLength(v.clone())))
        .transpose()?;
    let body = match content_length {
        Some(len) if len < body.len() => &body[..len],
        _ => body,
    };

    Ok(HttpRequest::with_body(method, target.to_string(), version, headers, body.to_vec()))
}
