//! Per-request context and the middleware chain.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use log::{error, warn};
use serde::Serialize;

use crate::parser::{HttpRequest, Method};
use crate::router::Params;
use crate::server::handler::HandlerFn;
use crate::server::render::{RenderError, TemplateRenderer};
use crate::server::response::{HttpResponse, StatusCode};

/// The state of a single request while its handler chain runs.
///
/// A context is created by the [`Dispatcher`](crate::Dispatcher) for every
/// request, driven through its chain with [`Context::next`], and turned into
/// the [`HttpResponse`] once the chain returns. It is never shared between
/// requests.
pub struct Context {
    request: HttpRequest,
    params: Params,
    pattern: Option<String>,
    form: OnceCell<HashMap<String, String>>,

    /// Last status passed to [`Context::status`].
    status_code: StatusCode,
    response: HttpResponse,
    /// Set once the status line and headers are fixed.
    committed: bool,

    handlers: Vec<HandlerFn>,
    /// Number of handlers started so far; only ever increases.
    index: usize,

    renderer: Option<Arc<dyn TemplateRenderer>>,
}

impl Context {
    pub(crate) fn new(request: HttpRequest, handlers: Vec<HandlerFn>) -> Self {
        Self {
            request,
            params: Params::new(),
            pattern: None,
            form: OnceCell::new(),
            status_code: StatusCode::Ok,
            response: HttpResponse::new(StatusCode::Ok),
            committed: false,
            handlers,
            index: 0,
            renderer: None,
        }
    }

    /// Attach the route that matched this request.
    pub(crate) fn with_route(mut self, params: Params, pattern: impl Into<String>) -> Self {
        self.params = params;
        self.pattern = Some(pattern.into());
        self
    }

    pub(crate) fn with_renderer(mut self, renderer: Option<Arc<dyn TemplateRenderer>>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Run the rest of the handler chain.
    ///
    /// Starts the next handler that has not run yet. The chain only advances
    /// past a handler through that handler's own call to `next`, so code a
    /// middleware runs before `next` executes outer-to-inner and code after it
    /// executes inner-to-outer. A handler that returns without calling `next`
    /// ends the chain there. Calling `next` on an exhausted chain does nothing.
    pub fn next(&mut self) {
        let Some(handler) = self.handlers.get(self.index).cloned() else {
            return;
        };
        self.index += 1;
        handler(self);
    }

    /// The request method.
    pub fn method(&self) -> Method {
        self.request.method
    }

    /// The request path, without the query string.
    pub fn path(&self) -> &str {
        &self.request.path
    }

    /// The matched route pattern, `None` if no route matched.
    pub fn full_path(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// The value bound to a `:name` or `*name` segment of the matched route.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// All path parameters of the matched route.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// A url-decoded query string parameter.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.request.get_query_param(key).map(String::as_str)
    }

    /// A field of a url-encoded form body, falling back to the query string.
    pub fn post_form(&self, key: &str) -> Option<&str> {
        self.form
            .get_or_init(|| self.request.form_params())
            .get(key)
            .or_else(|| self.request.get_query_param(key))
            .map(String::as_str)
    }

    /// A request header, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.get_header(name).map(String::as_str)
    }

    /// The underlying request.
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// The last status code set on this context.
    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    /// Whether the status line and headers have been committed.
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Set the response status and commit the headers.
    ///
    /// Only the first call reaches the response; later calls are recorded in
    /// [`Context::status_code`] but otherwise ignored and logged.
    pub fn status(&mut self, code: StatusCode) {
        self.status_code = code;
        if self.committed {
            warn!(
                "Superfluous status {} for {}: response already committed with {}",
                code.as_u16(),
                self.request.path,
                self.response.status.as_u16()
            );
            return;
        }
        self.response.status = code;
        self.committed = true;
    }

    /// Set a response header, replacing one of the same name in any case.
    /// Ignored once the headers are committed.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if self.committed {
            warn!("Header {key} set after the response was committed for {}", self.request.path);
            return;
        }
        self.response.set_header(key, value);
    }

    /// Append to the response body, committing a `200 OK` if nothing was committed yet.
    fn write(&mut self, bytes: &[u8]) {
        if !self.committed {
            self.status(StatusCode::Ok);
        }
        self.response.body.extend_from_slice(bytes);
    }

    /// Write a plain-text body.
    ///
    /// Accepts anything printable, including `format_args!`.
    pub fn string(&mut self, code: StatusCode, body: impl fmt::Display) {
        self.set_header("Content-Type", "text/plain");
        self.status(code);
        self.write(body.to_string().as_bytes());
    }

    /// Write a JSON body.
    ///
    /// If `value` cannot be serialized the response becomes a `500` carrying
    /// the error text; the chain keeps running.
    pub fn json<T: Serialize + ?Sized>(&mut self, code: StatusCode, value: &T) {
        match serde_json::to_vec(value) {
            Ok(body) => {
                self.set_header("Content-Type", "application/json");
                self.status(code);
                self.write(&body);
            }
            Err(e) => {
                error!("Failed to serialize JSON response for {}: {e}", self.request.path);
                self.fail(StatusCode::InternalServerError, e);
            }
        }
    }

    /// Write a raw body.
    pub fn data(&mut self, code: StatusCode, data: impl AsRef<[u8]>) {
        self.status(code);
        self.write(data.as_ref());
    }

    /// Render template `name` with `data` and write it as HTML.
    ///
    /// Rendering failures, including a missing renderer, produce a `500`.
    pub fn html<T: Serialize + ?Sized>(&mut self, code: StatusCode, name: &str, data: &T) {
        let rendered = match &self.renderer {
            Some(renderer) => serde_json::to_value(data)
                .map_err(RenderError::from)
                .and_then(|value| renderer.render(name, &value)),
            None => Err(RenderError::from("no template renderer configured")),
        };

        match rendered {
            Ok(body) => {
                self.set_header("Content-Type", "text/html");
                self.status(code);
                self.write(body.as_bytes());
            }
            Err(e) => {
                error!("Failed to render template {name} for {}: {e}", self.request.path);
                self.fail(StatusCode::InternalServerError, e);
            }
        }
    }

    /// Write a plain-text error body with the given status.
    pub fn fail(&mut self, code: StatusCode, message: impl fmt::Display) {
        self.string(code, message);
    }

    /// Consume the context, yielding the response written so far.
    pub(crate) fn into_response(self) -> HttpResponse {
        self.response
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("method", &self.request.method)
            .field("path", &self.request.path)
            .field("params", &self.params)
            .field("status_code", &self.status_code)
            .field("handlers", &self.handlers.len())
            .field("index", &self.index)
            .finish()
    }
}
