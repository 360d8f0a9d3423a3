//! A minimal HTTP server framework.
//!
//! Routes are matched by a per-method segment trie supporting literal
//! segments, named parameters (`:name`) and catch-alls (`*name`). Routes can
//! be organised into nested groups sharing a path prefix, and every group can
//! carry middleware that wrap the handler onion-style.
//!
//! # Features
//!
//! - Trie routing with static segments taking priority over parameters
//! - Nested route groups with prefix-scoped middleware
//! - Middleware chains driven by [`Context::next`]
//! - Plain text, JSON, raw and template-rendered responses
//! - Static file serving
//! - An async HTTP/1.x server built on tokio
//!
//! # Examples
//!
//! ## Routing and middleware
//!
//! ```
//! use std::collections::HashMap;
//! use microhttp_web::{Engine, HttpVersion, HttpRequest, Method, StatusCode};
//!
//! let engine = Engine::new();
//!
//! let api = engine.group("/api")?;
//! api.use_middleware(|c| {
//!     if c.header("X-Token") == Some("secret") {
//!         c.next();
//!     } else {
//!         c.fail(StatusCode::Unauthorized, "missing token");
//!     }
//! })?;
//! api.get("/users/:id", |c| {
//!     let id = c.param("id").unwrap_or_default().to_string();
//!     c.json(StatusCode::Ok, &serde_json::json!({ "id": id }));
//! })?;
//!
//! let dispatcher = engine.freeze();
//!
//! let request = HttpRequest::new(Method::GET, "/api/users/7".to_string(), HttpVersion::Http11, HashMap::new());
//! let response = dispatcher.dispatch(request);
//! assert_eq!(response.status, StatusCode::Unauthorized);
//! # Ok::<(), microhttp_web::RouteError>(())
//! ```
//!
//! ## Error handling
//!
//! ```
//! use microhttp_web::{Engine, RouteError};
//!
//! let engine = Engine::new();
//! let result = engine.get("/static/*path/index.html", |_c| {});
//! assert!(matches!(result, Err(RouteError::CatchAllNotLast(_))));
//! ```
//!
//! ## Parsing requests
//!
//! ```
//! use microhttp_web::parse_request;
//!
//! let request = parse_request(b"GET /search?q=rust%20web HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();
//! assert_eq!(request.path, "/search");
//! assert_eq!(request.get_query_param("q").unwrap(), "rust web");
//! ```
//!
//! See the `demos` directory for complete servers.

// Export the parser module
pub mod parser;

// Export the router module
pub mod router;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, HttpRequest, HttpVersion, Method, parse_request};
pub use router::{Params, RouteError};
pub use server::{
    Context, Dispatcher, Engine, Error as ServerError, HandlerFn, HttpResponse, HttpServer, RouteGroup,
    ServerConfig, StatusCode, middleware,
};
