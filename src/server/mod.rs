//! HTTP server implementation for microhttp-web.
//!
//! This module provides the request-dispatch layer: the [`Engine`] where
//! routes, groups and middleware are registered, the [`Dispatcher`] that runs
//! each request through its chain, the per-request [`Context`], and the tokio
//! based [`HttpServer`] that feeds it connections.

mod response;
mod config;
mod error;
mod handler;
mod context;
mod group;
mod engine;
mod dispatcher;
mod render;
mod static_files;
mod http_server;

pub mod middleware;

// Re-export public items
pub use response::{HttpResponse, StatusCode};
pub use config::ServerConfig;
pub use error::Error;
pub use handler::HandlerFn;
pub use context::Context;
pub use group::RouteGroup;
pub use engine::Engine;
pub use dispatcher::Dispatcher;
pub use render::{RenderError, TemplateRenderer};
pub use static_files::{DirFileSystem, FileSystem, content_type_for, serve_content};
pub use http_server::HttpServer;
