//! Per-request dispatch over the frozen routing state.

use std::sync::Arc;
use log::debug;

use crate::parser::HttpRequest;
use crate::router::RouteTable;
use crate::server::context::Context;
use crate::server::group::Registry;
use crate::server::handler::{HandlerFn, handler_fn};
use crate::server::render::TemplateRenderer;
use crate::server::response::{HttpResponse, StatusCode};

/// Middleware contributed by one group.
struct Scope {
    prefix: String,
    middlewares: Vec<HandlerFn>,
}

/// The built-in handler for requests no route matched.
fn not_found(c: &mut Context) {
    let message = format!("404 NOT FOUND: {}", c.path());
    c.string(StatusCode::NotFound, message);
}

/// Read-only routing state produced by [`Engine::freeze`](crate::Engine::freeze).
///
/// A dispatcher is `Send + Sync` and is shared between connection tasks
/// without locking.
pub struct Dispatcher {
    table: RouteTable<HandlerFn>,
    /// Groups in creation order, so parents come before their children.
    scopes: Vec<Scope>,
    renderer: Option<Arc<dyn TemplateRenderer>>,
    not_found: HandlerFn,
}

impl Dispatcher {
    pub(crate) fn new(registry: Registry) -> Self {
        let scopes = registry
            .groups
            .into_iter()
            .map(|group| Scope {
                prefix: group.prefix,
                middlewares: group.middlewares,
            })
            .collect();

        Self {
            table: registry.table,
            scopes,
            renderer: registry.renderer,
            not_found: handler_fn(not_found),
        }
    }

    /// Run a request through its middleware and handler.
    ///
    /// Middleware of every group whose prefix starts the request path runs in
    /// group creation order, followed by the matched handler. When no route
    /// matches, a `404` handler takes the handler's place so the middleware
    /// still see the request.
    pub fn dispatch(&self, request: HttpRequest) -> HttpResponse {
        let method = request.method;
        let path = request.path.clone();

        let mut handlers: Vec<HandlerFn> = self
            .scopes
            .iter()
            .filter(|scope| path.starts_with(&scope.prefix))
            .flat_map(|scope| scope.middlewares.iter().cloned())
            .collect();

        let context = match self.table.resolve(method.as_str(), &path) {
            Some(matched) => {
                debug!("{method} {path} matched {}", matched.pattern);
                handlers.push(Arc::clone(matched.value));
                Context::new(request, handlers).with_route(matched.params, matched.pattern)
            }
            None => {
                debug!("{method} {path} matched no route");
                handlers.push(Arc::clone(&self.not_found));
                Context::new(request, handlers)
            }
        };

        let mut context = context.with_renderer(self.renderer.clone());
        context.next();
        context.into_response()
    }

    /// All registered `(method, pattern)` pairs, sorted.
    pub fn routes(&self) -> Vec<(&str, &str)> {
        self.table.routes()
    }
}
