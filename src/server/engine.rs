//! The engine: where routes, groups and middleware are registered.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use crate::router::RouteError;
use crate::server::context::Context;
use crate::server::dispatcher::Dispatcher;
use crate::server::group::{Registry, RouteGroup};
use crate::server::render::TemplateRenderer;
use crate::server::static_files::FileSystem;

/// Setup-phase owner of the routing state.
///
/// The engine owns the route table and the list of all groups, and has a root
/// group (empty prefix) to which `get`, `post`, `use_middleware`, `group` and
/// the static helpers are forwarded. It is not `Send`: routes are
/// registered from a single thread, then [`Engine::freeze`] turns everything
/// into a read-only [`Dispatcher`] that can be shared between connections.
///
/// # Examples
///
/// ```
/// use microhttp_web::{Engine, StatusCode};
///
/// let engine = Engine::new();
/// engine.get("/hello/:name", |c| {
///     let name = c.param("name").unwrap_or_default().to_string();
///     c.string(StatusCode::Ok, format!("hello {name}"));
/// })?;
///
/// let v1 = engine.group("/v1")?;
/// v1.get("/ping", |c| c.string(StatusCode::Ok, "pong"))?;
///
/// let dispatcher = engine.freeze();
/// assert_eq!(dispatcher.routes().len(), 2);
/// # Ok::<(), microhttp_web::RouteError>(())
/// ```
pub struct Engine {
    registry: Rc<RefCell<Registry>>,
    root: RouteGroup,
}

impl Engine {
    /// Create an engine with an empty route table.
    pub fn new() -> Self {
        let registry = Rc::new(RefCell::new(Registry::with_root()));
        let root = RouteGroup::root(&registry);
        Self { registry, root }
    }

    /// The root group.
    pub fn root(&self) -> &RouteGroup {
        &self.root
    }

    /// Create a top-level group with the given prefix.
    pub fn group(&self, prefix: &str) -> Result<RouteGroup, RouteError> {
        self.root.group(prefix)
    }

    /// Add a middleware that runs for every request.
    pub fn use_middleware<F>(&self, middleware: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.root.use_middleware(middleware)
    }

    /// Register a handler for `method`, one of the names in [`Method::ALL`](crate::parser::Method::ALL).
    pub fn handle<F>(&self, method: &str, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.root.handle(method, pattern, handler)
    }

    /// Register a `GET` handler.
    pub fn get<F>(&self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.root.get(pattern, handler)
    }

    /// Register a `POST` handler.
    pub fn post<F>(&self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.root.post(pattern, handler)
    }

    /// Serve the files below directory `root` at `relative_path`.
    pub fn static_files(&self, relative_path: &str, root: impl Into<PathBuf>) -> Result<(), RouteError> {
        self.root.static_files(relative_path, root)
    }

    /// Serve files from any [`FileSystem`] at `relative_path`.
    pub fn static_fs(&self, relative_path: &str, fs: Arc<dyn FileSystem>) -> Result<(), RouteError> {
        self.root.static_fs(relative_path, fs)
    }

    /// Install the renderer used by [`Context::html`].
    pub fn set_renderer<R>(&self, renderer: R)
    where
        R: TemplateRenderer + 'static,
    {
        self.registry.borrow_mut().renderer = Some(Arc::new(renderer));
    }

    /// End the setup phase.
    ///
    /// Moves the route table and groups into a [`Dispatcher`]. Group handles
    /// that outlive the engine can no longer register anything.
    pub fn freeze(self) -> Dispatcher {
        let Engine { registry, root } = self;
        drop(root);

        let registry = Rc::try_unwrap(registry)
            .map(RefCell::into_inner)
            .unwrap_or_else(|shared| shared.take());
        Dispatcher::new(registry)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
