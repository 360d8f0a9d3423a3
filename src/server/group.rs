//! Route groups: path-prefix scopes with their own middleware.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::{Rc, Weak};
use std::str::FromStr;
use std::sync::Arc;
use log::info;

use crate::parser::Method;
use crate::router::{RouteError, RouteTable};
use crate::server::context::Context;
use crate::server::handler::{HandlerFn, handler_fn};
use crate::server::render::TemplateRenderer;
use crate::server::static_files::{DirFileSystem, FileSystem, static_handler, static_pattern};

/// A group as stored in the engine's flat group list.
pub(crate) struct GroupEntry {
    pub(crate) prefix: String,
    /// Index of the parent group in the flat list, `None` for the root.
    pub(crate) parent: Option<usize>,
    pub(crate) middlewares: Vec<HandlerFn>,
}

/// Everything built during setup: the route table and every group, in
/// creation order.
#[derive(Default)]
pub(crate) struct Registry {
    pub(crate) table: RouteTable<HandlerFn>,
    pub(crate) groups: Vec<GroupEntry>,
    pub(crate) renderer: Option<Arc<dyn TemplateRenderer>>,
}

impl Registry {
    /// Create a registry holding only the root group.
    pub(crate) fn with_root() -> Self {
        Self {
            groups: vec![GroupEntry {
                prefix: String::new(),
                parent: None,
                middlewares: Vec::new(),
            }],
            ..Self::default()
        }
    }
}

/// A path-prefix scope for routes and middleware.
///
/// Groups do not own routes. Registering through a group prepends the
/// group's prefix and forwards to the engine's route table; middleware added
/// with [`RouteGroup::use_middleware`] runs for every request whose path
/// starts with the prefix.
///
/// A group only refers to its engine weakly. Once the engine is frozen every
/// registration through a group fails with [`RouteError::EngineFrozen`].
#[derive(Debug, Clone)]
pub struct RouteGroup {
    id: usize,
    prefix: String,
    registry: Weak<RefCell<Registry>>,
}

impl RouteGroup {
    /// The root group of a registry.
    pub(crate) fn root(registry: &Rc<RefCell<Registry>>) -> Self {
        Self {
            id: 0,
            prefix: String::new(),
            registry: Rc::downgrade(registry),
        }
    }

    fn with_registry<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> Result<R, RouteError> {
        let registry = self.registry.upgrade().ok_or(RouteError::EngineFrozen)?;
        let mut registry = registry.borrow_mut();
        Ok(f(&mut registry))
    }

    /// The full prefix of this group.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The group this one was created from, `None` for the root group.
    pub fn parent(&self) -> Option<RouteGroup> {
        let registry = self.registry.upgrade()?;
        let registry = registry.borrow();
        let parent = registry.groups.get(self.id)?.parent?;
        let prefix = registry.groups.get(parent)?.prefix.clone();

        Some(RouteGroup {
            id: parent,
            prefix,
            registry: self.registry.clone(),
        })
    }

    /// Create a nested group whose prefix is this group's prefix followed by `suffix`.
    pub fn group(&self, suffix: &str) -> Result<RouteGroup, RouteError> {
        let prefix = format!("{}{suffix}", self.prefix);
        let id = self.with_registry(|registry| {
            registry.groups.push(GroupEntry {
                prefix: prefix.clone(),
                parent: Some(self.id),
                middlewares: Vec::new(),
            });
            registry.groups.len() - 1
        })?;

        Ok(RouteGroup {
            id,
            prefix,
            registry: self.registry.clone(),
        })
    }

    /// Append a middleware to this group.
    ///
    /// Affects requests dispatched after the engine is frozen; middleware run
    /// in the order they were added.
    pub fn use_middleware<F>(&self, middleware: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        let middleware = handler_fn(middleware);
        self.with_registry(|registry| {
            if let Some(group) = registry.groups.get_mut(self.id) {
                group.middlewares.push(middleware);
            }
        })
    }

    /// Register a handler for `method` at this group's prefix followed by `pattern`.
    ///
    /// `method` must name a [`Method`]; anything else fails with
    /// [`RouteError::UnknownMethod`].
    pub fn handle<F>(&self, method: &str, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(method, pattern, handler_fn(handler))
    }

    fn add_route(&self, method: &str, pattern: &str, handler: HandlerFn) -> Result<(), RouteError> {
        let method = Method::from_str(method)
            .map_err(|_| RouteError::UnknownMethod(method.to_string()))?;
        let pattern = format!("{}{pattern}", self.prefix);
        self.with_registry(|registry| registry.table.register(method.as_str(), &pattern, handler))??;
        info!("Route {:>4} - {pattern}", method.as_str());
        Ok(())
    }

    /// Register a `GET` handler.
    pub fn get<F>(&self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.handle("GET", pattern, handler)
    }

    /// Register a `POST` handler.
    pub fn post<F>(&self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.handle("POST", pattern, handler)
    }

    /// Serve the files below directory `root` at `relative_path`.
    ///
    /// `group.static_files("/assets", "./static")` answers
    /// `GET <prefix>/assets/js/app.js` with `./static/js/app.js`.
    pub fn static_files(&self, relative_path: &str, root: impl Into<PathBuf>) -> Result<(), RouteError> {
        self.static_fs(relative_path, Arc::new(DirFileSystem::new(root)))
    }

    /// Serve files from any [`FileSystem`] at `relative_path`.
    pub fn static_fs(&self, relative_path: &str, fs: Arc<dyn FileSystem>) -> Result<(), RouteError> {
        let pattern = static_pattern(relative_path);
        self.add_route("GET", &pattern, handler_fn(static_handler(fs)))
    }
}
