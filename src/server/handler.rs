//! Request handlers and middleware.

use std::sync::Arc;

use crate::server::context::Context;

/// A request handler or middleware.
///
/// Both share the same shape: they receive the request [`Context`] and write
/// to it. A middleware hands control to the rest of the chain by calling
/// [`Context::next`]; a final handler simply returns.
pub type HandlerFn = Arc<dyn Fn(&mut Context) + Send + Sync>;

/// Box a closure into a [`HandlerFn`].
pub(crate) fn handler_fn<F>(handler: F) -> HandlerFn
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    Arc::new(handler)
}
