//! Template rendering hook for HTML responses.

use serde_json::Value;

/// Error returned by a [`TemplateRenderer`].
pub type RenderError = Box<dyn std::error::Error + Send + Sync>;

/// Renders a named template with serialized data.
///
/// The framework does not ship a template engine; install one with
/// [`Engine::set_renderer`](crate::Engine::set_renderer) and call
/// [`Context::html`](crate::Context::html) from handlers.
pub trait TemplateRenderer: Send + Sync {
    /// Render template `name` with `data`.
    fn render(&self, name: &str, data: &Value) -> Result<String, RenderError>;
}

impl<F> TemplateRenderer for F
where
    F: Fn(&str, &Value) -> Result<String, RenderError> + Send + Sync,
{
    fn render(&self, name: &str, data: &Value) -> Result<String, RenderError> {
        self(name, data)
    }
}
