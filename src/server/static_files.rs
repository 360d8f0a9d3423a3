//! Static file serving.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use log::debug;

use crate::server::context::Context;
use crate::server::response::StatusCode;

/// Name of the catch-all parameter bound by static routes.
pub(crate) const FILEPATH_PARAM: &str = "filepath";

/// Read access to servable files.
pub trait FileSystem: Send + Sync {
    /// Read the file at `path`, relative to the file system's root.
    ///
    /// Returns an error if the file does not exist or must not be served.
    fn open(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// A [`FileSystem`] rooted at a directory on disk.
///
/// Only regular files below the root are served; paths with `..`, root or
/// prefix components are refused.
#[derive(Debug, Clone)]
pub struct DirFileSystem {
    root: PathBuf,
}

impl DirFileSystem {
    /// Serve files below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileSystem for DirFileSystem {
    fn open(&self, path: &str) -> io::Result<Vec<u8>> {
        let relative = Path::new(path);
        if relative.components().any(|c| !matches!(c, Component::Normal(_) | Component::CurDir)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("refusing to serve {path}"),
            ));
        }

        let full_path = self.root.join(relative);
        if !full_path.is_file() {
            return Err(io::Error::new(io::ErrorKind::NotFound, format!("no such file: {path}")));
        }
        std::fs::read(full_path)
    }
}

/// Guess a content type from a file name's extension.
pub fn content_type_for(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "xml" => "text/xml; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "wasm" => "application/wasm",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Write file content as a `200 OK` response.
pub fn serve_content(c: &mut Context, name: &str, content: &[u8]) {
    c.set_header("Content-Type", content_type_for(name));
    c.data(StatusCode::Ok, content);
}

/// Build the handler installed by static routes.
///
/// Serves the file bound to the `filepath` parameter, or answers `404` when
/// the file system refuses it.
pub(crate) fn static_handler(fs: Arc<dyn FileSystem>) -> impl Fn(&mut Context) + Send + Sync + 'static {
    move |c: &mut Context| {
        let file = c.param(FILEPATH_PARAM).unwrap_or_default().to_string();
        match fs.open(&file) {
            Ok(content) => serve_content(c, &file, &content),
            Err(e) => {
                debug!("Static file {file} not served: {e}");
                c.status(StatusCode::NotFound);
            }
        }
    }
}

/// The pattern registered for static files below `relative_path`.
pub(crate) fn static_pattern(relative_path: &str) -> String {
    format!("{}/*{FILEPATH_PARAM}", relative_path.trim_end_matches('/'))
}
