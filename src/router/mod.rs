//! Path routing for microhttp-web.
//!
//! This module provides the segment trie that matches request paths against
//! route patterns, and the method-keyed route table built on top of it.
//!
//! Patterns are `/`-separated segments. A segment is either literal text,
//! a named parameter (`:name`, matches exactly one segment) or a catch-all
//! (`*name`, matches the rest of the path and must be the last segment).

mod error;
mod table;
mod trie;
mod tests;

use std::collections::HashMap;

// Re-export public items
pub use error::RouteError;
pub use table::RouteTable;
pub use trie::{Match, PathTrie};

/// Path parameters bound while resolving a route, keyed by parameter name.
pub type Params = HashMap<String, String>;
