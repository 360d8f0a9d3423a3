//! Method-keyed route table.

use std::collections::HashMap;

use crate::router::error::RouteError;
use crate::router::trie::{Match, PathTrie};

/// Owns one [`PathTrie`] per HTTP method.
///
/// Methods are compared as exact, case-sensitive strings and a trie is created
/// the first time a method is registered.
#[derive(Debug)]
pub struct RouteTable<T> {
    tries: HashMap<String, PathTrie<T>>,
}

impl<T> RouteTable<T> {
    /// Create an empty route table.
    pub fn new() -> Self {
        Self { tries: HashMap::new() }
    }

    /// Register a value for a method and pattern.
    ///
    /// Registering the same method and pattern twice keeps only the last value.
    pub fn register(&mut self, method: &str, pattern: &str, value: T) -> Result<(), RouteError> {
        self.tries
            .entry(method.to_string())
            .or_default()
            .insert(pattern, value)
    }

    /// Resolve a method and path.
    ///
    /// Returns `None` if the method was never registered or no pattern matches.
    pub fn resolve(&self, method: &str, path: &str) -> Option<Match<'_, T>> {
        self.tries.get(method)?.resolve(path)
    }

    /// All registered `(method, pattern)` pairs, sorted.
    pub fn routes(&self) -> Vec<(&str, &str)> {
        let mut routes: Vec<(&str, &str)> = self
            .tries
            .iter()
            .flat_map(|(method, trie)| {
                trie.patterns()
                    .into_iter()
                    .map(move |pattern| (method.as_str(), pattern))
            })
            .collect();
        routes.sort_unstable();
        routes
    }
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
