//! Segment trie for route patterns.

use std::collections::HashSet;

use crate::router::Params;
use crate::router::error::RouteError;

/// The kind of a single pattern segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentKind {
    /// Literal text.
    Static,
    /// `:name`, binds exactly one path segment.
    Named,
    /// `*name`, binds the remainder of the path.
    CatchAll,
}

impl SegmentKind {
    fn of(segment: &str) -> Self {
        if segment.starts_with(':') {
            SegmentKind::Named
        } else if segment.starts_with('*') {
            SegmentKind::CatchAll
        } else {
            SegmentKind::Static
        }
    }
}

/// Split a pattern or a request path into its segments.
///
/// Empty segments produced by repeated slashes are dropped. A trailing slash
/// is kept as a final empty segment, so `/foo` and `/foo/` stay distinct.
pub(crate) fn split_segments(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if path.len() > 1 && path.ends_with('/') {
        segments.push("");
    }
    segments
}

/// Split a pattern and check it is well formed.
fn parse_pattern(pattern: &str) -> Result<Vec<&str>, RouteError> {
    let segments = split_segments(pattern);
    let mut names = HashSet::new();

    for (i, segment) in segments.iter().enumerate() {
        let kind = SegmentKind::of(segment);
        if kind == SegmentKind::Static {
            continue;
        }

        let name = &segment[1..];
        if name.is_empty() {
            return Err(RouteError::EmptyParamName(pattern.to_string()));
        }
        if kind == SegmentKind::CatchAll && i + 1 != segments.len() {
            return Err(RouteError::CatchAllNotLast(pattern.to_string()));
        }
        if !names.insert(name) {
            return Err(RouteError::DuplicateParamName {
                pattern: pattern.to_string(),
                name: name.to_string(),
            });
        }
    }

    Ok(segments)
}

/// A registered route stored on a terminal node.
#[derive(Debug)]
struct Route<T> {
    /// The full pattern as it was registered.
    pattern: String,
    value: T,
}

impl<T> Route<T> {
    /// Bind the pattern's parameters against the matched path segments.
    fn bind(&self, segments: &[&str]) -> Params {
        let mut params = Params::new();
        for (i, part) in split_segments(&self.pattern).into_iter().enumerate() {
            match SegmentKind::of(part) {
                SegmentKind::Static => {}
                SegmentKind::Named => {
                    if let Some(value) = segments.get(i) {
                        params.insert(part[1..].to_string(), (*value).to_string());
                    }
                }
                SegmentKind::CatchAll => {
                    let rest = segments.get(i..).unwrap_or_default();
                    params.insert(part[1..].to_string(), rest.join("/"));
                    break;
                }
            }
        }
        params
    }
}

#[derive(Debug)]
struct Node<T> {
    /// The segment text of this node, empty for the root.
    part: String,
    is_wild: bool,
    children: Vec<Node<T>>,
    route: Option<Route<T>>,
}

impl<T> Node<T> {
    fn new(part: &str) -> Self {
        Self {
            part: part.to_string(),
            is_wild: SegmentKind::of(part) != SegmentKind::Static,
            children: Vec::new(),
            route: None,
        }
    }

    fn kind(&self) -> SegmentKind {
        SegmentKind::of(&self.part)
    }

    /// Whether a pattern segment being inserted can reuse this node.
    ///
    /// Wild segments of the same kind share a node whatever their names are;
    /// bindings are recovered from the terminal's pattern.
    fn accepts(&self, segment: &str, kind: SegmentKind) -> bool {
        match kind {
            SegmentKind::Static => !self.is_wild && self.part == segment,
            _ => self.kind() == kind,
        }
    }

    /// Whether this node can consume the given path segment.
    fn matches(&self, segment: &str) -> bool {
        match self.kind() {
            SegmentKind::Static => self.part == segment,
            SegmentKind::Named => !segment.is_empty(),
            SegmentKind::CatchAll => true,
        }
    }

    /// Depth-first search for the route matching `segments[depth..]`.
    ///
    /// Static children are tried before wild ones; wild children are tried in
    /// insertion order.
    fn search(&self, segments: &[&str], depth: usize) -> Option<&Route<T>> {
        if self.kind() == SegmentKind::CatchAll || depth == segments.len() {
            return self.route.as_ref();
        }

        let segment = segments[depth];
        let statics = self.children.iter().filter(|child| !child.is_wild);
        let wilds = self.children.iter().filter(|child| child.is_wild);

        statics
            .chain(wilds)
            .filter(|child| child.matches(segment))
            .find_map(|child| child.search(segments, depth + 1))
    }

    fn collect_patterns<'t>(&'t self, patterns: &mut Vec<&'t str>) {
        if let Some(route) = &self.route {
            patterns.push(&route.pattern);
        }
        for child in &self.children {
            child.collect_patterns(patterns);
        }
    }
}

/// The result of a successful [`PathTrie::resolve`].
#[derive(Debug)]
pub struct Match<'t, T> {
    /// The value registered for the matched pattern.
    pub value: &'t T,
    /// The pattern that matched, as it was registered.
    pub pattern: &'t str,
    /// Parameters bound by the pattern's dynamic segments.
    pub params: Params,
}

/// A prefix tree over `/`-delimited path segments.
#[derive(Debug)]
pub struct PathTrie<T> {
    root: Node<T>,
}

impl<T> PathTrie<T> {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self { root: Node::new("") }
    }

    /// Insert a pattern with its value.
    ///
    /// Inserting the same pattern again replaces the value. A different
    /// pattern that ends on the same node (such as `/user/:name` after
    /// `/user/:id`) is rejected and the first one is kept.
    pub fn insert(&mut self, pattern: &str, value: T) -> Result<(), RouteError> {
        let segments = parse_pattern(pattern)?;

        let mut node = &mut self.root;
        for segment in &segments {
            let kind = SegmentKind::of(segment);
            let index = match node.children.iter().position(|child| child.accepts(segment, kind)) {
                Some(index) => index,
                None => {
                    node.children.push(Node::new(segment));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[index];
        }

        match &mut node.route {
            Some(route) if split_segments(&route.pattern) == segments => {
                route.value = value;
                Ok(())
            }
            Some(route) => Err(RouteError::Conflict {
                pattern: pattern.to_string(),
                existing: route.pattern.clone(),
            }),
            None => {
                node.route = Some(Route {
                    pattern: pattern.to_string(),
                    value,
                });
                Ok(())
            }
        }
    }

    /// Resolve a concrete path to the best matching pattern.
    ///
    /// Returns `None` when no registered pattern matches.
    pub fn resolve(&self, path: &str) -> Option<Match<'_, T>> {
        let segments = split_segments(path);
        let route = self.root.search(&segments, 0)?;

        Some(Match {
            value: &route.value,
            pattern: &route.pattern,
            params: route.bind(&segments),
        })
    }

    /// All registered patterns, in depth-first order.
    pub fn patterns(&self) -> Vec<&str> {
        let mut patterns = Vec::new();
        self.root.collect_patterns(&mut patterns);
        patterns
    }
}

impl<T> Default for PathTrie<T> {
    fn default() -> Self {
        Self::new()
    }
}
