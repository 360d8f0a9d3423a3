//! Tests for the route trie and route table.

#[cfg(test)]
mod router_tests {
    use crate::router::{PathTrie, RouteError, RouteTable};

    fn trie_with(patterns: &[&'static str]) -> PathTrie<&'static str> {
        let mut trie = PathTrie::new();
        for pattern in patterns {
            trie.insert(pattern, *pattern).unwrap();
        }
        trie
    }

    #[test]
    fn test_static_routes() {
        let trie = trie_with(&["/", "/hello", "/hello/world"]);

        assert_eq!(*trie.resolve("/").unwrap().value, "/");
        assert_eq!(*trie.resolve("/hello").unwrap().value, "/hello");
        assert_eq!(*trie.resolve("/hello/world").unwrap().value, "/hello/world");
        assert!(trie.resolve("/hello/there").is_none());
        assert!(trie.resolve("/goodbye").is_none());
    }

    #[test]
    fn test_named_params() {
        let trie = trie_with(&["/hello/:name", "/user/:id/posts/:post"]);

        let matched = trie.resolve("/hello/geektutu").unwrap();
        assert_eq!(matched.pattern, "/hello/:name");
        assert_eq!(matched.params.get("name").unwrap(), "geektutu");

        let matched = trie.resolve("/user/42/posts/7").unwrap();
        assert_eq!(matched.pattern, "/user/:id/posts/:post");
        assert_eq!(matched.params.len(), 2);
        assert_eq!(matched.params.get("id").unwrap(), "42");
        assert_eq!(matched.params.get("post").unwrap(), "7");

        // A named segment binds exactly one segment
        assert!(trie.resolve("/hello/a/b").is_none());
        assert!(trie.resolve("/hello").is_none());
    }

    #[test]
    fn test_static_beats_named_sibling() {
        let trie = trie_with(&["/user/:id", "/user/new"]);

        let matched = trie.resolve("/user/new").unwrap();
        assert_eq!(matched.pattern, "/user/new");
        assert!(matched.params.is_empty());

        let matched = trie.resolve("/user/7").unwrap();
        assert_eq!(matched.pattern, "/user/:id");
        assert_eq!(matched.params.get("id").unwrap(), "7");
    }

    #[test]
    fn test_backtracks_from_static_to_wild() {
        let trie = trie_with(&["/a/b/c", "/a/:x/d"]);

        // The static branch `b` cannot finish `d`, so the named branch is used
        let matched = trie.resolve("/a/b/d").unwrap();
        assert_eq!(matched.pattern, "/a/:x/d");
        assert_eq!(matched.params.get("x").unwrap(), "b");

        assert_eq!(trie.resolve("/a/b/c").unwrap().pattern, "/a/b/c");
    }

    #[test]
    fn test_catch_all() {
        let trie = trie_with(&["/assets/*filepath"]);

        let matched = trie.resolve("/assets/css/a.css").unwrap();
        assert_eq!(matched.pattern, "/assets/*filepath");
        assert_eq!(matched.params.get("filepath").unwrap(), "css/a.css");

        let matched = trie.resolve("/assets/a.js").unwrap();
        assert_eq!(matched.params.get("filepath").unwrap(), "a.js");
    }

    #[test]
    fn test_catch_all_needs_a_segment_slot() {
        let trie = trie_with(&["/assets/*filepath"]);

        // No slot after the parent: not a match
        assert!(trie.resolve("/assets").is_none());

        // A trailing slash provides an empty slot
        let matched = trie.resolve("/assets/").unwrap();
        assert_eq!(matched.params.get("filepath").unwrap(), "");

        let matched = trie.resolve("/assets/css/").unwrap();
        assert_eq!(matched.params.get("filepath").unwrap(), "css/");
    }

    #[test]
    fn test_named_then_catch_all_in_insertion_order() {
        let trie = trie_with(&["/files/:name", "/files/*rest"]);

        assert_eq!(trie.resolve("/files/a").unwrap().pattern, "/files/:name");
        // The named branch cannot consume two segments, the catch-all can
        let matched = trie.resolve("/files/a/b").unwrap();
        assert_eq!(matched.pattern, "/files/*rest");
        assert_eq!(matched.params.get("rest").unwrap(), "a/b");
    }

    #[test]
    fn test_root_without_registration() {
        let trie = trie_with(&["/hello"]);
        assert!(trie.resolve("/").is_none());
        assert!(trie.resolve("").is_none());
    }

    #[test]
    fn test_trailing_slash_is_significant() {
        let trie = trie_with(&["/foo"]);
        assert!(trie.resolve("/foo").is_some());
        assert!(trie.resolve("/foo/").is_none());

        let trie = trie_with(&["/foo", "/foo/"]);
        assert_eq!(trie.resolve("/foo").unwrap().pattern, "/foo");
        assert_eq!(trie.resolve("/foo/").unwrap().pattern, "/foo/");
    }

    #[test]
    fn test_named_segment_does_not_bind_empty() {
        let trie = trie_with(&["/user/:id"]);
        assert!(trie.resolve("/user/").is_none());
    }

    #[test]
    fn test_repeated_slashes_are_dropped() {
        let trie = trie_with(&["/a/b"]);
        assert_eq!(trie.resolve("//a///b").unwrap().pattern, "/a/b");
    }

    #[test]
    fn test_reinsert_replaces_value() {
        let mut trie = PathTrie::new();
        trie.insert("/user/:id", 1).unwrap();
        trie.insert("/user/:id", 2).unwrap();

        assert_eq!(*trie.resolve("/user/9").unwrap().value, 2);
        assert_eq!(trie.patterns(), vec!["/user/:id"]);
    }

    #[test]
    fn test_conflicting_names_keep_first() {
        let mut trie = PathTrie::new();
        trie.insert("/user/:id", 1).unwrap();

        let result = trie.insert("/user/:name", 2);
        assert_eq!(
            result,
            Err(RouteError::Conflict {
                pattern: "/user/:name".to_string(),
                existing: "/user/:id".to_string(),
            })
        );

        let matched = trie.resolve("/user/9").unwrap();
        assert_eq!(*matched.value, 1);
        assert_eq!(matched.params.get("id").unwrap(), "9");
    }

    #[test]
    fn test_shared_wild_node_keeps_own_names() {
        let trie = trie_with(&["/p/:id/edit", "/p/:slug/view"]);

        let matched = trie.resolve("/p/7/edit").unwrap();
        assert_eq!(matched.params.get("id").unwrap(), "7");
        assert!(matched.params.get("slug").is_none());

        let matched = trie.resolve("/p/intro/view").unwrap();
        assert_eq!(matched.params.get("slug").unwrap(), "intro");
        assert!(matched.params.get("id").is_none());
    }

    #[test]
    fn test_malformed_patterns() {
        let mut trie = PathTrie::new();

        assert_eq!(
            trie.insert("/static/*path/more", ()),
            Err(RouteError::CatchAllNotLast("/static/*path/more".to_string()))
        );
        assert_eq!(
            trie.insert("/a/*x/*y", ()),
            Err(RouteError::CatchAllNotLast("/a/*x/*y".to_string()))
        );
        assert_eq!(
            trie.insert("/user/:", ()),
            Err(RouteError::EmptyParamName("/user/:".to_string()))
        );
        assert_eq!(
            trie.insert("/a/:id/b/:id", ()),
            Err(RouteError::DuplicateParamName {
                pattern: "/a/:id/b/:id".to_string(),
                name: "id".to_string(),
            })
        );
        assert!(trie.patterns().is_empty());
    }

    #[test]
    fn test_route_table_by_method() {
        let mut table = RouteTable::new();
        table.register("GET", "/items/:id", "get").unwrap();
        table.register("POST", "/items", "post").unwrap();

        let matched = table.resolve("GET", "/items/3").unwrap();
        assert_eq!(*matched.value, "get");
        assert_eq!(matched.params.get("id").unwrap(), "3");

        assert_eq!(*table.resolve("POST", "/items").unwrap().value, "post");
        assert!(table.resolve("POST", "/items/3").is_none());
        assert!(table.resolve("DELETE", "/items").is_none());
        // Methods are case-sensitive
        assert!(table.resolve("get", "/items/3").is_none());
    }

    #[test]
    fn test_route_table_overwrite_and_listing() {
        let mut table = RouteTable::new();
        table.register("GET", "/", 1).unwrap();
        table.register("GET", "/", 2).unwrap();
        table.register("POST", "/login", 3).unwrap();
        table.register("GET", "/hello/:name", 4).unwrap();

        assert_eq!(*table.resolve("GET", "/").unwrap().value, 2);
        assert_eq!(
            table.routes(),
            vec![("GET", "/"), ("GET", "/hello/:name"), ("POST", "/login")]
        );
    }
}
