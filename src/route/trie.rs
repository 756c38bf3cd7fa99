use std::{
    collections::hash_map::Entry,
    sync::Arc,
};

use fnv::FnvHashMap;
use percent_encoding::percent_decode_str;

use super::pattern::{Pattern, Segment};
use crate::{context::PathParams, http::Method};

/// The parameter child of a node. The name travels with the branch, so the
/// first pattern that creates the branch decides what it captures as.
struct ParamBranch<T> {
    name: Arc<str>,
    node: Box<Node<T>>,
}

/// Terminal routes for patterns ending in `{name...}` at this node.
struct CatchAllSlot<T> {
    name: Arc<str>,
    routes: FnvHashMap<Method, T>,
}

struct Node<T> {
    literals: FnvHashMap<String, Node<T>>,
    param: Option<ParamBranch<T>>,
    catch_all: Option<CatchAllSlot<T>>,
    routes: FnvHashMap<Method, T>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            literals: FnvHashMap::default(),
            param: None,
            catch_all: None,
            routes: FnvHashMap::default(),
        }
    }
}

/// A successful lookup.
pub(crate) struct Match<'a, T> {
    pub(crate) data: &'a T,
    pub(crate) params: PathParams,
}

/// Segment trie keyed by literal text, with at most one parameter branch and
/// one catch-all slot per node.
pub(crate) struct Trie<T> {
    root: Node<T>,
}

impl<T> Default for Trie<T> {
    fn default() -> Self {
        Self {
            root: Node::default(),
        }
    }
}

fn insert_route<T>(routes: &mut FnvHashMap<Method, T>, method: Method, data: T) -> bool {
    match routes.entry(method) {
        Entry::Occupied(_) => false,
        Entry::Vacant(entry) => {
            entry.insert(data);
            true
        }
    }
}

impl<T> Trie<T> {
    /// Adds `data` for `method` at the position described by `pattern`.
    ///
    /// Returns `false` and drops `data` if that method is already bound
    /// there.
    pub(crate) fn insert(&mut self, pattern: &Pattern, method: Method, data: T) -> bool {
        let mut node = &mut self.root;

        for segment in pattern.segments() {
            node = match segment {
                Segment::Literal(text) => node.literals.entry(text.clone()).or_default(),
                Segment::Param(name) => {
                    let branch = node.param.get_or_insert_with(|| ParamBranch {
                        name: name.clone(),
                        node: Box::default(),
                    });
                    &mut *branch.node
                }
                Segment::CatchAll(name) => {
                    let slot = node.catch_all.get_or_insert_with(|| CatchAllSlot {
                        name: name.clone(),
                        routes: FnvHashMap::default(),
                    });
                    return insert_route(&mut slot.routes, method, data);
                }
            };
        }

        insert_route(&mut node.routes, method, data)
    }

    /// Looks up a raw request path. Each segment is percent-decoded after
    /// splitting, so an encoded `/` stays inside its segment.
    ///
    /// The walk never backtracks: a literal child that matches the segment
    /// is taken even if the method is only bound under the parameter branch.
    pub(crate) fn find(&self, method: &Method, path: &str) -> Option<Match<'_, T>> {
        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| percent_decode_str(segment).decode_utf8_lossy())
            .collect::<Vec<_>>();
        let mut params = Vec::new();
        let mut node = &self.root;

        for (idx, segment) in segments.iter().enumerate() {
            if let Some(child) = node.literals.get(&**segment) {
                node = child;
            } else if let Some(branch) = &node.param {
                params.push((branch.name.clone(), segment.to_string()));
                node = &branch.node;
            } else if let Some(slot) = &node.catch_all {
                let data = slot.routes.get(method)?;
                params.push((slot.name.clone(), segments[idx..].join("/")));
                return Some(Match {
                    data,
                    params: PathParams(params),
                });
            } else {
                return None;
            }
        }

        let data = node.routes.get(method)?;
        Some(Match {
            data,
            params: PathParams(params),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trie(routes: &[(Method, &str, &'static str)]) -> Trie<&'static str> {
        let mut trie = Trie::default();
        for (method, template, name) in routes {
            assert!(trie.insert(&Pattern::parse(template).unwrap(), method.clone(), *name));
        }
        trie
    }

    fn find(
        trie: &Trie<&'static str>,
        method: Method,
        path: &str,
    ) -> Option<(&'static str, Vec<(String, String)>)> {
        trie.find(&method, path).map(|m| {
            (
                *m.data,
                m.params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        })
    }

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn literal_before_param() {
        let trie = trie(&[
            (Method::GET, "/users/{id}", "id"),
            (Method::GET, "/users/profile", "profile"),
        ]);
        assert_eq!(
            find(&trie, Method::GET, "/users/profile"),
            Some(("profile", params(&[])))
        );
        assert_eq!(
            find(&trie, Method::GET, "/users/42"),
            Some(("id", params(&[("id", "42")])))
        );
    }

    #[test]
    fn root_and_trailing_slash() {
        let trie = trie(&[
            (Method::GET, "/", "root"),
            (Method::GET, "/users/{id}", "user"),
        ]);
        assert_eq!(find(&trie, Method::GET, "").unwrap().0, "root");
        assert_eq!(find(&trie, Method::GET, "/").unwrap().0, "root");
        assert_eq!(find(&trie, Method::GET, "/users/123/"), find(&trie, Method::GET, "/users/123"));
        assert_eq!(find(&trie, Method::GET, "//users//7").unwrap().1, params(&[("id", "7")]));
    }

    #[test]
    fn first_param_name_owns_the_branch() {
        let trie = trie(&[
            (Method::GET, "/users/{id}", "get"),
            (Method::DELETE, "/users/{name}", "delete"),
        ]);
        assert_eq!(
            find(&trie, Method::DELETE, "/users/123"),
            Some(("delete", params(&[("id", "123")])))
        );
    }

    #[test]
    fn duplicate_method_is_not_overwritten() {
        let mut trie = Trie::default();
        let pattern = Pattern::parse("/users/{id}").unwrap();
        assert!(trie.insert(&pattern, Method::GET, "first"));
        assert!(!trie.insert(&Pattern::parse("/users/{name}").unwrap(), Method::GET, "second"));
        assert!(trie.insert(&pattern, Method::POST, "post"));
        assert_eq!(*trie.find(&Method::GET, "/users/1").unwrap().data, "first");
    }

    #[test]
    fn method_miss_is_no_match() {
        let trie = trie(&[(Method::GET, "/users", "list")]);
        assert!(trie.find(&Method::POST, "/users").is_none());
        assert!(trie.find(&Method::GET, "/users/1").is_none());
        assert!(trie.find(&Method::GET, "/").is_none());
    }

    #[test]
    fn catch_all_joins_the_rest() {
        let trie = trie(&[(Method::GET, "/drive/files/{path...}", "files")]);
        assert_eq!(
            find(&trie, Method::GET, "/drive/files/docs/report.pdf"),
            Some(("files", params(&[("path", "docs/report.pdf")])))
        );
        assert_eq!(
            find(&trie, Method::GET, "/drive/files/image.jpg"),
            Some(("files", params(&[("path", "image.jpg")])))
        );
        assert!(trie.find(&Method::GET, "/drive/files").is_none());
        assert!(trie.find(&Method::GET, "/drive/files/").is_none());
    }

    #[test]
    fn plain_param_is_not_greedy() {
        let trie = trie(&[(Method::GET, "/api/{all}", "all")]);
        assert!(trie.find(&Method::GET, "/api/users").is_some());
        assert!(trie.find(&Method::GET, "/api/users/123/profile").is_none());
    }

    #[test]
    fn literal_child_is_never_abandoned() {
        let trie = trie(&[
            (Method::GET, "/users/profile", "profile"),
            (Method::PUT, "/users/{id}", "put"),
            (Method::GET, "/a/b/c", "abc"),
            (Method::GET, "/a/{x}/d", "xd"),
            (Method::GET, "/projects/archived/summary", "summary"),
            (Method::GET, "/projects/{path...}", "files"),
        ]);

        assert!(trie.find(&Method::PUT, "/users/profile").is_none());
        assert_eq!(
            find(&trie, Method::PUT, "/users/7"),
            Some(("put", params(&[("id", "7")])))
        );

        assert!(trie.find(&Method::GET, "/a/b/d").is_none());
        assert_eq!(
            find(&trie, Method::GET, "/a/z/d"),
            Some(("xd", params(&[("x", "z")])))
        );

        assert!(trie.find(&Method::GET, "/projects/archived/tickets").is_none());
        assert_eq!(
            find(&trie, Method::GET, "/projects/7/comments/3"),
            Some(("files", params(&[("path", "7/comments/3")])))
        );
    }

    #[test]
    fn segments_are_decoded_after_splitting() {
        let trie = trie(&[(Method::GET, "/users/{id}", "user")]);
        assert_eq!(
            find(&trie, Method::GET, "/users/a%2Fb"),
            Some(("user", params(&[("id", "a/b")])))
        );
        assert_eq!(
            find(&trie, Method::GET, "/users/j%C3%BCrgen%20k"),
            Some(("user", params(&[("id", "jürgen k")])))
        );
        assert!(trie.find(&Method::GET, "/users/a/b").is_none());
    }
}
