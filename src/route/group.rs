use std::sync::Arc;

use super::{pattern::Pattern, Router};
use crate::{http::Method, middleware::BoxMiddleware, Endpoint};

/// Joins two path pieces with exactly one `/` between segments. The result
/// starts with `/` and only ends with one when it is the root.
pub(crate) fn join_path(prefix: &str, path: &str) -> String {
    let mut joined = String::with_capacity(prefix.len() + path.len() + 1);
    for piece in prefix
        .split('/')
        .chain(path.split('/'))
        .filter(|piece| !piece.is_empty())
    {
        joined.push('/');
        joined.push_str(piece);
    }
    if joined.is_empty() {
        joined.push('/');
    }
    joined
}

/// A registered route.
///
/// Produced by [`RouterGroup::build`], after which the middleware list holds
/// the complete chain: ancestor groups from the root down, then the route's
/// own middleware.
#[derive(Clone)]
pub struct Route {
    method: Method,
    path: String,
    pattern: Pattern,
    endpoint: Arc<dyn Endpoint>,
    middleware: Vec<BoxMiddleware>,
}

impl Route {
    /// The HTTP method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The full path template, including group prefixes.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The compiled pattern.
    #[inline]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Parameter names, in path order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.pattern.param_names()
    }

    /// The middleware chain, outermost first.
    #[inline]
    pub fn middleware(&self) -> &[BoxMiddleware] {
        &self.middleware
    }

    pub(crate) fn endpoint(&self) -> &Arc<dyn Endpoint> {
        &self.endpoint
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

macro_rules! impl_methods {
    ($($(#[$docs:meta])* ($name:ident, $name_with:ident, $method:ident)),*) => {
        $(
        $(#[$docs])*
        pub fn $name(&mut self, path: &str, ep: impl Endpoint) -> &mut Self {
            self.handle(Method::$method, path, ep)
        }

        $(#[$docs])*
        ///
        /// `middleware` applies to this route only and runs after the
        /// middleware of every enclosing group.
        pub fn $name_with(
            &mut self,
            path: &str,
            ep: impl Endpoint,
            middleware: impl IntoIterator<Item = BoxMiddleware>,
        ) -> &mut Self {
            self.handle_with(Method::$method, path, ep, middleware)
        }
        )*
    };
}

/// A tree of path prefixes, used to register routes.
///
/// Groups only exist while the application is being set up. Call
/// [`into_router`](RouterGroup::into_router) to compile them into an
/// immutable [`Router`].
///
/// # Example
///
/// ```
/// use pathway::{handler, middleware::{MiddlewareExt, Tracing}, Context, RouterGroup};
///
/// #[handler]
/// async fn list(ctx: Context) -> String {
///     ctx.param("project_id").to_string()
/// }
///
/// let mut root = RouterGroup::new();
/// let projects = root.group_with("/projects", vec![Tracing.boxed()]);
/// projects.group("/{project_id}/tickets").get("/", list);
/// let router = root.into_router();
/// ```
#[derive(Default)]
pub struct RouterGroup {
    prefix: String,
    middleware: Vec<BoxMiddleware>,
    routes: Vec<Route>,
    groups: Vec<RouterGroup>,
}

impl RouterGroup {
    /// Create the root group.
    pub fn new() -> Self {
        Self::default()
    }

    /// The effective prefix of this group.
    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Create a child group under `prefix`.
    pub fn group(&mut self, prefix: &str) -> &mut RouterGroup {
        self.group_with(prefix, Vec::new())
    }

    /// Create a child group under `prefix` whose routes all run
    /// `middleware`, after the middleware of this group.
    pub fn group_with(
        &mut self,
        prefix: &str,
        middleware: impl IntoIterator<Item = BoxMiddleware>,
    ) -> &mut RouterGroup {
        let group = RouterGroup {
            prefix: join_path(&self.prefix, prefix),
            middleware: middleware.into_iter().collect(),
            routes: Vec::new(),
            groups: Vec::new(),
        };
        self.groups.push(group);
        let idx = self.groups.len() - 1;
        &mut self.groups[idx]
    }

    /// Register `ep` for `method` at `path`, relative to this group.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid template.
    pub fn handle(&mut self, method: Method, path: &str, ep: impl Endpoint) -> &mut Self {
        self.handle_with(method, path, ep, Vec::new())
    }

    /// Same as [`handle`](RouterGroup::handle), with route-local middleware.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid template.
    pub fn handle_with(
        &mut self,
        method: Method,
        path: &str,
        ep: impl Endpoint,
        middleware: impl IntoIterator<Item = BoxMiddleware>,
    ) -> &mut Self {
        let path = join_path(&self.prefix, path);
        let pattern = match Pattern::parse(&path) {
            Ok(pattern) => pattern,
            Err(err) => panic!("{}", err),
        };
        tracing::debug!(method = %method, path = %path, "route registered");
        self.routes.push(Route {
            method,
            path,
            pattern,
            endpoint: Arc::new(ep),
            middleware: middleware.into_iter().collect(),
        });
        self
    }

    impl_methods!(
        /// Register a `GET` route.
        (get, get_with, GET),
        /// Register a `POST` route.
        (post, post_with, POST),
        /// Register a `PUT` route.
        (put, put_with, PUT),
        /// Register a `DELETE` route.
        (delete, delete_with, DELETE),
        /// Register a `PATCH` route.
        (patch, patch_with, PATCH)
    );

    fn flatten(&self, inherited: &[BoxMiddleware], out: &mut Vec<Route>) {
        let mut chain = inherited.to_vec();
        chain.extend(self.middleware.iter().cloned());

        for route in &self.routes {
            let mut route = route.clone();
            route.middleware = chain.iter().chain(&route.middleware).cloned().collect();
            out.push(route);
        }

        for group in &self.groups {
            group.flatten(&chain, out);
        }
    }

    /// Flattens the group tree into a list of routes with their complete
    /// middleware chains, sorted by literal segment count, most first.
    ///
    /// The sort is stable: equal counts keep registration order, with a
    /// group's own routes ahead of its child groups'.
    pub fn build(&self) -> Vec<Route> {
        let mut routes = Vec::new();
        self.flatten(&[], &mut routes);
        routes.sort_by(|a, b| {
            b.pattern
                .literal_count()
                .cmp(&a.pattern.literal_count())
        });
        routes
    }

    /// Build the routes and compile them into a [`Router`].
    pub fn into_router(self) -> Router {
        Router::new(self.build())
    }
}
