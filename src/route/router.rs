use std::sync::Arc;

use super::{group::Route, trie::Trie};
use crate::{
    endpoint::BoxEndpoint, http::StatusCode, middleware::compose, Context, Endpoint,
    IntoResponse, Response,
};

struct RouteEndpoint {
    pattern: Arc<str>,
    endpoint: BoxEndpoint,
}

/// The compiled, immutable routing table.
///
/// Every route is wrapped in its middleware chain once, when the router is
/// built. Dispatching a request walks the segment trie and calls the
/// matched endpoint, or responds with `404 Not Found`.
///
/// `Router` is itself an [`Endpoint`], so middleware that must see every
/// request, including unmatched ones, wraps the whole router:
///
/// ```
/// use pathway::{middleware::Tracing, EndpointExt, RouterGroup};
///
/// let app = RouterGroup::new().into_router().with(Tracing);
/// ```
pub struct Router {
    trie: Trie<RouteEndpoint>,
}

impl Router {
    /// Compile `routes`.
    ///
    /// When two routes share a method and an equivalent path, the first one
    /// in `routes` is kept and the other is ignored with a warning.
    pub fn new(routes: Vec<Route>) -> Self {
        let mut trie = Trie::default();

        for route in routes {
            let endpoint = compose(route.middleware(), Box::new(route.endpoint().clone()));
            let inserted = trie.insert(
                route.pattern(),
                route.method().clone(),
                RouteEndpoint {
                    pattern: route.pattern().shared_template(),
                    endpoint,
                },
            );

            if inserted {
                tracing::debug!(
                    method = %route.method(),
                    path = %route.path(),
                    middleware = route.middleware().len(),
                    "route compiled"
                );
            } else {
                tracing::warn!(
                    method = %route.method(),
                    path = %route.path(),
                    "duplicate route ignored"
                );
            }
        }

        Self { trie }
    }
}

impl From<Vec<Route>> for Router {
    fn from(routes: Vec<Route>) -> Self {
        Router::new(routes)
    }
}

#[async_trait::async_trait]
impl Endpoint for Router {
    async fn call(&self, mut ctx: Context) -> Response {
        match self.trie.find(ctx.method(), ctx.uri().path()) {
            Some(m) => {
                ctx.set_route(m.data.pattern.clone(), m.params);
                m.data.endpoint.call(ctx).await
            }
            None => {
                tracing::debug!(
                    method = %ctx.method(),
                    path = %ctx.uri().path(),
                    "no route matched"
                );
                StatusCode::NOT_FOUND.into_response()
            }
        }
    }
}
