//! Commonly used middleware.

mod add_data;
mod around;
mod catch_panic;
mod tracing_mw;

use std::{fmt, sync::Arc};

pub use add_data::{AddData, AddDataEndpoint};
pub use around::{around, Around, AroundEndpoint, Next};
pub use catch_panic::{CatchPanic, CatchPanicEndpoint};
pub use tracing_mw::{Tracing, TracingEndpoint};

use crate::{endpoint::BoxEndpoint, Endpoint, EndpointExt};

/// Represents a middleware trait.
pub trait Middleware<E: Endpoint> {
    /// New endpoint type.
    ///
    /// If you don't know what type to use, then you can use [`BoxEndpoint`],
    /// which will bring some performance loss, but it is insignificant.
    type Output: Endpoint;

    /// Transform the input [`Endpoint`] to another one.
    fn transform(&self, ep: E) -> Self::Output;
}

/// A type-erased middleware that can be shared between many routes.
///
/// Route groups store their middleware as `BoxMiddleware`, because the same
/// middleware value wraps every route registered under the group.
#[derive(Clone)]
pub struct BoxMiddleware(Arc<dyn Fn(BoxEndpoint) -> BoxEndpoint + Send + Sync>);

impl BoxMiddleware {
    /// Erase the type of `middleware`.
    pub fn new<M>(middleware: M) -> Self
    where
        M: Middleware<BoxEndpoint> + Send + Sync + 'static,
    {
        Self(Arc::new(move |ep: BoxEndpoint| -> BoxEndpoint {
            middleware.transform(ep).boxed()
        }))
    }

    /// Wrap `ep`.
    #[inline]
    pub fn transform(&self, ep: BoxEndpoint) -> BoxEndpoint {
        (self.0)(ep)
    }
}

impl fmt::Debug for BoxMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BoxMiddleware")
    }
}

/// Extension trait for [`Middleware`].
pub trait MiddlewareExt: Middleware<BoxEndpoint> {
    /// Erase the type of this middleware.
    fn boxed(self) -> BoxMiddleware
    where
        Self: Sized + Send + Sync + 'static,
    {
        BoxMiddleware::new(self)
    }
}

impl<T: Middleware<BoxEndpoint>> MiddlewareExt for T {}

/// Wrap `ep` with `middleware`, so that the first element runs first.
pub(crate) fn compose(middleware: &[BoxMiddleware], ep: BoxEndpoint) -> BoxEndpoint {
    middleware.iter().rev().fold(ep, |ep, mw| mw.transform(ep))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{endpoint::make_sync, http::StatusCode, Context};

    fn recorder(log: Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> BoxMiddleware {
        around(move |next: Next, ctx: Context| {
            let log = log.clone();
            async move {
                log.lock().unwrap().push(name);
                next.run(ctx).await
            }
        })
        .boxed()
    }

    #[tokio::test]
    async fn compose_runs_first_outermost() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let handler_log = log.clone();
        let handler = make_sync(move |_| {
            handler_log.lock().unwrap().push("handler");
            StatusCode::OK
        });

        let chain = vec![
            recorder(log.clone(), "first"),
            recorder(log.clone(), "second"),
            recorder(log.clone(), "third"),
        ];
        let ep = compose(&chain, handler.boxed());
        assert_eq!(ep.call(Context::default()).await.status(), StatusCode::OK);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["first", "second", "third", "handler"]
        );
    }

    #[tokio::test]
    async fn short_circuit_stops_the_rest_of_the_chain() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let handler_log = log.clone();
        let handler = make_sync(move |_| {
            handler_log.lock().unwrap().push("handler");
            StatusCode::OK
        });

        let chain = vec![
            recorder(log.clone(), "first"),
            around(|_next: Next, _ctx: Context| async { StatusCode::FORBIDDEN }).boxed(),
            recorder(log.clone(), "after"),
        ];
        let ep = compose(&chain, handler.boxed());
        assert_eq!(ep.call(Context::default()).await.status(), StatusCode::FORBIDDEN);
        assert_eq!(*log.lock().unwrap(), vec!["first"]);
    }

    #[tokio::test]
    async fn empty_chain_is_the_handler() {
        let ep = compose(&[], make_sync(|_| StatusCode::IM_A_TEAPOT).boxed());
        assert_eq!(
            ep.call(Context::default()).await.status(),
            StatusCode::IM_A_TEAPOT
        );
    }
}
