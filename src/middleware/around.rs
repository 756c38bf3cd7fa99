use std::{future::Future, sync::Arc};

use crate::{Context, Endpoint, IntoResponse, Middleware, Response};

/// The remainder of a middleware chain, handed to an [`around`] closure.
#[derive(Clone)]
pub struct Next(Arc<dyn Endpoint>);

impl Next {
    /// Run the inner middleware and the handler.
    pub async fn run(&self, ctx: Context) -> Response {
        self.0.call(ctx).await
    }
}

/// Middleware for the [`around`] function.
pub struct Around<F> {
    f: Arc<F>,
}

/// Create a middleware from an asynchronous closure.
///
/// The closure receives the rest of the chain as a [`Next`] and decides
/// whether to run it. Returning without calling [`Next::run`] short-circuits
/// every inner middleware and the handler.
///
/// # Example
///
/// ```
/// use pathway::{
///     http::{header, StatusCode},
///     middleware::{around, Next},
///     Context, IntoResponse,
/// };
///
/// let require_token = around(|next: Next, ctx: Context| async move {
///     if ctx.headers().contains_key(header::AUTHORIZATION) {
///         next.run(ctx).await
///     } else {
///         StatusCode::UNAUTHORIZED.into_response()
///     }
/// });
/// ```
pub fn around<F, Fut, R>(f: F) -> Around<F>
where
    F: Fn(Next, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send,
    R: IntoResponse,
{
    Around { f: Arc::new(f) }
}

impl<E, F, Fut, R> Middleware<E> for Around<F>
where
    E: Endpoint,
    F: Fn(Next, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send,
    R: IntoResponse,
{
    type Output = AroundEndpoint<F>;

    fn transform(&self, ep: E) -> Self::Output {
        AroundEndpoint {
            next: Next(Arc::new(ep)),
            f: self.f.clone(),
        }
    }
}

#[doc(hidden)]
pub struct AroundEndpoint<F> {
    next: Next,
    f: Arc<F>,
}

#[async_trait::async_trait]
impl<F, Fut, R> Endpoint for AroundEndpoint<F>
where
    F: Fn(Next, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send,
    R: IntoResponse,
{
    async fn call(&self, ctx: Context) -> Response {
        (self.f)(self.next.clone(), ctx).await.into_response()
    }
}
