use std::{future::Future, sync::Arc};

use crate::{Context, IntoResponse, Middleware, Response};

/// An HTTP request handler.
#[async_trait::async_trait]
pub trait Endpoint: Send + Sync + 'static {
    /// Get the response to the request.
    async fn call(&self, ctx: Context) -> Response;
}

/// An owned dynamically typed [`Endpoint`].
pub type BoxEndpoint = Box<dyn Endpoint>;

#[async_trait::async_trait]
impl<T: Endpoint + ?Sized> Endpoint for Box<T> {
    async fn call(&self, ctx: Context) -> Response {
        self.as_ref().call(ctx).await
    }
}

#[async_trait::async_trait]
impl<T: Endpoint + ?Sized> Endpoint for Arc<T> {
    async fn call(&self, ctx: Context) -> Response {
        self.as_ref().call(ctx).await
    }
}

struct SyncFnEndpoint<F>(F);

#[async_trait::async_trait]
impl<F, R> Endpoint for SyncFnEndpoint<F>
where
    F: Fn(Context) -> R + Send + Sync + 'static,
    R: IntoResponse,
{
    async fn call(&self, ctx: Context) -> Response {
        (self.0)(ctx).into_response()
    }
}

struct AsyncFnEndpoint<F>(F);

#[async_trait::async_trait]
impl<F, Fut, R> Endpoint for AsyncFnEndpoint<F>
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send,
    R: IntoResponse,
{
    async fn call(&self, ctx: Context) -> Response {
        (self.0)(ctx).await.into_response()
    }
}

/// Create an endpoint with a function.
///
/// # Example
///
/// ```
/// use pathway::{endpoint::make_sync, Context, Endpoint};
///
/// let ep = make_sync(|ctx: Context| ctx.method().to_string());
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let mut resp = ep.call(Context::default()).await;
/// assert_eq!(resp.take_body().into_string().await.unwrap(), "GET");
/// # });
/// ```
pub fn make_sync<F, R>(f: F) -> impl Endpoint
where
    F: Fn(Context) -> R + Send + Sync + 'static,
    R: IntoResponse,
{
    SyncFnEndpoint(f)
}

/// Create an endpoint with an asynchronous function.
///
/// # Example
///
/// ```
/// use pathway::{endpoint::make, Context, Endpoint};
///
/// let ep = make(|ctx: Context| async move { ctx.query("q") });
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let mut resp = ep.call(Context::default()).await;
/// assert_eq!(resp.take_body().into_string().await.unwrap(), "");
/// # });
/// ```
pub fn make<F, Fut, R>(f: F) -> impl Endpoint
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send,
    R: IntoResponse,
{
    AsyncFnEndpoint(f)
}

/// Extension trait for [`Endpoint`].
pub trait EndpointExt: Endpoint {
    /// Wrap the endpoint in a Box.
    fn boxed(self) -> BoxEndpoint
    where
        Self: Sized,
    {
        Box::new(self)
    }

    /// Use middleware to transform this endpoint.
    ///
    /// # Example
    ///
    /// ```
    /// use pathway::{handler, middleware::AddData, Context, EndpointExt};
    ///
    /// #[handler]
    /// async fn index(ctx: Context) -> String {
    ///     format!("{}", ctx.data::<i32>().copied().unwrap_or_default())
    /// }
    ///
    /// let app = index.with(AddData::new(100i32));
    /// ```
    fn with<T>(self, middleware: T) -> T::Output
    where
        T: Middleware<Self>,
        Self: Sized,
    {
        middleware.transform(self)
    }
}

impl<T: Endpoint> EndpointExt for T {}

#[cfg(test)]
mod tests {
    use crate::{handler, http::StatusCode, Context, Endpoint, EndpointExt};

    #[handler(internal)]
    async fn hello() -> &'static str {
        "hello"
    }

    #[handler(internal)]
    async fn echo_method(ctx: Context) -> String {
        ctx.method().to_string()
    }

    #[tokio::test]
    async fn handler_macro() {
        let mut resp = hello.call(Context::default()).await;
        assert_eq!(resp.take_body().into_string().await.unwrap(), "hello");

        let mut resp = echo_method.boxed().call(Context::default()).await;
        assert_eq!(resp.take_body().into_string().await.unwrap(), "GET");
    }

    #[tokio::test]
    async fn closures() {
        let ep = super::make_sync(|_| StatusCode::ACCEPTED);
        assert_eq!(ep.call(Context::default()).await.status(), StatusCode::ACCEPTED);

        let ep = super::make(|_| async { (StatusCode::CREATED, "made") });
        let mut resp = ep.call(Context::default()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.take_body().into_string().await.unwrap(), "made");
    }
}
