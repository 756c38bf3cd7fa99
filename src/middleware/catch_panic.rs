use std::{any::Any, panic::AssertUnwindSafe};

use futures_util::FutureExt;

use crate::{http::StatusCode, Context, Endpoint, Middleware, Response};

/// Middleware that catches panics and converts them into `500 INTERNAL SERVER
/// ERROR` responses.
#[derive(Default)]
pub struct CatchPanic;

impl CatchPanic {
    /// Create new `CatchPanic` middleware.
    #[inline]
    pub fn new() -> Self {
        CatchPanic
    }
}

impl<E: Endpoint> Middleware<E> for CatchPanic {
    type Output = CatchPanicEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        CatchPanicEndpoint { inner: ep }
    }
}

/// Endpoint for the `CatchPanic` middleware.
pub struct CatchPanicEndpoint<E> {
    inner: E,
}

fn panic_message(err: &(dyn Any + Send)) -> &str {
    if let Some(s) = err.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

#[async_trait::async_trait]
impl<E: Endpoint> Endpoint for CatchPanicEndpoint<E> {
    async fn call(&self, ctx: Context) -> Response {
        match AssertUnwindSafe(self.inner.call(ctx)).catch_unwind().await {
            Ok(resp) => resp,
            Err(err) => {
                tracing::error!(panic = panic_message(&*err), "request handler panicked");
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .content_type("text/plain; charset=utf-8")
                    .body("internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{endpoint::make_sync, EndpointExt};

    #[tokio::test]
    async fn test_catch_panic() {
        let ep = make_sync(|_| -> &'static str { panic!("boom") }).with(CatchPanic::new());
        let resp = ep.call(Context::default()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let ep = make_sync(|_| "fine").with(CatchPanic::new());
        assert_eq!(ep.call(Context::default()).await.status(), StatusCode::OK);
    }
}
