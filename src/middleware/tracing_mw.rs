use std::time::Instant;

use tracing::{Instrument, Level};

use crate::{Context, Endpoint, Middleware, Response};

/// A middleware for tracing requests and responses.
///
/// Opens one span per request carrying the method and path, and logs the
/// response status with the elapsed time. Installed on a group it also
/// records the matched route template.
#[derive(Default)]
pub struct Tracing;

impl<E: Endpoint> Middleware<E> for Tracing {
    type Output = TracingEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        TracingEndpoint { inner: ep }
    }
}

/// Endpoint for `Tracing` middleware.
pub struct TracingEndpoint<E> {
    inner: E,
}

#[async_trait::async_trait]
impl<E: Endpoint> Endpoint for TracingEndpoint<E> {
    async fn call(&self, ctx: Context) -> Response {
        let span = tracing::span!(
            Level::INFO,
            "request",
            method = %ctx.method(),
            path = %ctx.uri().path(),
            route = ctx.matched_pattern().unwrap_or_default(),
        );

        async move {
            let start = Instant::now();
            let resp = self.inner.call(ctx).await;
            tracing::info!(
                status = %resp.status(),
                duration = ?start.elapsed(),
                "response"
            );
            resp
        }
        .instrument(span)
        .await
    }
}
