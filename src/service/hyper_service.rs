use std::{
    convert::Infallible,
    sync::Arc,
    task::{Context as TaskContext, Poll},
};

use futures_util::future::{self, BoxFuture, Ready};
use hyper::service::Service;

use crate::{Context, Endpoint};

/// A hyper [`Service`] that dispatches every request to an endpoint.
pub struct EndpointService<E> {
    ep: Arc<E>,
}

impl<E> Clone for EndpointService<E> {
    fn clone(&self) -> Self {
        Self {
            ep: self.ep.clone(),
        }
    }
}

impl<E: Endpoint> EndpointService<E> {
    /// Create a service from `ep`.
    pub fn new(ep: E) -> Self {
        Self { ep: Arc::new(ep) }
    }
}

impl<E: Endpoint> Service<hyper::Request<hyper::Body>> for EndpointService<E> {
    type Response = hyper::Response<hyper::Body>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: hyper::Request<hyper::Body>) -> Self::Future {
        let ep = self.ep.clone();
        Box::pin(async move {
            let resp = ep.call(Context::new(req.into())).await;
            Ok(resp.into())
        })
    }
}

/// Produces an [`EndpointService`] for each connection, sharing one
/// endpoint between all of them.
pub struct MakeEndpointService<E> {
    svc: EndpointService<E>,
}

impl<E: Endpoint> MakeEndpointService<E> {
    /// Create a connection factory for `ep`.
    pub fn new(ep: E) -> Self {
        Self {
            svc: EndpointService::new(ep),
        }
    }
}

impl<E: Endpoint, T> Service<T> for MakeEndpointService<E> {
    type Response = EndpointService<E>;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _target: T) -> Self::Future {
        future::ready(Ok(self.svc.clone()))
    }
}
