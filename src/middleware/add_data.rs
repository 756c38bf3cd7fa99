use crate::{Context, Endpoint, Middleware, Response};

/// Middleware for add any data to request.
///
/// Handlers read the value back with [`Context::data`].
pub struct AddData<T> {
    value: T,
}

impl<T: Clone + Send + Sync + 'static> AddData<T> {
    /// Create new [`AddData`] middleware with any value.
    pub fn new(value: T) -> Self {
        AddData { value }
    }
}

impl<E, T> Middleware<E> for AddData<T>
where
    E: Endpoint,
    T: Clone + Send + Sync + 'static,
{
    type Output = AddDataEndpoint<E, T>;

    fn transform(&self, ep: E) -> Self::Output {
        AddDataEndpoint {
            inner: ep,
            value: self.value.clone(),
        }
    }
}

/// Endpoint for [`AddData`] middleware.
pub struct AddDataEndpoint<E, T> {
    inner: E,
    value: T,
}

#[async_trait::async_trait]
impl<E, T> Endpoint for AddDataEndpoint<E, T>
where
    E: Endpoint,
    T: Clone + Send + Sync + 'static,
{
    async fn call(&self, mut ctx: Context) -> Response {
        ctx.request_mut().extensions_mut().insert(self.value.clone());
        self.inner.call(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{handler, EndpointExt};

    #[derive(Clone)]
    struct Services {
        name: &'static str,
    }

    #[handler(internal)]
    async fn index(ctx: Context) -> &'static str {
        ctx.data::<Services>().map(|s| s.name).unwrap_or("missing")
    }

    #[tokio::test]
    async fn test_add_data() {
        let ep = index.with(AddData::new(Services { name: "tracker" }));
        let mut resp = ep.call(Context::default()).await;
        assert_eq!(resp.take_body().into_string().await.unwrap(), "tracker");
    }
}
