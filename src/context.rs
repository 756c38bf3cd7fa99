//! The per-request value handed to endpoints.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    http::{HeaderMap, Method, StatusCode, Uri},
    web::json_response,
    Body, Request, Response,
};

/// Path parameters captured by the router, in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(pub(crate) Vec<(Arc<str>, String)>);

impl PathParams {
    /// Returns the value captured for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| &**n == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (&**name, value.as_str()))
    }

    /// Returns the number of captured parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Request context.
///
/// Holds the inbound [`Request`] together with the parameters resolved for
/// the matched route. A fresh context is created for every request and
/// dropped once the endpoint returns.
#[derive(Default)]
pub struct Context {
    request: Request,
    params: PathParams,
    pattern: Option<Arc<str>>,
}

impl From<Request> for Context {
    fn from(request: Request) -> Self {
        Self::new(request)
    }
}

impl Context {
    /// Create a context for a request that has not been routed yet.
    pub fn new(request: Request) -> Self {
        Self {
            request,
            params: PathParams::default(),
            pattern: None,
        }
    }

    pub(crate) fn set_route(&mut self, pattern: Arc<str>, params: PathParams) {
        self.pattern = Some(pattern);
        self.params = params;
    }

    /// Returns the value of the path parameter `name`, or an empty string if
    /// the matched route did not capture it.
    pub fn param(&self, name: &str) -> &str {
        self.params.get(name).unwrap_or_default()
    }

    /// Returns all captured path parameters.
    #[inline]
    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// Returns the template of the matched route, e.g. `/users/{id}`.
    #[inline]
    pub fn matched_pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Returns the first value of the query parameter `name`, or an empty
    /// string if it is absent.
    pub fn query(&self, name: &str) -> String {
        let query = self.request.uri().query().unwrap_or_default();
        serde_urlencoded::from_str::<Vec<(String, String)>>(query)
            .ok()
            .and_then(|pairs| pairs.into_iter().find(|(key, _)| key == name))
            .map(|(_, value)| value)
            .unwrap_or_default()
    }

    /// Deserializes the whole query string into `T`.
    pub fn query_as<T: DeserializeOwned>(&self) -> Result<T, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str(self.request.uri().query().unwrap_or_default())
    }

    /// Returns a reference to data added by
    /// [`AddData`](crate::middleware::AddData).
    pub fn data<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.request.extensions().get::<T>()
    }

    /// Returns the HTTP method.
    #[inline]
    pub fn method(&self) -> &Method {
        self.request.method()
    }

    /// Returns the request URI.
    #[inline]
    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    /// Returns the request headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// Returns a reference to the inbound request.
    #[inline]
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Returns a mutable reference to the inbound request.
    #[inline]
    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    /// Takes the request body, leaving an empty one behind.
    #[inline]
    pub fn take_body(&mut self) -> Body {
        self.request.take_body()
    }

    /// Creates a JSON response with the given status.
    ///
    /// If `value` fails to serialize, the error is logged and a
    /// `500 Internal Server Error` JSON body is returned instead.
    pub fn json<T: Serialize + ?Sized>(&self, status: StatusCode, value: &T) -> Response {
        json_response(status, value)
    }

    /// Creates a plain text response with the given status and optional
    /// message.
    pub fn status(&self, status: StatusCode, message: Option<&str>) -> Response {
        let builder = Response::builder()
            .status(status)
            .content_type("text/plain; charset=utf-8");
        match message {
            Some(message) => builder.body(message.to_string()),
            None => builder.finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    fn context(uri: &'static str) -> Context {
        Context::new(Request::builder().uri(Uri::from_static(uri)).finish())
    }

    #[test]
    fn missing_param_is_empty() {
        let mut ctx = context("/users/1");
        ctx.set_route("/users/{id}".into(), PathParams(vec![("id".into(), "1".into())]));
        assert_eq!(ctx.param("id"), "1");
        assert_eq!(ctx.param("name"), "");
        assert_eq!(ctx.matched_pattern(), Some("/users/{id}"));
    }

    #[test]
    fn query_values() {
        let ctx = context("/search?q=open%20tickets&page=2&page=3");
        assert_eq!(ctx.query("q"), "open tickets");
        assert_eq!(ctx.query("page"), "2");
        assert_eq!(ctx.query("missing"), "");
    }

    #[test]
    fn query_as_struct() {
        #[derive(Deserialize)]
        struct Paging {
            limit: u32,
            offset: Option<u32>,
        }

        let paging: Paging = context("/projects?limit=20").query_as().unwrap();
        assert_eq!(paging.limit, 20);
        assert_eq!(paging.offset, None);
        assert!(context("/projects?limit=many").query_as::<Paging>().is_err());
    }

    #[tokio::test]
    async fn json_sets_content_type_and_status() {
        let ctx = context("/");
        let mut resp = ctx.json(StatusCode::CREATED, &json!({ "id": "p1" }));
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.content_type(), Some("application/json"));
        assert_eq!(resp.take_body().into_string().await.unwrap(), r#"{"id":"p1"}"#);
    }

    #[tokio::test]
    async fn status_with_and_without_message() {
        let ctx = context("/");
        let mut resp = ctx.status(StatusCode::UNAUTHORIZED, Some("no token provided"));
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.take_body().into_string().await.unwrap(),
            "no token provided"
        );

        let mut resp = ctx.status(StatusCode::NO_CONTENT, None);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.take_body().into_string().await.unwrap(), "");
    }
}
