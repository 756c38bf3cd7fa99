use std::convert::TryFrom;

use crate::{
    http::{
        header::{self, HeaderMap, HeaderName, HeaderValue},
        StatusCode, Version,
    },
    Body,
};

/// Represents an HTTP response.
#[derive(Default)]
pub struct Response {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Body,
}

impl From<Response> for hyper::Response<hyper::Body> {
    fn from(resp: Response) -> Self {
        let mut http_resp = hyper::Response::new(resp.body.0);
        *http_resp.status_mut() = resp.status;
        *http_resp.version_mut() = resp.version;
        *http_resp.headers_mut() = resp.headers;
        http_resp
    }
}

impl Response {
    /// Creates a response builder.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder(Response::default())
    }

    /// Returns the associated status code.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the status code for this response.
    #[inline]
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Returns a reference to the associated header map.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a mutable reference to the associated header map.
    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns the `Content-Type` header, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// Sets the body for this response.
    #[inline]
    pub fn set_body(&mut self, body: impl Into<Body>) {
        self.body = body.into();
    }

    /// Take the body from this response and sets the body to empty.
    #[inline]
    pub fn take_body(&mut self) -> Body {
        std::mem::take(&mut self.body)
    }
}

/// An response builder.
pub struct ResponseBuilder(Response);

impl ResponseBuilder {
    /// Sets the HTTP status for this response.
    ///
    /// By default this is [`StatusCode::OK`].
    #[must_use]
    pub fn status(mut self, status: StatusCode) -> Self {
        self.0.status = status;
        self
    }

    /// Appends a header to this response builder.
    ///
    /// Invalid names or values are ignored.
    #[must_use]
    pub fn header<K, V>(mut self, key: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        HeaderValue: TryFrom<V>,
    {
        let key = <HeaderName as TryFrom<K>>::try_from(key);
        let value = <HeaderValue as TryFrom<V>>::try_from(value);
        if let (Ok(key), Ok(value)) = (key, value) {
            self.0.headers.append(key, value);
        }
        self
    }

    /// Sets the `Content-Type` header on the response.
    #[must_use]
    pub fn content_type(mut self, content_type: &'static str) -> Self {
        self.0.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type),
        );
        self
    }

    /// Consumes this builder, using the provided body to return a constructed
    /// [`Response`].
    pub fn body(mut self, body: impl Into<Body>) -> Response {
        self.0.body = body.into();
        self.0
    }

    /// Consumes this builder to return a [`Response`] with an empty body.
    pub fn finish(self) -> Response {
        self.0
    }
}
