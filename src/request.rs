//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::{Extensions, HeaderMap, Method};

/// An incoming HTTP request with its body fully buffered.
///
/// Middlewares receive the request by value and hand it on through
/// [`Next::run`](crate::middleware::Next::run). Per-request state travels in
/// [`extensions`](Request::extensions_mut) along the way.
pub struct Request {
    inner: http::Request<Bytes>,
    params: HashMap<String, String>,
}

impl Request {
    pub fn method(&self) -> &Method { self.inner.method() }
    pub fn path(&self) -> &str { self.inner.uri().path() }
    pub fn headers(&self) -> &HeaderMap { self.inner.headers() }
    pub fn body(&self) -> &[u8] { self.inner.body() }

    /// Case-insensitive header lookup. Values that are not visible ASCII are skipped.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name)?.to_str().ok()
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    /// Parameters are only populated once the request reaches its endpoint.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn extensions(&self) -> &Extensions { self.inner.extensions() }
    pub fn extensions_mut(&mut self) -> &mut Extensions { self.inner.extensions_mut() }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(inner: http::Request<Bytes>) -> Self {
        Self { inner, params: HashMap::new() }
    }
}
